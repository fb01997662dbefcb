//! The extraction pipeline: extractors, merge, classification and key synthesis.
//!
//! ```text
//! Page -> extractors -> merge -> classify -> cite key
//! ```
//!
//! Dates are normalised inside each extractor, so every stage after the
//! extractors works on already-canonical values.

pub mod classify;
pub mod merge;

pub use classify::{classify, DEFAULT_ENTRY_TYPE, RULES};
pub use merge::{merge, priority_for, DEFAULT_PRIORITY, FIELD_PRIORITY};

use std::panic::{self, AssertUnwindSafe};

use crate::config::Config;
use crate::extractors::{ExtractorId, ExtractorOutput, ExtractorRegistry};
use crate::models::{EntryType, Field, MergedRecord, Page};
use crate::utils::cite_key;

/// Pipeline errors. Only a total failure to produce a record is an error.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The page URL could not be parsed
    #[error("Invalid page URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Extraction panicked
    #[error("Extraction failed: {0}")]
    Panicked(String),
}

/// Everything derived from one page
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Raw output of every registered extractor
    pub outputs: Vec<ExtractorOutput>,
    /// The merged record
    pub record: MergedRecord,
    /// The classified entry type
    pub entry_type: EntryType,
    /// The synthesized citation key
    pub cite_key: String,
    /// URL the page was loaded from
    pub page_url: String,
}

/// Runs a registry of extractors over pages
#[derive(Debug, Clone)]
pub struct Pipeline {
    registry: ExtractorRegistry,
}

impl Pipeline {
    /// Create a pipeline over an explicit registry
    pub fn new(registry: ExtractorRegistry) -> Self {
        Self { registry }
    }

    /// Create a pipeline with the extractors the config allows
    pub fn from_config(config: &Config) -> Self {
        Self::new(ExtractorRegistry::from_config(config))
    }

    /// The registry this pipeline runs
    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Run every extractor on `page` and derive the final record
    pub fn extract(&self, page: &Page) -> Extraction {
        let outputs = self.registry.run(page);
        let record = merge(&outputs);

        let pinned = entry_type_from(outputs.iter().filter(|o| o.pins_entry_type));
        let hint = entry_type_from(outputs.iter().filter(|o| o.id == ExtractorId::JsonLd));
        let entry_type = classify(pinned, hint, &record, &page.context());
        let cite_key = cite_key(&record);

        tracing::debug!(
            "Extracted {} field(s) from {} as @{}{{{}}}",
            record.len(),
            page.url(),
            entry_type,
            cite_key
        );

        Extraction {
            outputs,
            record,
            entry_type,
            cite_key,
            page_url: page.url().to_string(),
        }
    }

    /// Parse `html` loaded from `url` and extract it, turning a panic anywhere
    /// in the extraction into an error.
    pub fn extract_html(&self, url: &str, html: &str) -> Result<Extraction, PipelineError> {
        let page = Page::parse(url, html)?;
        panic::catch_unwind(AssertUnwindSafe(|| self.extract(&page))).map_err(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!("Extraction of {} panicked: {}", url, message);
            PipelineError::Panicked(message)
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ExtractorRegistry::new())
    }
}

/// First parseable `entry_type` reported by `outputs`
fn entry_type_from<'a>(outputs: impl Iterator<Item = &'a ExtractorOutput>) -> Option<EntryType> {
    outputs
        .filter_map(|o| o.record.get(Field::EntryType))
        .find_map(|t| t.parse().ok())
}
