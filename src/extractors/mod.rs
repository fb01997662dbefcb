//! Metadata extractors with an extensible trait-based architecture.
//!
//! This module defines the [`Extractor`] trait that every metadata source
//! implements. Each extractor is a pure function of a [`Page`] snapshot and
//! reports a [`PartialRecord`]; extractors never see each other's output, so
//! they can run in any order.
//!
//! # Built-in extractors
//!
//! - `arxiv` - arXiv abstract pages (pins the entry type to `misc`)
//! - `pubmed` - PubMed article pages
//! - `scholar` - Google Scholar citation pages
//! - `meta` - named meta tags (Highwire `citation_*`, Dublin Core, PRISM, OpenGraph, Twitter)
//! - `jsonld` - embedded JSON-LD structured data
//! - `webpage` - generic fallback for arbitrary pages
//! - `publisher` - volume/issue/page patterns in the visible body text
//! - `doi` - DOI in the page URL or in DOI-bearing elements
//!
//! # Runtime configuration
//!
//! Extractors can be switched off in the `[extractors]` config section or
//! through environment variables:
//!
//! - `PAGEBIB_EXTRACTORS_ENABLED` - only use these extractors (e.g. "meta,jsonld,doi")
//! - `PAGEBIB_EXTRACTORS_DISABLED` - never use these extractors (e.g. "publisher")
//!
//! The disabled list always takes precedence.

mod arxiv;
mod doi;
mod meta_tags;
pub mod mock;
mod publisher;
mod pubmed;
mod registry;
mod scholar;
mod structured_data;
mod webpage;

pub use arxiv::ArxivExtractor;
pub use doi::DoiExtractor;
pub use meta_tags::MetaTagExtractor;
pub use mock::{make_record, MockExtractor};
pub use publisher::{PublisherHeuristicsExtractor, DEFAULT_BODY_SCAN_LIMIT};
pub use pubmed::PubMedExtractor;
pub use registry::{ExtractorOutput, ExtractorRegistry};
pub use scholar::ScholarExtractor;
pub use structured_data::{schema_type_entry, StructuredDataExtractor};
pub use webpage::WebpageExtractor;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{Page, PartialRecord};

/// Identity of an extractor; the merge priority table is keyed on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorId {
    Arxiv,
    PubMed,
    Scholar,
    Meta,
    JsonLd,
    Webpage,
    Publisher,
    Doi,
}

impl ExtractorId {
    /// Every extractor id
    pub const ALL: [ExtractorId; 8] = [
        ExtractorId::Arxiv,
        ExtractorId::PubMed,
        ExtractorId::Scholar,
        ExtractorId::Meta,
        ExtractorId::JsonLd,
        ExtractorId::Webpage,
        ExtractorId::Publisher,
        ExtractorId::Doi,
    ];

    /// Short identifier used in configuration
    pub fn id(&self) -> &'static str {
        match self {
            ExtractorId::Arxiv => "arxiv",
            ExtractorId::PubMed => "pubmed",
            ExtractorId::Scholar => "scholar",
            ExtractorId::Meta => "meta",
            ExtractorId::JsonLd => "jsonld",
            ExtractorId::Webpage => "webpage",
            ExtractorId::Publisher => "publisher",
            ExtractorId::Doi => "doi",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ExtractorId::Arxiv => "arXiv",
            ExtractorId::PubMed => "PubMed",
            ExtractorId::Scholar => "Google Scholar",
            ExtractorId::Meta => "Meta tags",
            ExtractorId::JsonLd => "Structured data",
            ExtractorId::Webpage => "Web page",
            ExtractorId::Publisher => "Publisher heuristics",
            ExtractorId::Doi => "DOI",
        }
    }
}

impl fmt::Display for ExtractorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExtractorId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ExtractorId::ALL
            .iter()
            .copied()
            .find(|id| id.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown extractor: {}", s))
    }
}

/// The Extractor trait defines the interface for all metadata sources.
///
/// # Implementing a New Extractor
///
/// 1. Create a struct that implements `Extractor`
/// 2. Implement `id` and `extract`; override `applies_to` for site-specific
///    extractors and `pins_entry_type` for single-purpose sites
/// 3. Register it with [`ExtractorRegistry::register`]
/// 4. Give its id a place in the merge priority table
pub trait Extractor: Send + Sync + fmt::Debug {
    /// Identity of this extractor
    fn id(&self) -> ExtractorId;

    /// Human-readable name of this extractor
    fn name(&self) -> &str {
        self.id().name()
    }

    /// Whether this extractor should run on `page`
    fn applies_to(&self, _page: &Page) -> bool {
        true
    }

    /// Whether an `entry_type` reported by this extractor is final
    fn pins_entry_type(&self) -> bool {
        false
    }

    /// Scan the page and report whatever fields were found
    fn extract(&self, page: &Page) -> Result<PartialRecord, ExtractError>;
}

/// Errors an extractor can report. The registry degrades every one of them
/// to an empty record.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractError {
    /// A CSS selector failed to compile
    #[error("Invalid selector: {0}")]
    Selector(String),
}
