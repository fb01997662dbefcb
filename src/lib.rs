//! # pagebib
//!
//! Extract bibliographic metadata from a web page and render it as BibTeX.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (records, entry types, page snapshots, envelopes)
//! - [`extractors`]: Metadata extractors with an extensible trait-based architecture
//! - [`pipeline`]: Runs extractors, merges their output, classifies and keys the result
//! - [`bibtex`]: Entry-type field schemas and BibTeX serialization
//! - [`utils`]: Date normalization, citation keys, text helpers and the label cache
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pagebib::bibtex::BibtexRecord;
//! use pagebib::Pipeline;
//!
//! let html = r#"<html><head>
//!   <meta name="citation_title" content="Understanding Deep Learning Systems">
//!   <meta name="citation_author" content="Doe, Jane">
//!   <meta name="citation_publication_date" content="2023/05/01">
//!   <meta name="citation_journal_title" content="Journal of Tests">
//! </head><body></body></html>"#;
//!
//! let extraction = Pipeline::default()
//!     .extract_html("https://journal.example.org/a/1", html)
//!     .unwrap();
//! assert_eq!(extraction.cite_key, "doe2023understand");
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let entry = BibtexRecord::build(
//!     extraction.entry_type,
//!     &extraction.cite_key,
//!     &extraction.record,
//!     &[],
//!     today,
//! );
//! assert!(entry.to_string().starts_with("@article{doe2023understand,"));
//! ```

pub mod bibtex;
pub mod config;
pub mod extractors;
pub mod models;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use bibtex::{BibtexRecord, FieldOverrides};
pub use extractors::{Extractor, ExtractorId, ExtractorRegistry};
pub use models::{EntryType, Field, MergedRecord, Page, PartialRecord};
pub use pipeline::{Extraction, Pipeline, PipelineError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
