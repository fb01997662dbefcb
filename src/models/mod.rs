//! Core data models for page snapshots, metadata records and entry types.

mod entry_type;
mod envelope;
mod page;
mod record;

pub use entry_type::EntryType;
pub use envelope::{fallback_record, respond, ExtractedRecord, Request, Response};
pub use page::{domain_matches, element_text, Page, PageContext};
pub use record::{Field, MergedRecord, PartialRecord, AUTHOR_SEPARATOR};
