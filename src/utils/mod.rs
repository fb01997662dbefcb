//! Utility modules supporting metadata extraction.
//!
//! - [`normalize_date`]: turn heterogeneous date strings into [`DateParts`]
//! - [`cite_key`]: synthesise a `<surname><year><titleword>` citation key
//! - [`LabelStore`]: persisted label suggestions
//! - text helpers for whitespace, author lists and DOIs
//!
//! # Dates
//!
//! ```rust
//! use pagebib::utils::normalize_date;
//!
//! let date = normalize_date("14 Mar 2024");
//! assert_eq!((date.year.as_str(), date.month.as_str(), date.day.as_str()), ("2024", "mar", "14"));
//! ```

mod cite;
mod date;
mod labels;
mod text;

pub use cite::{
    cite_key, cite_key_from_parts, surname_token, title_token, year_token, UNKNOWN_AUTHOR,
    UNKNOWN_YEAR, UNTITLED,
};
pub use date::{
    month_from_name, month_token, normalize_date, normalize_date_with, DateParts, TextualDate,
    MONTHS,
};
pub use labels::{
    labels_note, normalize_labels, parse_labels_note, LabelStore, LabelStoreError,
    LABELS_NOTE_PREFIX, LABELS_STORAGE_KEY,
};
pub use text::{
    clean_author_name, find_doi, looks_like_url_or_handle, normalize_ws, page_range, split_author_list,
    split_keywords, strip_site_suffix, DOI_RE,
};
