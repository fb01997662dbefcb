//! Extraction request/response envelopes.
//!
//! A host sends one [`Request`] per extraction cycle and gets back exactly one
//! [`Response`]. When no response can be obtained at all, the host falls back
//! to [`fallback_record`].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{EntryType, Field, MergedRecord, PartialRecord};
use crate::pipeline::{Extraction, Pipeline};
use crate::utils::cite_key_from_parts;

/// An extraction request. It carries no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Request {
    Extract,
}

/// The merged record plus the fields derived from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    #[serde(flatten)]
    pub record: MergedRecord,
    pub entry_type: EntryType,
    pub cite_key: String,
    pub page_url: String,
}

impl From<Extraction> for ExtractedRecord {
    fn from(extraction: Extraction) -> Self {
        Self {
            record: extraction.record,
            entry_type: extraction.entry_type,
            cite_key: extraction.cite_key,
            page_url: extraction.page_url,
        }
    }
}

/// Outcome of one extraction request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Success { data: ExtractedRecord },
    Failure { error: String },
}

impl Response {
    /// Whether the request succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }
}

/// Answer a request for the page at `page_url`.
///
/// Never panics: invalid URLs and panics inside extraction become a
/// [`Response::Failure`].
pub fn respond(pipeline: &Pipeline, request: Request, page_url: &str, html: &str) -> Response {
    match request {
        Request::Extract => match pipeline.extract_html(page_url, html) {
            Ok(extraction) => Response::Success {
                data: extraction.into(),
            },
            Err(e) => Response::Failure {
                error: e.to_string(),
            },
        },
    }
}

/// Minimal record built from only the page title and URL.
///
/// The entry type is `online` for web URLs and `misc` otherwise; the cite key
/// uses `today`'s year.
pub fn fallback_record(title: Option<&str>, url: &str, today: NaiveDate) -> ExtractedRecord {
    let mut record = PartialRecord::new();
    record.set_opt(Field::Title, title);
    record.set(Field::Url, url);

    let url = url.trim();
    let is_web = url::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false);
    let entry_type = if is_web {
        EntryType::Online
    } else {
        EntryType::Misc
    };

    let year = today.year().to_string();
    ExtractedRecord {
        cite_key: cite_key_from_parts(None, Some(&year), title),
        record: MergedRecord::from_partial(record),
        entry_type,
        page_url: url.to_string(),
    }
}
