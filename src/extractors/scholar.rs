//! Google Scholar citation page extractor.
//!
//! Scholar "view citation" pages show a two-column table of labelled rows.
//! Each known label maps to one field.

use scraper::Selector;

use crate::extractors::{ExtractError, Extractor, ExtractorId};
use crate::models::{element_text, Field, Page, PartialRecord};
use crate::utils::{normalize_date, page_range};

const SCHOLAR_HOST_PREFIX: &str = "scholar.google.";
const SCHOLAR_NAME: &str = "Google Scholar";

/// Row labels (lowercase) and the field each one fills
const ROWS: &[(&str, Field)] = &[
    ("journal", Field::Journal),
    ("source", Field::Journal),
    ("book", Field::Journal),
    ("conference", Field::Conference),
    ("volume", Field::Volume),
    ("issue", Field::Issue),
    ("publisher", Field::Publisher),
    ("institution", Field::Publisher),
    ("description", Field::Abstract),
];

/// Google Scholar extractor
#[derive(Debug, Clone, Default)]
pub struct ScholarExtractor;

impl ScholarExtractor {
    pub fn new() -> Self {
        Self
    }

    /// `(label, value)` pairs from the citation table, labels lowercased
    fn rows(&self, page: &Page) -> Result<Vec<(String, String)>, ExtractError> {
        let field = selector(".gsc_oci_field")?;
        let value = selector(".gsc_oci_value")?;
        let rows = page
            .select("#gsc_oci_table .gs_scl")
            .into_iter()
            .filter_map(|row| {
                let label = row.select(&field).next().map(|e| element_text(&e))?;
                let text = row.select(&value).next().map(|e| element_text(&e))?;
                Some((label.to_ascii_lowercase(), text))
            })
            .collect();
        Ok(rows)
    }
}

impl Extractor for ScholarExtractor {
    fn id(&self) -> ExtractorId {
        ExtractorId::Scholar
    }

    fn applies_to(&self, page: &Page) -> bool {
        page.domain().starts_with(SCHOLAR_HOST_PREFIX)
    }

    fn extract(&self, page: &Page) -> Result<PartialRecord, ExtractError> {
        let mut record = PartialRecord::new();
        record.set(Field::Source, SCHOLAR_NAME);

        record.set_opt(Field::Title, page.select_text("#gsc_oci_title"));
        record.set_opt(
            Field::Url,
            page.select_attr("#gsc_oci_title a.gsc_oci_title_link", "href"),
        );
        record.set_opt(Field::PdfUrl, page.select_attr("#gsc_oci_title_gg a", "href"));

        for (label, text) in self.rows(page)? {
            match label.as_str() {
                "authors" | "inventors" => {
                    record.set_authors(text.split(',').map(str::trim));
                }
                "publication date" => record.set_date(&normalize_date(&text)),
                "pages" => record.set(Field::Pages, page_range(&text)),
                other => {
                    if let Some((_, field)) = ROWS.iter().find(|(l, _)| *l == other) {
                        record.set_if_absent(*field, text);
                    }
                }
            }
        }

        Ok(record)
    }
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(e.to_string()))
}
