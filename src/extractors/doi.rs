//! DOI extractor: the page URL first, then DOI-bearing elements.

use crate::extractors::{ExtractError, Extractor, ExtractorId};
use crate::models::{element_text, Field, Page, PartialRecord};
use crate::utils::find_doi;

/// Elements that commonly carry a DOI, with the attribute holding it
/// (`None` means the element text)
const DOI_SELECTORS: &[(&str, Option<&str>)] = &[
    ("[data-doi]", Some("data-doi")),
    ("a[href*='doi.org/10.']", Some("href")),
    (".doi", None),
    ("#doi", None),
    ("span.identifier.doi", None),
    (".citation-doi", None),
    ("[itemprop='doi']", None),
];

/// DOI extractor
#[derive(Debug, Clone, Default)]
pub struct DoiExtractor;

impl DoiExtractor {
    pub fn new() -> Self {
        Self
    }

    /// The decoded path, then each query value on its own so a match never
    /// runs into the next parameter
    fn from_url(&self, page: &Page) -> Option<String> {
        let url = page.url();
        let path = url.path();
        let decoded = urlencoding::decode(path)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| path.to_string());
        find_doi(&decoded).or_else(|| url.query_pairs().find_map(|(_, value)| find_doi(&value)))
    }

    fn from_elements(&self, page: &Page) -> Option<String> {
        DOI_SELECTORS.iter().find_map(|(css, attr)| {
            page.select(css).iter().find_map(|e| match attr {
                Some(attr) => e.value().attr(attr).and_then(find_doi),
                None => find_doi(&element_text(e)),
            })
        })
    }
}

impl Extractor for DoiExtractor {
    fn id(&self) -> ExtractorId {
        ExtractorId::Doi
    }

    fn extract(&self, page: &Page) -> Result<PartialRecord, ExtractError> {
        let mut record = PartialRecord::new();
        record.set_opt(
            Field::Doi,
            self.from_url(page).or_else(|| self.from_elements(page)),
        );
        Ok(record)
    }
}
