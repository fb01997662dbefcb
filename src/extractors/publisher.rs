//! Publisher heuristics: volume, issue and page patterns in visible text.
//!
//! Low confidence; only consulted when no other extractor supplied a value.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::{ExtractError, Extractor, ExtractorId};
use crate::models::{Field, Page, PartialRecord};
use crate::utils::page_range;

/// Default number of body characters scanned
pub const DEFAULT_BODY_SCAN_LIMIT: usize = 20_000;

static VOLUME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:vol\.?|volume)\s*(\d{1,4})\b").unwrap());
static ISSUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:issue|no\.|number)\s*(\d{1,4})\b").unwrap());
static PAGES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:pp\.?|pages?)\s*([A-Za-z]?\d+\s*(?:-+|–|—)\s*[A-Za-z]?\d+)").unwrap()
});

/// Publisher heuristics extractor
#[derive(Debug, Clone)]
pub struct PublisherHeuristicsExtractor {
    body_scan_limit: usize,
}

impl PublisherHeuristicsExtractor {
    /// Scan at most `body_scan_limit` characters of body text
    pub fn new(body_scan_limit: usize) -> Self {
        Self { body_scan_limit }
    }
}

impl Default for PublisherHeuristicsExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_BODY_SCAN_LIMIT)
    }
}

impl Extractor for PublisherHeuristicsExtractor {
    fn id(&self) -> ExtractorId {
        ExtractorId::Publisher
    }

    fn extract(&self, page: &Page) -> Result<PartialRecord, ExtractError> {
        let text = page.body_text(self.body_scan_limit);
        let mut record = PartialRecord::new();
        if text.is_empty() {
            return Ok(record);
        }

        record.set_opt(Field::Volume, first_capture(&VOLUME_RE, &text));
        record.set_opt(Field::Issue, first_capture(&ISSUE_RE, &text));
        record.set_opt(
            Field::Pages,
            first_capture(&PAGES_RE, &text).map(|p| page_range(&p)),
        );

        Ok(record)
    }
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(body: &str, limit: usize) -> PartialRecord {
        let html = format!("<html><body>{}</body></html>", body);
        let page = Page::parse("https://publisher.example.com/article/1", &html).unwrap();
        PublisherHeuristicsExtractor::new(limit).extract(&page).unwrap()
    }

    #[test]
    fn test_volume_issue_pages() {
        let record = extract(
            "<p>Journal of Examples, Vol. 12, No. 4, pp. 233–250, 2020</p>",
            DEFAULT_BODY_SCAN_LIMIT,
        );
        assert_eq!(record.get(Field::Volume), Some("12"));
        assert_eq!(record.get(Field::Issue), Some("4"));
        assert_eq!(record.get(Field::Pages), Some("233--250"));
    }

    #[test]
    fn test_scan_limit() {
        let body = format!("<p>{}</p><p>Volume 9</p>", "x ".repeat(100));
        assert!(!extract(&body, 50).has(Field::Volume));
        assert_eq!(extract(&body, 1000).get(Field::Volume), Some("9"));
    }

    #[test]
    fn test_no_patterns() {
        assert!(extract("<p>Nothing to see.</p>", DEFAULT_BODY_SCAN_LIMIT).is_empty());
    }
}
