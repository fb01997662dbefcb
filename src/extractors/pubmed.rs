//! PubMed article page extractor.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

use crate::extractors::{ExtractError, Extractor, ExtractorId};
use crate::models::{element_text, Field, Page, PartialRecord};
use crate::utils::{find_doi, normalize_date_with, page_range, split_keywords, TextualDate};

const PUBMED_DOMAIN: &str = "pubmed.ncbi.nlm.nih.gov";
const PUBMED_NAME: &str = "PubMed";

/// Citation line such as `2024 Mar;30(3):123-130. doi: ...`
static CITATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<date>[^;.]+?)\s*;\s*(?P<volume>[^(:;.\s]+)?\s*(?:\((?P<issue>[^)]+)\))?\s*(?::\s*(?P<pages>[A-Za-z]?\d+(?:\s*[-–]\s*[A-Za-z]?\d+)?))?").unwrap()
});

/// PubMed extractor
#[derive(Debug, Clone, Default)]
pub struct PubMedExtractor;

impl PubMedExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Authors from the first author list; PubMed renders a short and an
    /// expanded list of the same names.
    fn authors(&self, page: &Page) -> Result<Vec<String>, ExtractError> {
        let name = Selector::parse(".full-name").map_err(|e| ExtractError::Selector(e.to_string()))?;
        let names: Vec<String> = page
            .select(".authors-list")
            .first()
            .map(|list| list.select(&name).map(|e| element_text(&e)).collect())
            .unwrap_or_default();
        Ok(names)
    }

    fn citation(&self, page: &Page, record: &mut PartialRecord) {
        let Some(cit) = page.select_text(".article-source .cit").or_else(|| page.select_text(".cit"))
        else {
            return;
        };
        let Some(caps) = CITATION_RE.captures(&cit) else {
            tracing::debug!("Unrecognised PubMed citation line: {}", cit);
            return;
        };
        if let Some(date) = caps.name("date") {
            record.set_date(&normalize_date_with(date.as_str(), &[TextualDate::YearMonthDay]));
        }
        record.set_opt(Field::Volume, caps.name("volume").map(|m| m.as_str()));
        record.set_opt(Field::Issue, caps.name("issue").map(|m| m.as_str()));
        record.set_opt(Field::Pages, caps.name("pages").map(|m| page_range(m.as_str())));
    }

    fn keywords(&self, page: &Page) -> Option<String> {
        let paragraph = page
            .select("#abstract p, .abstract p")
            .into_iter()
            .map(|p| element_text(&p))
            .find(|t| t.to_ascii_lowercase().starts_with("keywords:"))?;
        let list = paragraph["keywords:".len()..].trim().trim_end_matches('.');
        let words = split_keywords(list);
        (!words.is_empty()).then(|| words.join(", "))
    }
}

impl Extractor for PubMedExtractor {
    fn id(&self) -> ExtractorId {
        ExtractorId::PubMed
    }

    fn applies_to(&self, page: &Page) -> bool {
        page.on_domain(PUBMED_DOMAIN)
    }

    fn extract(&self, page: &Page) -> Result<PartialRecord, ExtractError> {
        let mut record = PartialRecord::new();
        record.set(Field::Source, PUBMED_NAME);
        record.set(Field::SiteName, PUBMED_NAME);
        record.set(Field::Url, page.url().as_str());

        record.set_opt(Field::Title, page.select_text("h1.heading-title"));
        record.set_authors(self.authors(page)?);

        let journal = page
            .select_attr("#full-view-journal-trigger", "title")
            .or_else(|| page.select_text("#full-view-journal-trigger"))
            .or_else(|| page.select_text(".journal-actions-trigger"));
        record.set_opt(Field::Journal, journal);

        self.citation(page, &mut record);

        let doi = page
            .select_text("span.identifier.doi a.id-link")
            .or_else(|| page.select_attr("span.identifier.doi a", "href"))
            .and_then(|s| find_doi(&s));
        record.set_opt(Field::Doi, doi);

        let abstract_text = page
            .select_text("#eng-abstract")
            .or_else(|| page.select_text(".abstract-content"));
        record.set_opt(Field::Abstract, abstract_text);
        record.set_opt(Field::Keywords, self.keywords(page));

        Ok(record)
    }
}
