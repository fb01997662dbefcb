//! arXiv abstract page extractor.
//!
//! Every arXiv page is a preprint, so this extractor pins the entry type to
//! `misc` and records the eprint identifier.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::{ExtractError, Extractor, ExtractorId};
use crate::models::{EntryType, Field, Page, PartialRecord};
use crate::utils::{find_doi, normalize_date_with, split_keywords, TextualDate};

const ARXIV_DOMAIN: &str = "arxiv.org";
const ARXIV_NAME: &str = "arXiv";
const ARXIV_DOI_PREFIX: &str = "10.48550/arXiv.";

/// New-style (`2403.01234`) and old-style (`hep-th/9901001`) identifiers,
/// with an optional version suffix
static ARXIV_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|/)(\d{4}\.\d{4,5}|[a-z][a-z\-]*(?:\.[A-Z]{2})?/\d{7})(v\d+)?(?:\.pdf)?$").unwrap()
});

/// arXiv extractor
#[derive(Debug, Clone, Default)]
pub struct ArxivExtractor;

impl ArxivExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Identifier from an `/abs/` or `/pdf/` path, without its version
    fn id_from_url(&self, page: &Page) -> Option<String> {
        let path = page.url().path().trim_end_matches('/');
        let rest = path
            .strip_prefix("/abs/")
            .or_else(|| path.strip_prefix("/pdf/"))?;
        let rooted = format!("/{}", rest);
        let caps = ARXIV_ID_RE.captures(&rooted)?;
        Some(caps.get(1)?.as_str().to_string())
    }

    fn id_from_meta(&self, page: &Page) -> Option<String> {
        let raw = page.select_attr("meta[name='citation_arxiv_id']", "content")?;
        let caps = ARXIV_ID_RE.captures(raw.trim())?;
        Some(caps.get(1)?.as_str().to_string())
    }
}

impl Extractor for ArxivExtractor {
    fn id(&self) -> ExtractorId {
        ExtractorId::Arxiv
    }

    fn applies_to(&self, page: &Page) -> bool {
        page.on_domain(ARXIV_DOMAIN)
    }

    fn pins_entry_type(&self) -> bool {
        true
    }

    fn extract(&self, page: &Page) -> Result<PartialRecord, ExtractError> {
        let mut record = PartialRecord::new();
        record.set(Field::EntryType, EntryType::Misc.as_str());
        record.set(Field::SiteName, ARXIV_NAME);
        record.set(Field::Publisher, ARXIV_NAME);
        record.set(Field::Source, ARXIV_NAME);

        record.set_opt(
            Field::Title,
            page.select_text("h1.title").map(|t| strip_descriptor(&t, "Title:")),
        );

        let authors: Vec<String> = page
            .select(".authors a")
            .iter()
            .map(crate::models::element_text)
            .collect();
        record.set_authors(authors);

        record.set_opt(
            Field::Abstract,
            page.select_text("blockquote.abstract")
                .map(|t| strip_descriptor(&t, "Abstract:")),
        );

        // "[Submitted on 1 Feb 2023 (v1), last revised ...]": the first date is
        // the original submission.
        if let Some(dateline) = page.select_text(".dateline") {
            record.set_date(&normalize_date_with(&dateline, &[TextualDate::DayMonthYear]));
        }

        if let Some(subjects) = page.select_text("td.subjects") {
            let words = split_keywords(&subjects);
            if !words.is_empty() {
                record.set(Field::Keywords, words.join(", "));
            }
        }

        let id = self.id_from_url(page).or_else(|| self.id_from_meta(page));
        match id {
            Some(id) => {
                record.set(Field::ArxivId, &id);
                record.set(Field::Eprint, &id);
                record.set(Field::ArchivePrefix, ARXIV_NAME);
                record.set(Field::Url, format!("https://arxiv.org/abs/{}", id));
                record.set(Field::PdfUrl, format!("https://arxiv.org/pdf/{}", id));

                let doi = page
                    .select_attr(".arxivdoi a", "href")
                    .and_then(|href| find_doi(&href))
                    .unwrap_or_else(|| format!("{}{}", ARXIV_DOI_PREFIX, id));
                record.set(Field::Doi, doi);
            }
            None => {
                tracing::debug!("No arXiv identifier on {}", page.url());
                record.set(Field::Url, page.url().as_str());
            }
        }

        Ok(record)
    }
}

fn strip_descriptor(text: &str, descriptor: &str) -> String {
    let t = text.trim();
    match t.get(..descriptor.len()) {
        Some(head) if head.eq_ignore_ascii_case(descriptor) => t[descriptor.len()..].trim().to_string(),
        _ => t.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABS_PAGE: &str = r#"<html><head><title>[1706.03762] Attention Is All You Need</title></head>
        <body>
        <h1 class="title mathjax"><span class="descriptor">Title:</span>Attention Is All You Need</h1>
        <div class="authors"><span class="descriptor">Authors:</span>
          <a href="/a/vaswani_a_1">Ashish Vaswani</a>, <a href="/a/shazeer_n_1">Noam Shazeer</a></div>
        <div class="dateline">[Submitted on 12 Jun 2017 (<a href="/abs/1706.03762v1">v1</a>), last revised 2 Aug 2023 (this version, v7)]</div>
        <blockquote class="abstract mathjax"><span class="descriptor">Abstract:</span>The dominant sequence transduction models...</blockquote>
        <table><tr><td class="tablecell subjects"><span class="primary-subject">Computation and Language (cs.CL)</span>; Machine Learning (cs.LG)</td></tr>
        <tr><td class="tablecell arxivdoi"><a href="https://doi.org/10.48550/arXiv.1706.03762">https://doi.org/10.48550/arXiv.1706.03762</a></td></tr></table>
        </body></html>"#;

    #[test]
    fn test_applies_only_to_arxiv() {
        let ex = ArxivExtractor::new();
        let page = Page::parse("https://arxiv.org/abs/1706.03762", ABS_PAGE).unwrap();
        assert!(ex.applies_to(&page));
        let other = Page::parse("https://example.org/abs/1706.03762", ABS_PAGE).unwrap();
        assert!(!ex.applies_to(&other));
        assert!(ex.pins_entry_type());
    }

    #[test]
    fn test_abstract_page() {
        let page = Page::parse("https://arxiv.org/abs/1706.03762v7", ABS_PAGE).unwrap();
        let record = ArxivExtractor::new().extract(&page).unwrap();

        assert_eq!(record.get(Field::Title), Some("Attention Is All You Need"));
        assert_eq!(record.get(Field::Authors), Some("Ashish Vaswani and Noam Shazeer"));
        assert_eq!(record.get(Field::Year), Some("2017"));
        assert_eq!(record.get(Field::Month), Some("jun"));
        assert_eq!(record.get(Field::Day), Some("12"));
        assert_eq!(record.get(Field::ArxivId), Some("1706.03762"));
        assert_eq!(record.get(Field::Eprint), Some("1706.03762"));
        assert_eq!(record.get(Field::ArchivePrefix), Some("arXiv"));
        assert_eq!(record.get(Field::EntryType), Some("misc"));
        assert_eq!(record.get(Field::Doi), Some("10.48550/arXiv.1706.03762"));
        assert_eq!(record.get(Field::PdfUrl), Some("https://arxiv.org/pdf/1706.03762"));
        assert_eq!(
            record.get(Field::Abstract),
            Some("The dominant sequence transduction models...")
        );
        assert_eq!(
            record.get(Field::Keywords),
            Some("Computation and Language (cs.CL), Machine Learning (cs.LG)")
        );
    }

    #[test]
    fn test_old_style_pdf_id() {
        let page = Page::parse("https://arxiv.org/pdf/hep-th/9901001v2.pdf", "<html></html>").unwrap();
        let record = ArxivExtractor::new().extract(&page).unwrap();
        assert_eq!(record.get(Field::Eprint), Some("hep-th/9901001"));
        assert_eq!(record.get(Field::Doi), Some("10.48550/arXiv.hep-th/9901001"));
    }

    #[test]
    fn test_strip_descriptor() {
        assert_eq!(strip_descriptor("Title: X", "Title:"), "X");
        assert_eq!(strip_descriptor("Plain", "Title:"), "Plain");
    }
}
