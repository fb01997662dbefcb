//! Named meta tag extractor.
//!
//! Each field is resolved through an ordered list of tag names covering the
//! Highwire `citation_*` family, Dublin Core, PRISM, OpenGraph and Twitter
//! cards, and the plain HTML `description`/`keywords` tags. The first name
//! present wins. Names are compared case-insensitively and may come from
//! either the `name` or the `property` attribute.

use crate::extractors::{ExtractError, Extractor, ExtractorId};
use crate::models::{Field, Page, PartialRecord};
use crate::utils::{
    find_doi, looks_like_url_or_handle, normalize_date, normalize_ws, split_author_list,
};

/// Single-valued fields and the tag names consulted for them, in order
const CONVENTIONS: &[(Field, &[&str])] = &[
    (
        Field::Title,
        &[
            "citation_title",
            "dc.title",
            "dcterms.title",
            "prism.title",
            "og:title",
            "twitter:title",
        ],
    ),
    (
        Field::Journal,
        &[
            "citation_journal_title",
            "prism.publicationname",
            "dc.source",
        ],
    ),
    (
        Field::Conference,
        &["citation_conference_title", "citation_conference"],
    ),
    (Field::Volume, &["citation_volume", "prism.volume"]),
    (Field::Issue, &["citation_issue", "prism.number", "prism.issueidentifier"]),
    (
        Field::Abstract,
        &[
            "citation_abstract",
            "dcterms.abstract",
            "dc.description",
            "og:description",
            "twitter:description",
            "description",
        ],
    ),
    (
        Field::Publisher,
        &[
            "citation_publisher",
            "dc.publisher",
            "dcterms.publisher",
            "citation_dissertation_institution",
            "citation_technical_report_institution",
        ],
    ),
    (Field::Isbn, &["citation_isbn", "prism.isbn"]),
    (Field::Issn, &["citation_issn", "prism.issn", "prism.eissn"]),
    (
        Field::Url,
        &["citation_abstract_html_url", "citation_public_url", "og:url", "prism.url"],
    ),
    (Field::PdfUrl, &["citation_pdf_url"]),
    (Field::SiteName, &["og:site_name"]),
    (Field::ArxivId, &["citation_arxiv_id"]),
];

/// Author tags; repeated tags are collected in document order
const AUTHOR_TAGS: &[&str] = &[
    "citation_author",
    "dc.creator",
    "dcterms.creator",
    "author",
    "article:author",
    "twitter:creator",
];

const DATE_TAGS: &[&str] = &[
    "citation_publication_date",
    "citation_date",
    "citation_online_date",
    "citation_cover_date",
    "dc.date",
    "dcterms.issued",
    "dcterms.date",
    "prism.publicationdate",
    "article:published_time",
    "og:published_time",
];

const DOI_TAGS: &[&str] = &[
    "citation_doi",
    "prism.doi",
    "bepress_citation_doi",
    "dc.identifier",
    "dcterms.identifier",
];

const KEYWORD_TAGS: &[&str] = &["citation_keywords", "keywords", "dc.subject", "article:tag"];

const FIRST_PAGE_TAGS: &[&str] = &["citation_firstpage", "prism.startingpage"];
const LAST_PAGE_TAGS: &[&str] = &["citation_lastpage", "prism.endingpage"];

/// A `<meta>` tag reduced to its lowercase name and content
#[derive(Debug, Clone)]
struct MetaTag {
    name: String,
    content: String,
}

/// Meta tag extractor
#[derive(Debug, Clone, Default)]
pub struct MetaTagExtractor;

impl MetaTagExtractor {
    pub fn new() -> Self {
        Self
    }

    fn collect(&self, page: &Page) -> Vec<MetaTag> {
        page.select("meta[content]")
            .into_iter()
            .filter_map(|e| {
                let el = e.value();
                let name = el.attr("name").or_else(|| el.attr("property"))?;
                let content = normalize_ws(el.attr("content")?);
                if content.is_empty() {
                    return None;
                }
                Some(MetaTag {
                    name: name.trim().to_ascii_lowercase(),
                    content,
                })
            })
            .collect()
    }
}

impl Extractor for MetaTagExtractor {
    fn id(&self) -> ExtractorId {
        ExtractorId::Meta
    }

    fn extract(&self, page: &Page) -> Result<PartialRecord, ExtractError> {
        let tags = self.collect(page);
        let mut record = PartialRecord::new();
        if tags.is_empty() {
            return Ok(record);
        }

        for (field, names) in CONVENTIONS {
            record.set_opt(*field, first(&tags, names));
        }

        record.set_authors(authors(&tags));

        if let Some(date) = first(&tags, DATE_TAGS) {
            record.set_date(&normalize_date(&date));
        }

        let doi = DOI_TAGS
            .iter()
            .flat_map(|name| all(&tags, name))
            .find_map(|value| find_doi(&value));
        record.set_opt(Field::Doi, doi);

        match (first(&tags, FIRST_PAGE_TAGS), first(&tags, LAST_PAGE_TAGS)) {
            (Some(start), Some(end)) if start != end => {
                record.set(Field::Pages, format!("{}--{}", start, end))
            }
            (Some(start), _) => record.set(Field::Pages, start),
            _ => {}
        }

        let keywords = KEYWORD_TAGS
            .iter()
            .map(|name| all(&tags, name))
            .find(|values| !values.is_empty())
            .unwrap_or_default();
        if !keywords.is_empty() {
            record.set(Field::Keywords, keywords.join(", "));
        }

        Ok(record)
    }
}

/// Content of the first tag whose name appears in `names`, by name order
fn first(tags: &[MetaTag], names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| tags.iter().find(|t| t.name == *name))
        .map(|t| t.content.clone())
}

/// Contents of every tag called `name`, in document order
fn all(tags: &[MetaTag], name: &str) -> Vec<String> {
    tags.iter()
        .filter(|t| t.name == name)
        .map(|t| t.content.clone())
        .collect()
}

/// Authors from the first convention that yields a real name.
///
/// Profile URLs and `@handles` are not names and are skipped.
fn authors(tags: &[MetaTag]) -> Vec<String> {
    for name in AUTHOR_TAGS {
        let values = all(tags, name);
        let names: Vec<String> = if values.len() == 1 {
            split_author_list(&values[0])
        } else {
            values
        }
        .into_iter()
        .filter(|v| !looks_like_url_or_handle(v))
        .collect();
        if !names.is_empty() {
            return names;
        }
    }
    Vec::new()
}
