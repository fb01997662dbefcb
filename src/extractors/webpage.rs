//! Generic fallback extractor for arbitrary web pages.

use crate::extractors::{ExtractError, Extractor, ExtractorId};
use crate::models::{element_text, Field, Page, PartialRecord};
use crate::utils::{
    clean_author_name, looks_like_url_or_handle, normalize_date, split_author_list,
    strip_site_suffix,
};

/// Selectors tried in order for the publication date, with the attribute
/// holding the value (`None` means the element text)
const DATE_SELECTORS: &[(&str, Option<&str>)] = &[
    ("time[datetime]", Some("datetime")),
    ("[itemprop='datePublished']", Some("content")),
    ("[itemprop='datePublished']", Some("datetime")),
    ("[itemprop='datePublished']", None),
    (".published", None),
    (".post-date", None),
    (".entry-date", None),
    (".date", None),
];

/// Selectors tried in order for the byline
const BYLINE_SELECTORS: &[&str] = &[
    "[rel='author']",
    ".byline",
    ".author-name",
    "[itemprop='author'] [itemprop='name']",
    "[itemprop='author']",
    ".author",
];

const DESCRIPTION_SELECTORS: &[(&str, &str)] = &[
    ("meta[name='description']", "content"),
    ("meta[property='og:description']", "content"),
];

const SITE_NAME_SELECTORS: &[(&str, &str)] = &[
    ("meta[property='og:site_name']", "content"),
    ("meta[name='application-name']", "content"),
];

/// Web page extractor
#[derive(Debug, Clone, Default)]
pub struct WebpageExtractor;

impl WebpageExtractor {
    pub fn new() -> Self {
        Self
    }

    fn date(&self, page: &Page) -> Option<String> {
        DATE_SELECTORS.iter().find_map(|(css, attr)| match attr {
            Some(attr) => page.select_attr(css, attr),
            None => page.select_text(css),
        })
    }

    fn byline(&self, page: &Page) -> Vec<String> {
        for css in BYLINE_SELECTORS {
            let names: Vec<String> = page
                .select(css)
                .iter()
                .map(element_text)
                .flat_map(|t| split_author_list(&t))
                .map(|n| clean_author_name(&n))
                .filter(|n| !n.is_empty() && !looks_like_url_or_handle(n))
                .fold(Vec::new(), |mut acc, n| {
                    if !acc.contains(&n) {
                        acc.push(n);
                    }
                    acc
                });
            if !names.is_empty() {
                return names;
            }
        }
        Vec::new()
    }
}

impl Extractor for WebpageExtractor {
    fn id(&self) -> ExtractorId {
        ExtractorId::Webpage
    }

    fn extract(&self, page: &Page) -> Result<PartialRecord, ExtractError> {
        let mut record = PartialRecord::new();

        let site_name = SITE_NAME_SELECTORS
            .iter()
            .find_map(|(css, attr)| page.select_attr(css, attr))
            .unwrap_or_else(|| page.domain());
        record.set(Field::SiteName, &site_name);
        record.set(Field::Organization, &site_name);

        if let Some(title) = page.title() {
            record.set(Field::Title, strip_site_suffix(&title, &site_name));
        }

        if let Some(date) = self.date(page) {
            record.set_date(&normalize_date(&date));
        }

        record.set_authors(self.byline(page));

        record.set_opt(
            Field::Abstract,
            DESCRIPTION_SELECTORS
                .iter()
                .find_map(|(css, attr)| page.select_attr(css, attr)),
        );

        let url = page
            .select_attr("link[rel='canonical']", "href")
            .and_then(|href| page.url().join(&href).ok())
            .unwrap_or_else(|| page.url().clone());
        record.set(Field::Url, url.as_str());

        Ok(record)
    }
}
