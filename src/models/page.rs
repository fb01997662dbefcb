//! Read-only snapshot of a web page handed to every extractor.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::utils::normalize_ws;

/// A parsed page together with the URL it was loaded from
///
/// Extractors only ever borrow a `Page`; nothing mutates it after parsing.
#[derive(Debug)]
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    /// Parse an HTML document loaded from `url`
    pub fn new(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    /// Parse an HTML document, validating the URL first
    pub fn parse(url: &str, html: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(url.trim())?, html))
    }

    /// The page URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The parsed document
    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Lowercased host without a leading `www.`
    pub fn domain(&self) -> String {
        let host = self.url.host_str().unwrap_or_default().to_ascii_lowercase();
        host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
    }

    /// Whether the host equals `domain` or is a subdomain of it
    pub fn on_domain(&self, domain: &str) -> bool {
        domain_matches(&self.domain(), domain)
    }

    /// All elements matching a CSS selector. An invalid selector matches nothing.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.document.select(&selector).collect(),
            Err(_) => {
                tracing::debug!("invalid selector: {}", css);
                Vec::new()
            }
        }
    }

    /// Whitespace-normalised text of the first non-blank element matching `css`
    pub fn select_text(&self, css: &str) -> Option<String> {
        self.select(css)
            .into_iter()
            .map(|e| element_text(&e))
            .find(|t| !t.is_empty())
    }

    /// Trimmed value of `attr` on the first element matching `css` that carries it
    pub fn select_attr(&self, css: &str, attr: &str) -> Option<String> {
        self.select(css)
            .into_iter()
            .filter_map(|e| e.value().attr(attr).map(|v| v.trim().to_string()))
            .find(|v| !v.is_empty())
    }

    /// Contents of the `<title>` element
    pub fn title(&self) -> Option<String> {
        self.select_text("title")
    }

    /// Visible text of the body, whitespace-normalised, capped at `limit` characters
    pub fn body_text(&self, limit: usize) -> String {
        let text = self
            .select("body")
            .first()
            .map(element_text)
            .unwrap_or_default();
        text.chars().take(limit).collect()
    }

    /// Everything the classifier needs to know about the page itself
    pub fn context(&self) -> PageContext {
        PageContext {
            domain: self.domain(),
            page_type: self
                .select_attr("meta[property='og:type']", "content")
                .map(|t| t.to_ascii_lowercase()),
            title: self.title(),
        }
    }
}

/// Collect the text of an element, skipping script and style content
pub fn element_text(element: &ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        if let Some(text) = node.value().as_text() {
            let skip = node
                .parent()
                .and_then(|p| p.value().as_element().map(|e| e.name()))
                .map(|n| matches!(n, "script" | "style" | "noscript"))
                .unwrap_or(false);
            if !skip {
                out.push_str(text);
                out.push(' ');
            }
        }
    }
    normalize_ws(&out)
}

/// Whether `host` equals `domain` or is one of its subdomains
pub fn domain_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.');
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Page-level signals used when classifying the entry type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Lowercased host without `www.`
    pub domain: String,
    /// Value of the page-type hint (`og:type`), lowercased
    pub page_type: Option<String>,
    /// Raw document title
    pub title: Option<String>,
}

impl PageContext {
    /// Whether the page's domain matches any entry of `domains`
    pub fn on_any(&self, domains: &[&str]) -> bool {
        domains.iter().any(|d| domain_matches(&self.domain, d))
    }
}
