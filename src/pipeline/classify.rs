//! Entry-type classification.
//!
//! A pinned type from a single-purpose site wins, then a structured-data
//! hint, then the first matching rule of [`RULES`]. Several rules can match
//! the same record, so their order is part of the contract.

use crate::models::{EntryType, Field, MergedRecord, PageContext};

pub const PREPRINT_DOMAINS: &[&str] = &[
    "arxiv.org",
    "biorxiv.org",
    "medrxiv.org",
    "ssrn.com",
    "osf.io",
    "preprints.org",
    "researchsquare.com",
    "chemrxiv.org",
];

pub const NEWS_DOMAINS: &[&str] = &[
    "nytimes.com",
    "theguardian.com",
    "bbc.co.uk",
    "bbc.com",
    "reuters.com",
    "washingtonpost.com",
    "cnn.com",
    "apnews.com",
    "wsj.com",
    "ft.com",
    "npr.org",
    "bloomberg.com",
];

pub const BLOG_DOMAINS: &[&str] = &[
    "medium.com",
    "substack.com",
    "wordpress.com",
    "blogspot.com",
    "ghost.io",
    "dev.to",
    "hashnode.dev",
    "tumblr.com",
];

pub const CODE_DOMAINS: &[&str] = &[
    "github.com",
    "gitlab.com",
    "bitbucket.org",
    "sourceforge.net",
    "codeberg.org",
    "crates.io",
    "pypi.org",
    "npmjs.com",
];

pub const DATASET_DOMAINS: &[&str] = &[
    "zenodo.org",
    "figshare.com",
    "kaggle.com",
    "datadryad.org",
    "dataverse.harvard.edu",
    "data.mendeley.com",
];

pub const VIDEO_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "dailymotion.com",
    "twitch.tv",
    "bilibili.com",
];

type Predicate = fn(&MergedRecord, &PageContext) -> bool;

/// Heuristic rules, evaluated top to bottom; the first match wins
pub const RULES: &[(&str, Predicate, EntryType)] = &[
    ("preprint-domain", |_, ctx| ctx.on_any(PREPRINT_DOMAINS), EntryType::Misc),
    ("conference", |r, _| r.has(Field::Conference), EntryType::Inproceedings),
    (
        "isbn-without-journal",
        |r, _| r.has(Field::Isbn) && !r.has(Field::Journal),
        EntryType::Book,
    ),
    ("journal", |r, _| r.has(Field::Journal), EntryType::Article),
    ("thesis", mentions_thesis, EntryType::Phdthesis),
    (
        "news-article",
        |_, ctx| is_article_page(ctx) && ctx.on_any(NEWS_DOMAINS),
        EntryType::ArticleNewspaper,
    ),
    (
        "blog-article",
        |_, ctx| is_article_page(ctx) && ctx.on_any(BLOG_DOMAINS),
        EntryType::ArticleBlog,
    ),
    ("article-page", |_, ctx| is_article_page(ctx), EntryType::ArticleMagazine),
    ("code-host", |_, ctx| ctx.on_any(CODE_DOMAINS), EntryType::Software),
    ("dataset-repository", |_, ctx| ctx.on_any(DATASET_DOMAINS), EntryType::Dataset),
    ("video-platform", |_, ctx| ctx.on_any(VIDEO_DOMAINS), EntryType::Video),
    (
        "site-without-doi",
        |r, _| r.has(Field::SiteName) && !r.has(Field::Doi),
        EntryType::Online,
    ),
    (
        "publisher-without-journal",
        |r, _| r.has(Field::Publisher) && !r.has(Field::Journal),
        EntryType::Book,
    ),
];

/// Used when no rule matches
pub const DEFAULT_ENTRY_TYPE: EntryType = EntryType::Misc;

/// Decide the entry type of a merged record
pub fn classify(
    pinned: Option<EntryType>,
    structured_hint: Option<EntryType>,
    record: &MergedRecord,
    ctx: &PageContext,
) -> EntryType {
    if let Some(entry) = pinned {
        tracing::info!("Entry type {} pinned by a site extractor", entry);
        return entry;
    }
    if let Some(entry) = structured_hint {
        tracing::info!("Entry type {} from structured data", entry);
        return entry;
    }
    match RULES.iter().find(|(_, matches, _)| matches(record, ctx)) {
        Some((name, _, entry)) => {
            tracing::info!("Entry type {} from rule '{}'", entry, name);
            *entry
        }
        None => {
            tracing::info!("No classifier rule matched, using {}", DEFAULT_ENTRY_TYPE);
            DEFAULT_ENTRY_TYPE
        }
    }
}

fn mentions_thesis(_record: &MergedRecord, ctx: &PageContext) -> bool {
    ctx.domain.contains("thesis")
        || ctx
            .title
            .as_deref()
            .map(|t| t.to_ascii_lowercase().contains("thesis"))
            .unwrap_or(false)
}

fn is_article_page(ctx: &PageContext) -> bool {
    ctx.page_type.as_deref() == Some("article")
}
