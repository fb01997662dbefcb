//! Bibliographic entry types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The BibTeX-level classification of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryType {
    Article,
    Inproceedings,
    Proceedings,
    Book,
    Incollection,
    Phdthesis,
    Mastersthesis,
    Techreport,
    Report,
    Online,
    Misc,
    Software,
    Dataset,
    Video,
    ArticleNewspaper,
    ArticleMagazine,
    ArticleBlog,
    Patent,
    Standard,
    Manual,
    Unpublished,
}

impl EntryType {
    /// Every entry type
    pub const ALL: [EntryType; 21] = [
        EntryType::Article,
        EntryType::Inproceedings,
        EntryType::Proceedings,
        EntryType::Book,
        EntryType::Incollection,
        EntryType::Phdthesis,
        EntryType::Mastersthesis,
        EntryType::Techreport,
        EntryType::Report,
        EntryType::Online,
        EntryType::Misc,
        EntryType::Software,
        EntryType::Dataset,
        EntryType::Video,
        EntryType::ArticleNewspaper,
        EntryType::ArticleMagazine,
        EntryType::ArticleBlog,
        EntryType::Patent,
        EntryType::Standard,
        EntryType::Manual,
        EntryType::Unpublished,
    ];

    /// The tag written after `@` in BibTeX output
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Article => "article",
            EntryType::Inproceedings => "inproceedings",
            EntryType::Proceedings => "proceedings",
            EntryType::Book => "book",
            EntryType::Incollection => "incollection",
            EntryType::Phdthesis => "phdthesis",
            EntryType::Mastersthesis => "mastersthesis",
            EntryType::Techreport => "techreport",
            EntryType::Report => "report",
            EntryType::Online => "online",
            EntryType::Misc => "misc",
            EntryType::Software => "software",
            EntryType::Dataset => "dataset",
            EntryType::Video => "video",
            EntryType::ArticleNewspaper => "article-newspaper",
            EntryType::ArticleMagazine => "article-magazine",
            EntryType::ArticleBlog => "article-blog",
            EntryType::Patent => "patent",
            EntryType::Standard => "standard",
            EntryType::Manual => "manual",
            EntryType::Unpublished => "unpublished",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('@');
        EntryType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown entry type: {}", s))
    }
}
