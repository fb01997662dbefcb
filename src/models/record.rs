//! Metadata records produced by extractors and by the merge step.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Separator between individual names in the `authors` field
pub const AUTHOR_SEPARATOR: &str = " and ";

/// A bibliographic field that an extractor can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "authors")]
    Authors,
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "journal")]
    Journal,
    #[serde(rename = "conference")]
    Conference,
    #[serde(rename = "volume")]
    Volume,
    #[serde(rename = "issue")]
    Issue,
    #[serde(rename = "pages")]
    Pages,
    #[serde(rename = "doi")]
    Doi,
    #[serde(rename = "abstract")]
    Abstract,
    #[serde(rename = "publisher")]
    Publisher,
    #[serde(rename = "organization")]
    Organization,
    #[serde(rename = "isbn")]
    Isbn,
    #[serde(rename = "issn")]
    Issn,
    #[serde(rename = "keywords")]
    Keywords,
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "pdf_url")]
    PdfUrl,
    #[serde(rename = "site_name")]
    SiteName,
    #[serde(rename = "source")]
    Source,
    #[serde(rename = "entry_type")]
    EntryType,
    #[serde(rename = "eprint")]
    Eprint,
    #[serde(rename = "archivePrefix")]
    ArchivePrefix,
    #[serde(rename = "arxiv_id")]
    ArxivId,
}

impl Field {
    /// Every known field, in declaration order
    pub const ALL: [Field; 25] = [
        Field::Title,
        Field::Authors,
        Field::Year,
        Field::Month,
        Field::Day,
        Field::Journal,
        Field::Conference,
        Field::Volume,
        Field::Issue,
        Field::Pages,
        Field::Doi,
        Field::Abstract,
        Field::Publisher,
        Field::Organization,
        Field::Isbn,
        Field::Issn,
        Field::Keywords,
        Field::Url,
        Field::PdfUrl,
        Field::SiteName,
        Field::Source,
        Field::EntryType,
        Field::Eprint,
        Field::ArchivePrefix,
        Field::ArxivId,
    ];

    /// The record-level field name
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Authors => "authors",
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Journal => "journal",
            Field::Conference => "conference",
            Field::Volume => "volume",
            Field::Issue => "issue",
            Field::Pages => "pages",
            Field::Doi => "doi",
            Field::Abstract => "abstract",
            Field::Publisher => "publisher",
            Field::Organization => "organization",
            Field::Isbn => "isbn",
            Field::Issn => "issn",
            Field::Keywords => "keywords",
            Field::Url => "url",
            Field::PdfUrl => "pdf_url",
            Field::SiteName => "site_name",
            Field::Source => "source",
            Field::EntryType => "entry_type",
            Field::Eprint => "eprint",
            Field::ArchivePrefix => "archivePrefix",
            Field::ArxivId => "arxiv_id",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .or(match s.to_ascii_lowercase().as_str() {
                "author" => Some(Field::Authors),
                "number" => Some(Field::Issue),
                _ => None,
            })
            .ok_or_else(|| format!("unknown field: {}", s))
    }
}

/// Partial metadata reported by a single extractor
///
/// Values are trimmed on insertion and blank values are dropped, so a field
/// is either absent or holds a non-empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartialRecord {
    fields: BTreeMap<Field, String>,
}

impl PartialRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value. Blank values are ignored.
    pub fn set(&mut self, field: Field, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if !value.is_empty() {
            self.fields.insert(field, value.to_string());
        }
    }

    /// Set a field only if it has no value yet
    pub fn set_if_absent(&mut self, field: Field, value: impl AsRef<str>) {
        if !self.fields.contains_key(&field) {
            self.set(field, value);
        }
    }

    /// Set an optional value
    pub fn set_opt(&mut self, field: Field, value: Option<impl AsRef<str>>) {
        if let Some(v) = value {
            self.set(field, v);
        }
    }

    /// Join individual author names with the author separator.
    ///
    /// Blank names are skipped; nothing is stored when no name remains.
    pub fn set_authors<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if !names.is_empty() {
            self.set(Field::Authors, names.join(AUTHOR_SEPARATOR));
        }
    }

    /// Store year, month and day from a normalised date
    pub fn set_date(&mut self, date: &crate::utils::DateParts) {
        self.set(Field::Year, &date.year);
        self.set(Field::Month, &date.month);
        self.set(Field::Day, &date.day);
    }

    /// Get a field value
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(|s| s.as_str())
    }

    /// Check whether a field is present
    pub fn has(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    /// Remove a field, returning its value
    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.fields.remove(&field)
    }

    /// Iterate over present fields in field order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Number of present fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is present
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The record obtained by merging every extractor's output
///
/// Only the merge step and the fallback path construct one; every present
/// value is trimmed and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergedRecord {
    inner: PartialRecord,
}

impl MergedRecord {
    pub(crate) fn from_partial(inner: PartialRecord) -> Self {
        Self { inner }
    }

    /// Get a field value
    pub fn get(&self, field: Field) -> Option<&str> {
        self.inner.get(field)
    }

    /// Check whether a field is present
    pub fn has(&self, field: Field) -> bool {
        self.inner.has(field)
    }

    /// Iterate over present fields
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.inner.iter()
    }

    /// Number of present fields
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no field is present
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the author names as a vector
    pub fn author_list(&self) -> Vec<&str> {
        self.get(Field::Authors)
            .map(|a| {
                a.split(AUTHOR_SEPARATOR)
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Return a copy with the given values applied on top.
    ///
    /// Blank override values remove the field.
    pub fn with_overrides<'a, I>(&self, overrides: I) -> MergedRecord
    where
        I: IntoIterator<Item = (Field, &'a str)>,
    {
        let mut inner = self.inner.clone();
        for (field, value) in overrides {
            if value.trim().is_empty() {
                inner.remove(field);
            } else {
                inner.set(field, value);
            }
        }
        MergedRecord { inner }
    }
}

impl From<MergedRecord> for PartialRecord {
    fn from(merged: MergedRecord) -> Self {
        merged.inner
    }
}
