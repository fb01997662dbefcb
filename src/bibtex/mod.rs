//! BibTeX field mapping and serialization.
//!
//! [`BibtexRecord::build`] maps a merged record onto the field names of its
//! entry type using the [`schema`] table, and [`BibtexRecord::render`] writes
//! the text form:
//!
//! ```text
//! @article{doe2023understand,
//!   title   = {Understanding Deep Learning Systems},
//!   author  = {Jane Doe and John Smith},
//!   year    = {2023},
//!   journal = {Journal of Tests},
//! }
//! ```
//!
//! Values are written as given. BibTeX special characters are not escaped.

pub mod schema;

pub use schema::{schema_for, EntrySchema, SCHEMAS};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::OutputConfig;
use crate::models::{EntryType, Field, MergedRecord, AUTHOR_SEPARATOR};
use crate::utils::labels_note;

/// A finished BibTeX entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibtexRecord {
    pub entry_type: EntryType,
    pub key: String,
    /// `(name, value)` pairs in output order; no value is blank
    pub fields: Vec<(String, String)>,
}

impl BibtexRecord {
    /// Map `record` onto the fields of `entry_type`.
    ///
    /// `labels` become a `note` field; `access_date` fills `urldate` for entry
    /// types that use it.
    pub fn build(
        entry_type: EntryType,
        key: impl Into<String>,
        record: &MergedRecord,
        labels: &[String],
        access_date: NaiveDate,
    ) -> Self {
        let schema = schema_for(entry_type);
        let mut fields = FieldList::default();

        fields.push("title", record.get(Field::Title));
        fields.push("author", record.get(Field::Authors));
        fields.push("year", record.get(Field::Year));
        fields.push("month", record.get(Field::Month));
        fields.push("day", record.get(Field::Day));

        let venue = schema
            .venue
            .and_then(|(field, name)| record.get(field).map(|value| (name, value)));
        if let Some((name, value)) = venue {
            fields.push(name, Some(value));
        }

        if schema.uses_volume_pages {
            fields.push("volume", record.get(Field::Volume));
            fields.push("number", record.get(Field::Issue));
            fields.push("pages", record.get(Field::Pages));
        }

        if let Some((field, name)) = schema.publisher {
            let value = record.get(field);
            let duplicates_venue = venue
                .map(|(venue_name, venue_value)| venue_name == name || Some(venue_value) == value)
                .unwrap_or(false);
            if !duplicates_venue {
                fields.push(name, value);
            }
        }

        for (field, name) in schema.extras {
            fields.push(name, record.get(*field));
        }

        fields.push("doi", record.get(Field::Doi));
        fields.push("url", record.get(Field::Url));
        if schema.uses_access_date && record.has(Field::Url) {
            let urldate = access_date.format("%Y-%m-%d").to_string();
            fields.push("urldate", Some(&urldate));
        }
        fields.push("abstract", record.get(Field::Abstract));
        fields.push("keywords", record.get(Field::Keywords));
        fields.push("note", labels_note(labels).as_deref());

        Self {
            entry_type,
            key: key.into(),
            fields: fields.0,
        }
    }

    /// Value of a BibTeX field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize with the given layout
    pub fn render(&self, output: &OutputConfig) -> String {
        let width = if output.align_fields {
            self.fields.iter().map(|(n, _)| n.len()).max().unwrap_or(0)
        } else {
            0
        };
        let indent = " ".repeat(output.indent);

        let mut out = format!("@{}{{{},\n", self.entry_type, self.key);
        for (name, value) in &self.fields {
            out.push_str(&format!(
                "{}{:<width$} = {},\n",
                indent,
                name,
                delimit(value),
                width = width
            ));
        }
        out.push_str("}\n");
        out
    }
}

impl fmt::Display for BibtexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&OutputConfig::default()))
    }
}

/// Field list that drops blank values
#[derive(Default)]
struct FieldList(Vec<(String, String)>);

impl FieldList {
    fn push(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.0.push((name.to_string(), value.to_string()));
        }
    }
}

/// Wrap a value in braces unless it is already brace- or quote-delimited
pub fn delimit(value: &str) -> String {
    if encloses_whole(value) {
        value.to_string()
    } else {
        format!("{{{}}}", value)
    }
}

/// Whether the first character opens a delimiter that closes only at the
/// last one, so `{A} and {B}` does not count
fn encloses_whole(value: &str) -> bool {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return !value[1..value.len() - 1].contains('"');
    }
    if !value.starts_with('{') {
        return false;
    }
    let mut depth = 0usize;
    for (i, c) in value.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == value.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// User edits applied on top of the merged record before mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOverrides {
    values: BTreeMap<Field, String>,
}

impl FieldOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override a field; a blank value removes it from the output
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Override the authors with a `;`-separated list as typed in a form
    pub fn set_authors_from_ui(&mut self, authors: &str) {
        self.set(Field::Authors, authors_from_ui(authors));
    }

    /// Parse and apply a `field=value` assignment
    pub fn set_assignment(&mut self, assignment: &str) -> Result<(), String> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("expected field=value, got '{}'", assignment))?;
        let field: Field = name.parse()?;
        if field == Field::Authors {
            self.set_authors_from_ui(value);
        } else {
            self.set(field, value.trim());
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply the overrides to a copy of `record`
    pub fn apply(&self, record: &MergedRecord) -> MergedRecord {
        record.with_overrides(self.values.iter().map(|(f, v)| (*f, v.as_str())))
    }
}

/// Translate a `;`-separated author list into the ` and `-joined form
pub fn authors_from_ui(authors: &str) -> String {
    authors
        .split(';')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect::<Vec<_>>()
        .join(AUTHOR_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::make_record;

    fn record(fields: &[(Field, &str)]) -> MergedRecord {
        MergedRecord::from_partial(make_record(fields))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_article_layout() {
        let r = record(&[
            (Field::Title, "Understanding Deep Learning Systems"),
            (Field::Authors, "Jane Doe and John Smith"),
            (Field::Year, "2023"),
            (Field::Month, "jun"),
            (Field::Journal, "Journal of Tests"),
            (Field::Volume, "12"),
            (Field::Issue, "3"),
            (Field::Pages, "101--118"),
            (Field::Publisher, "Test Press"),
            (Field::Doi, "10.1234/jt.2023.5"),
            (Field::Url, "https://journal.example.org/a/1"),
        ]);
        let bib = BibtexRecord::build(EntryType::Article, "doe2023understand", &r, &[], date());
        let expected = "@article{doe2023understand,
  title     = {Understanding Deep Learning Systems},
  author    = {Jane Doe and John Smith},
  year      = {2023},
  month     = {jun},
  journal   = {Journal of Tests},
  volume    = {12},
  number    = {3},
  pages     = {101--118},
  publisher = {Test Press},
  doi       = {10.1234/jt.2023.5},
  url       = {https://journal.example.org/a/1},
}
";
        assert_eq!(bib.to_string(), expected);
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let r = record(&[(Field::Title, "T")]);
        let bib = BibtexRecord::build(EntryType::Article, "k", &r, &[], date());
        let text = bib.to_string();
        assert!(!text.contains("doi"));
        assert!(!text.contains("{}"));
        assert_eq!(bib.fields.len(), 1);
    }

    #[test]
    fn test_thesis_uses_school() {
        let r = record(&[(Field::Title, "T"), (Field::Publisher, "MIT")]);
        let bib = BibtexRecord::build(EntryType::Phdthesis, "k", &r, &[], date());
        assert_eq!(bib.get("school"), Some("MIT"));
        assert_eq!(bib.get("journal"), None);
        assert_eq!(bib.get("publisher"), None);
    }

    #[test]
    fn test_online_access_date_and_duplicate_organization() {
        let r = record(&[
            (Field::Title, "A Post"),
            (Field::SiteName, "Ferris Writes"),
            (Field::Organization, "Ferris Writes"),
            (Field::Url, "https://ferris.example.com/p"),
        ]);
        let bib = BibtexRecord::build(EntryType::Online, "k", &r, &[], date());
        assert_eq!(bib.get("organization"), Some("Ferris Writes"));
        assert_eq!(bib.get("urldate"), Some("2024-05-01"));

        let r = record(&[(Field::Title, "Tool"), (Field::SiteName, "github.com"), (Field::Organization, "github.com")]);
        let bib = BibtexRecord::build(EntryType::Software, "k", &r, &[], date());
        assert_eq!(bib.get("howpublished"), Some("github.com"));
        assert_eq!(bib.get("organization"), None);
        assert_eq!(bib.get("urldate"), None);
    }

    #[test]
    fn test_misc_eprint_extras_and_labels() {
        let r = record(&[
            (Field::Title, "Attention Is All You Need"),
            (Field::Eprint, "1706.03762"),
            (Field::ArchivePrefix, "arXiv"),
            (Field::SiteName, "arXiv"),
            (Field::Publisher, "arXiv"),
        ]);
        let labels = vec!["transformers".to_string(), "to-read".to_string()];
        let bib = BibtexRecord::build(EntryType::Misc, "k", &r, &labels, date());
        let names: Vec<&str> = bib.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["title", "howpublished", "eprint", "archivePrefix", "note"]);
        assert_eq!(bib.get("note"), Some("pp-labels: transformers, to-read"));
    }

    #[test]
    fn test_extras_follow_schema() {
        let r = record(&[(Field::Title, "T"), (Field::Eprint, "1"), (Field::Isbn, "978")]);
        let article = BibtexRecord::build(EntryType::Article, "k", &r, &[], date());
        assert_eq!(article.get("eprint"), None);
        let book = BibtexRecord::build(EntryType::Book, "k", &r, &[], date());
        assert_eq!(book.get("isbn"), Some("978"));
    }

    #[test]
    fn test_delimit() {
        assert_eq!(delimit("plain"), "{plain}");
        assert_eq!(delimit("{Already}"), "{Already}");
        assert_eq!(delimit("\"quoted\""), "\"quoted\"");
        assert_eq!(delimit("\""), "{\"}");
    }

    #[test]
    fn test_delimit_needs_one_enclosing_pair() {
        assert_eq!(delimit("{A} and {B}"), "{{A} and {B}}");
        assert_eq!(delimit("{{Nested} Title}"), "{{Nested} Title}");
        assert_eq!(delimit("{unclosed"), "{{unclosed}");
        assert_eq!(delimit("\"a\" or \"b\""), "{\"a\" or \"b\"}");
    }

    #[test]
    fn test_render_without_alignment() {
        let r = record(&[(Field::Title, "T"), (Field::Year, "2020")]);
        let bib = BibtexRecord::build(EntryType::Misc, "k", &r, &[], date());
        let output = OutputConfig {
            align_fields: false,
            indent: 4,
        };
        assert_eq!(bib.render(&output), "@misc{k,\n    title = {T},\n    year = {2020},\n}\n");
    }

    #[test]
    fn test_serialization_is_idempotent() {
        let r = record(&[(Field::Title, "T"), (Field::Authors, "A B"), (Field::Url, "https://x.org")]);
        let first = BibtexRecord::build(EntryType::Online, "k", &r, &[], date()).to_string();
        let second = BibtexRecord::build(EntryType::Online, "k", &r, &[], date()).to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_overrides() {
        let r = record(&[(Field::Title, "Old"), (Field::Doi, "10.1/x")]);
        let mut overrides = FieldOverrides::new();
        overrides.set_assignment("title=New Title").unwrap();
        overrides.set_assignment("doi=").unwrap();
        overrides.set_authors_from_ui("Jane Doe; ; John Smith ");
        assert!(overrides.set_assignment("bogus=1").is_err());
        assert!(overrides.set_assignment("no equals sign").is_err());

        let updated = overrides.apply(&r);
        assert_eq!(updated.get(Field::Title), Some("New Title"));
        assert_eq!(updated.get(Field::Authors), Some("Jane Doe and John Smith"));
        assert!(!updated.has(Field::Doi));
    }
}
