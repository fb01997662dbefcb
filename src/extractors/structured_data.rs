//! Embedded JSON-LD structured data extractor.
//!
//! Every `<script type="application/ld+json">` block is parsed and flattened
//! (top-level arrays and `@graph` containers). Only objects whose `@type` is in
//! the recognised table contribute, and within this extractor the first such
//! object to supply a field wins.

use serde_json::{Map, Value};

use crate::extractors::{ExtractError, Extractor, ExtractorId};
use crate::models::{EntryType, Field, Page, PartialRecord};
use crate::utils::{find_doi, normalize_date, split_author_list, split_keywords};

/// Schema.org type names and the entry type each one implies
const SCHEMA_TYPES: &[(&str, EntryType)] = &[
    ("ScholarlyArticle", EntryType::Article),
    ("MedicalScholarlyArticle", EntryType::Article),
    ("TechArticle", EntryType::Article),
    ("Article", EntryType::Article),
    ("NewsArticle", EntryType::ArticleNewspaper),
    ("ReportageNewsArticle", EntryType::ArticleNewspaper),
    ("BlogPosting", EntryType::ArticleBlog),
    ("Book", EntryType::Book),
    ("Chapter", EntryType::Incollection),
    ("Thesis", EntryType::Phdthesis),
    ("Report", EntryType::Techreport),
    ("SoftwareSourceCode", EntryType::Software),
    ("SoftwareApplication", EntryType::Software),
    ("Dataset", EntryType::Dataset),
    ("VideoObject", EntryType::Video),
    ("WebPage", EntryType::Online),
];

/// Entry type for a schema.org type name, if it is a recognised one.
///
/// Accepts bare names as well as `schema:`/URL-prefixed forms.
pub fn schema_type_entry(type_name: &str) -> Option<EntryType> {
    let name = type_name
        .trim()
        .rsplit(|c: char| c == '/' || c == ':' || c == '#')
        .next()
        .unwrap_or_default();
    SCHEMA_TYPES
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(name))
        .map(|(_, entry)| *entry)
}

/// Structured data extractor
#[derive(Debug, Clone, Default)]
pub struct StructuredDataExtractor;

impl StructuredDataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse every JSON-LD block on the page into a flat list of objects.
    /// Blocks that fail to parse are skipped.
    fn collect_objects(&self, page: &Page) -> Vec<Map<String, Value>> {
        let mut out = Vec::new();
        for script in page.select("script[type='application/ld+json']") {
            let raw: String = script.text().collect();
            let cleaned = raw.replace("<!--", "").replace("-->", "");
            match serde_json::from_str::<Value>(cleaned.trim()) {
                Ok(value) => flatten(value, &mut out),
                Err(e) => tracing::debug!("Skipping malformed JSON-LD block: {}", e),
            }
        }
        out
    }

    fn apply(&self, obj: &Map<String, Value>, entry: EntryType, record: &mut PartialRecord) {
        record.set_if_absent(Field::EntryType, entry.as_str());

        if let Some(title) = obj.get("headline").or_else(|| obj.get("name")).and_then(text) {
            record.set_if_absent(Field::Title, title);
        }

        if !record.has(Field::Authors) {
            if let Some(author) = obj.get("author").or_else(|| obj.get("creator")) {
                record.set_authors(people(author));
            }
        }

        if !record.has(Field::Year) {
            if let Some(date) = obj
                .get("datePublished")
                .or_else(|| obj.get("dateCreated"))
                .and_then(text)
            {
                record.set_date(&normalize_date(&date));
            }
        }

        if let Some(desc) = obj.get("abstract").or_else(|| obj.get("description")).and_then(text) {
            record.set_if_absent(Field::Abstract, desc);
        }

        if let Some(keywords) = obj.get("keywords") {
            let words: Vec<String> = match keywords {
                Value::Array(items) => items.iter().filter_map(text).collect(),
                other => text(other).map(|s| split_keywords(&s)).unwrap_or_default(),
            };
            if !words.is_empty() {
                record.set_if_absent(Field::Keywords, words.join(", "));
            }
        }

        if let Some(publisher) = obj.get("publisher").and_then(text) {
            record.set_if_absent(Field::Publisher, publisher);
        }

        if let Some(container) = obj.get("isPartOf") {
            self.apply_container(container, record);
        }

        for (key, field) in [
            ("volumeNumber", Field::Volume),
            ("issueNumber", Field::Issue),
            ("pagination", Field::Pages),
            ("isbn", Field::Isbn),
            ("issn", Field::Issn),
            ("url", Field::Url),
        ] {
            if let Some(v) = obj.get(key).and_then(text) {
                record.set_if_absent(field, v);
            }
        }

        if !record.has(Field::Pages) {
            let start = obj.get("pageStart").and_then(text);
            let end = obj.get("pageEnd").and_then(text);
            match (start, end) {
                (Some(s), Some(e)) => record.set(Field::Pages, format!("{}--{}", s, e)),
                (Some(s), None) => record.set(Field::Pages, s),
                _ => {}
            }
        }

        if !record.has(Field::Doi) {
            let doi = ["doi", "identifier", "sameAs", "@id"]
                .iter()
                .filter_map(|k| obj.get(*k))
                .find_map(doi_in);
            record.set_opt(Field::Doi, doi);
        }
    }

    /// `isPartOf` names the journal, or the site for web pages
    fn apply_container(&self, container: &Value, record: &mut PartialRecord) {
        let Some(obj) = first_object(container) else {
            if let Some(name) = text(container) {
                record.set_if_absent(Field::Journal, name);
            }
            return;
        };
        let types = type_names(obj);
        let name = obj.get("name").and_then(text);
        if types.iter().any(|t| t.eq_ignore_ascii_case("WebSite")) {
            if let Some(name) = name {
                record.set_if_absent(Field::SiteName, name);
            }
            return;
        }
        if types
            .iter()
            .any(|t| t.eq_ignore_ascii_case("PublicationIssue") || t.eq_ignore_ascii_case("PublicationVolume"))
        {
            if let Some(v) = obj.get("issueNumber").and_then(text) {
                record.set_if_absent(Field::Issue, v);
            }
            if let Some(v) = obj.get("volumeNumber").and_then(text) {
                record.set_if_absent(Field::Volume, v);
            }
            if let Some(parent) = obj.get("isPartOf") {
                self.apply_container(parent, record);
                return;
            }
        }
        if let Some(issn) = obj.get("issn").and_then(text) {
            record.set_if_absent(Field::Issn, issn);
        }
        if let Some(name) = name {
            record.set_if_absent(Field::Journal, name);
        }
    }
}

impl Extractor for StructuredDataExtractor {
    fn id(&self) -> ExtractorId {
        ExtractorId::JsonLd
    }

    fn extract(&self, page: &Page) -> Result<PartialRecord, ExtractError> {
        let mut record = PartialRecord::new();
        for obj in self.collect_objects(page) {
            let entry = type_names(&obj).iter().find_map(|t| schema_type_entry(t));
            if let Some(entry) = entry {
                self.apply(&obj, entry, &mut record);
            }
        }
        Ok(record)
    }
}

fn flatten(value: Value, out: &mut Vec<Map<String, Value>>) {
    match value {
        Value::Array(items) => items.into_iter().for_each(|v| flatten(v, out)),
        Value::Object(mut obj) => {
            if let Some(graph) = obj.remove("@graph") {
                flatten(graph, out);
            }
            if obj.contains_key("@type") {
                out.push(obj);
            }
        }
        _ => {}
    }
}

fn type_names(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get("@type") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn first_object(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(obj) => Some(obj),
        Value::Array(items) => items.iter().find_map(Value::as_object),
        _ => None,
    }
}

/// Text of a scalar, of an object's `name`, or of the first usable array item
fn text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(obj) => return obj.get("name").and_then(text),
        Value::Array(items) => return items.iter().find_map(text),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// Person names from a string, an object or an array of either
fn people(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_author_list(s),
        Value::Object(_) => text(value).into_iter().collect(),
        Value::Array(items) => items.iter().flat_map(people).collect(),
        _ => Vec::new(),
    }
}

fn doi_in(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => find_doi(s),
        Value::Object(obj) => obj
            .get("value")
            .or_else(|| obj.get("@id"))
            .or_else(|| obj.get("url"))
            .and_then(doi_in),
        Value::Array(items) => items.iter().find_map(doi_in),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> PartialRecord {
        let page = Page::parse("https://example.org/post", html).unwrap();
        StructuredDataExtractor::new().extract(&page).unwrap()
    }

    #[test]
    fn test_schema_type_table() {
        assert_eq!(schema_type_entry("ScholarlyArticle"), Some(EntryType::Article));
        assert_eq!(schema_type_entry("schema:NewsArticle"), Some(EntryType::ArticleNewspaper));
        assert_eq!(schema_type_entry("https://schema.org/Dataset"), Some(EntryType::Dataset));
        assert_eq!(schema_type_entry("Person"), None);
    }

    #[test]
    fn test_news_article() {
        let record = extract(
            r#"<script type="application/ld+json">
            {"@context":"https://schema.org","@type":"NewsArticle",
             "headline":"Storm hits coast",
             "author":[{"@type":"Person","name":"Ann Lee"},{"@type":"Person","name":"Bo Chen"}],
             "datePublished":"2024-03-15T08:00:00Z",
             "publisher":{"@type":"Organization","name":"Daily Planet"},
             "keywords":["weather","coast"]}
            </script>"#,
        );
        assert_eq!(record.get(Field::EntryType), Some("article-newspaper"));
        assert_eq!(record.get(Field::Title), Some("Storm hits coast"));
        assert_eq!(record.get(Field::Authors), Some("Ann Lee and Bo Chen"));
        assert_eq!(record.get(Field::Year), Some("2024"));
        assert_eq!(record.get(Field::Month), Some("mar"));
        assert_eq!(record.get(Field::Day), Some("15"));
        assert_eq!(record.get(Field::Publisher), Some("Daily Planet"));
        assert_eq!(record.get(Field::Keywords), Some("weather, coast"));
    }

    #[test]
    fn test_first_recognised_object_wins() {
        let record = extract(
            r#"<script type="application/ld+json">
            {"@graph":[
              {"@type":"Organization","name":"Not a title"},
              {"@type":"ScholarlyArticle","name":"First","isPartOf":{"@type":"Periodical","name":"J. Tests"},
               "identifier":{"@type":"PropertyValue","propertyID":"doi","value":"10.1234/abcd.efgh"}},
              {"@type":"WebPage","name":"Second","description":"Later description"}
            ]}
            </script>"#,
        );
        assert_eq!(record.get(Field::Title), Some("First"));
        assert_eq!(record.get(Field::EntryType), Some("article"));
        assert_eq!(record.get(Field::Journal), Some("J. Tests"));
        assert_eq!(record.get(Field::Doi), Some("10.1234/abcd.efgh"));
        assert_eq!(record.get(Field::Abstract), Some("Later description"));
    }

    #[test]
    fn test_malformed_blocks_are_skipped() {
        let record = extract(
            r#"<script type="application/ld+json">{"@type": "Book", </script>
               <script type="application/ld+json">{"@type":"Book","name":"Good","isbn":"978-0-00-000000-2"}</script>"#,
        );
        assert_eq!(record.get(Field::Title), Some("Good"));
        assert_eq!(record.get(Field::Isbn), Some("978-0-00-000000-2"));
        assert_eq!(record.get(Field::EntryType), Some("book"));
    }

    #[test]
    fn test_no_blocks() {
        assert!(extract("<html><body>nothing</body></html>").is_empty());
    }
}
