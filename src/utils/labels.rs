//! Persisted label suggestions.
//!
//! Labels live in a small JSON file in the config directory. The file holds
//! an object; labels are stored under [`LABELS_STORAGE_KEY`] and any other
//! keys are left untouched on write.

use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Storage key under which labels are kept
pub const LABELS_STORAGE_KEY: &str = "pp_labels";

/// Prefix marking the label list inside a BibTeX `note` value
pub const LABELS_NOTE_PREFIX: &str = "pp-labels:";

/// Label store errors
#[derive(Debug, thiserror::Error)]
pub enum LabelStoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// File-backed label cache
#[derive(Debug, Clone)]
pub struct LabelStore {
    path: PathBuf,
}

impl LabelStore {
    /// Store in the default location under the user config directory
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("pagebib");
        Self::at(config_dir.join("labels.json"))
    }

    /// Store at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the saved labels. A missing file yields an empty list.
    pub fn load(&self) -> Result<Vec<String>, LabelStoreError> {
        let map = self.read_map()?;
        let labels = map
            .get(LABELS_STORAGE_KEY)
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(normalize_labels(labels))
    }

    /// Replace the saved labels
    pub fn save(&self, labels: &[String]) -> Result<(), LabelStoreError> {
        let mut map = self.read_map()?;
        let labels = normalize_labels(labels.to_vec());
        map.insert(
            LABELS_STORAGE_KEY.to_string(),
            Value::Array(labels.into_iter().map(Value::String).collect()),
        );
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(map))?)?;
        tracing::debug!("Saved labels to {}", self.path.display());
        Ok(())
    }

    /// Add a label, returning the updated list
    pub fn add(&self, label: &str) -> Result<Vec<String>, LabelStoreError> {
        let mut labels = self.load()?;
        labels.push(label.to_string());
        let labels = normalize_labels(labels);
        self.save(&labels)?;
        Ok(labels)
    }

    /// Remove a label (case-insensitive), returning the updated list
    pub fn remove(&self, label: &str) -> Result<Vec<String>, LabelStoreError> {
        let mut labels = self.load()?;
        labels.retain(|l| !l.eq_ignore_ascii_case(label.trim()));
        self.save(&labels)?;
        Ok(labels)
    }

    /// Remove every label
    pub fn clear(&self) -> Result<(), LabelStoreError> {
        self.save(&[])
    }

    /// Get label file path (for external access)
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, LabelStoreError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

impl Default for LabelStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim labels, drop blanks and case-insensitive duplicates, keep first-seen order
pub fn normalize_labels(labels: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.trim().to_string();
        if !label.is_empty() && !out.iter().any(|l| l.eq_ignore_ascii_case(&label)) {
            out.push(label);
        }
    }
    out
}

/// Encode labels as a `note` value: `pp-labels: a, b`
pub fn labels_note(labels: &[String]) -> Option<String> {
    let labels = normalize_labels(labels.to_vec());
    if labels.is_empty() {
        None
    } else {
        Some(format!("{} {}", LABELS_NOTE_PREFIX, labels.join(", ")))
    }
}

/// Recover the label list from a `note` value written by [`labels_note`]
pub fn parse_labels_note(note: &str) -> Vec<String> {
    let Some(start) = note.find(LABELS_NOTE_PREFIX) else {
        return Vec::new();
    };
    let rest = &note[start + LABELS_NOTE_PREFIX.len()..];
    let rest = rest.split(';').next().unwrap_or_default();
    normalize_labels(rest.split(',').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = LabelStore::at(dir.path().join("labels.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_add_remove_round_trip() {
        let dir = tempdir().unwrap();
        let store = LabelStore::at(dir.path().join("nested").join("labels.json"));

        store.add("reading").unwrap();
        store.add("ml").unwrap();
        let labels = store.add("Reading").unwrap();
        assert_eq!(labels, vec!["reading", "ml"]);

        let labels = store.remove("READING").unwrap();
        assert_eq!(labels, vec!["ml"]);
        assert_eq!(store.load().unwrap(), vec!["ml"]);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_other_keys_are_preserved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labels.json");
        fs::write(&path, r#"{"theme": "dark", "pp_labels": ["a"]}"#).unwrap();

        let store = LabelStore::at(&path);
        store.add("b").unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["pp_labels"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labels.json");
        fs::write(&path, "{not json").unwrap();
        assert!(LabelStore::at(&path).load().is_err());
    }

    #[test]
    fn test_labels_note_round_trip() {
        let labels = vec!["to-read".to_string(), " nlp ".to_string(), "".to_string()];
        let note = labels_note(&labels).unwrap();
        assert_eq!(note, "pp-labels: to-read, nlp");
        assert_eq!(parse_labels_note(&note), vec!["to-read", "nlp"]);
        assert_eq!(
            parse_labels_note("Accepted at X; pp-labels: a, b"),
            vec!["a", "b"]
        );
        assert!(labels_note(&[]).is_none());
    }
}
