//! Configuration file support for pagebib.
//!
//! This module provides TOML configuration file reading and writing, used by
//! `pagebib config init`.
//!
//! # Configuration File Format
//!
//! ```toml
//! [output]
//! align_fields = true
//! indent = 2
//!
//! [extractors]
//! enabled = "arxiv,pubmed,scholar,meta,jsonld,webpage,doi"
//! disabled = "publisher"
//!
//! [heuristics]
//! body_scan_limit = 20000
//!
//! [labels]
//! path = "~/.config/pagebib/labels.json"
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Config, ExtractorsConfig, HeuristicsConfig, LabelsConfig, LoggingConfig, OutputConfig};

/// Configuration file structure
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Output section
    #[serde(default)]
    pub output: OutputConfig,

    /// Extractors section
    #[serde(default)]
    pub extractors: ExtractorsConfig,

    /// Heuristics section
    #[serde(default)]
    pub heuristics: HeuristicsConfig,

    /// Labels section
    #[serde(default)]
    pub labels: LabelsConfig,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Create default configuration with no extractor filtering
    #[allow(clippy::should_implement_trait)]
    pub fn create_default() -> Self {
        Self {
            output: OutputConfig::default(),
            extractors: ExtractorsConfig {
                enabled: None,
                disabled: None,
            },
            heuristics: HeuristicsConfig::default(),
            labels: LabelsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Config {
            output: file.output,
            extractors: file.extractors,
            heuristics: file.heuristics,
            labels: file.labels,
            logging: file.logging,
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_load_sections_and_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[output]
align_fields = false
indent = 4

[extractors]
enabled = "meta,jsonld"

[labels]
path = "/tmp/labels.json"

[logging]
level = "debug"
"#;

        let mut file = File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = ConfigFile::load(&path).unwrap();

        assert!(!config.output.align_fields);
        assert_eq!(config.output.indent, 4);
        assert_eq!(config.extractors.enabled, Some("meta,jsonld".to_string()));
        assert_eq!(config.heuristics.body_scan_limit, 20_000);
        assert_eq!(config.labels.path, Some(PathBuf::from("/tmp/labels.json")));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ConfigFile::create_default();
        config.extractors.disabled = Some("publisher".to_string());
        config.heuristics.body_scan_limit = 1234;

        config.save(&path).unwrap();

        let loaded: Config = ConfigFile::load(&path).unwrap().into();
        assert_eq!(loaded.extractors.disabled, Some("publisher".to_string()));
        assert_eq!(loaded.heuristics.body_scan_limit, 1234);
        assert!(loaded.output.align_fields);
    }

    #[test]
    fn test_load_errors_are_classified() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            ConfigFile::load(&dir.path().join("missing.toml")),
            Err(ConfigFileError::Io(_))
        ));

        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[output]\nindent = \"wide\"\n").unwrap();
        assert!(matches!(ConfigFile::load(&path), Err(ConfigFileError::Parse(_))));
    }
}
