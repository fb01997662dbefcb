//! Configuration management.

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::extractors::DEFAULT_BODY_SCAN_LIMIT;

/// Environment variable prefix for every setting
pub const ENV_PREFIX: &str = "PAGEBIB";

/// Name of a config file in the working directory
pub const LOCAL_CONFIG_FILE: &str = "pagebib.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// BibTeX output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Which extractors run
    #[serde(default)]
    pub extractors: ExtractorsConfig,

    /// Heuristic extractor settings
    #[serde(default)]
    pub heuristics: HeuristicsConfig,

    /// Label cache settings
    #[serde(default)]
    pub labels: LabelsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// BibTeX output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pad field names so the `=` signs line up
    #[serde(default = "default_true")]
    pub align_fields: bool,

    /// Spaces before each field line
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            align_fields: true,
            indent: default_indent(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_indent() -> usize {
    2
}

/// Extractor selection.
///
/// Both lists are comma-separated extractor ids. When `enabled` is set only
/// those extractors run; `disabled` always wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorsConfig {
    #[serde(default = "env_enabled_extractors")]
    pub enabled: Option<String>,

    #[serde(default = "env_disabled_extractors")]
    pub disabled: Option<String>,
}

impl Default for ExtractorsConfig {
    fn default() -> Self {
        Self {
            enabled: env_enabled_extractors(),
            disabled: env_disabled_extractors(),
        }
    }
}

fn env_enabled_extractors() -> Option<String> {
    std::env::var("PAGEBIB_EXTRACTORS_ENABLED").ok()
}

fn env_disabled_extractors() -> Option<String> {
    std::env::var("PAGEBIB_EXTRACTORS_DISABLED").ok()
}

/// Heuristic extractor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicsConfig {
    /// Characters of visible body text scanned for volume/issue/pages
    #[serde(default = "default_body_scan_limit")]
    pub body_scan_limit: usize,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            body_scan_limit: default_body_scan_limit(),
        }
    }
}

fn default_body_scan_limit() -> usize {
    DEFAULT_BODY_SCAN_LIMIT
}

/// Label cache configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelsConfig {
    /// Label file; defaults to `<config_dir>/pagebib/labels.json`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with `PAGEBIB__SECTION__KEY` environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> Config {
    Config::default()
}

/// Look for a config file in the working directory, then in the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    default_config_path().filter(|p| p.is_file())
}

/// `<config_dir>/pagebib/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pagebib").join("config.toml"))
}
