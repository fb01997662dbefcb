use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use pagebib::bibtex::{BibtexRecord, FieldOverrides};
use pagebib::config::{
    default_config_path, find_config_file, get_config, load_config, Config, ConfigFile,
};
use pagebib::models::{
    fallback_record, respond, EntryType, ExtractedRecord, Field, Request, Response,
};
use pagebib::utils::{cite_key_from_parts, normalize_labels, LabelStore};
use pagebib::Pipeline;
use scraper::{Html, Selector};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// pagebib - Extract bibliographic metadata from web pages as BibTeX
#[derive(Parser, Debug)]
#[command(name = "pagebib")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract bibliographic metadata from web pages as BibTeX", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for entries
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// BibTeX entry
    Bibtex,
    /// JSON record (machine-readable)
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract a BibTeX entry from a saved HTML page
    #[command(alias = "x")]
    Extract {
        /// HTML file to read, or "-" for stdin
        input: PathBuf,

        /// URL the page was loaded from
        #[arg(long, short)]
        url: String,

        /// Label to attach to the entry (repeatable)
        #[arg(long = "label", short = 'l', value_name = "LABEL")]
        labels: Vec<String>,

        /// Override a field, e.g. --set "journal=Nature" (repeatable; an empty value removes the field)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        overrides: Vec<String>,

        /// Override the authors with a ";"-separated list
        #[arg(long, short)]
        author: Option<String>,

        /// Override the entry type (e.g. "article", "article-blog")
        #[arg(long = "type", value_name = "TYPE")]
        entry_type: Option<String>,

        /// Override the citation key
        #[arg(long)]
        key: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Bibtex)]
        format: OutputFormat,
    },

    /// Print the minimal entry built from only a title and URL
    Fallback {
        /// Page title
        #[arg(long, short)]
        title: Option<String>,

        /// Page URL
        #[arg(long, short)]
        url: String,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Bibtex)]
        format: OutputFormat,
    },

    /// Manage saved label suggestions
    Labels {
        #[command(subcommand)]
        action: LabelsAction,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum LabelsAction {
    /// List saved labels
    List,
    /// Save a label
    Add { label: String },
    /// Forget a label
    Remove { label: String },
    /// Forget every label
    Clear,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Where to write it (default: the user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => get_config(),
    };

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("pagebib={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Extract {
            input,
            url,
            labels,
            overrides,
            author,
            entry_type,
            key,
            format,
        } => {
            let html = read_input(&input)?;
            let pipeline = Pipeline::from_config(&config);

            let mut default_year = None;
            let mut entry = match respond(&pipeline, Request::Extract, &url, &html) {
                Response::Success { data } => data,
                Response::Failure { error } => {
                    tracing::warn!("Extraction failed ({}), using a minimal entry", error);
                    default_year = Some(today.year().to_string());
                    fallback_record(document_title(&html).as_deref(), &url, today)
                }
            };

            apply_edits(
                &mut entry,
                &overrides,
                author.as_deref(),
                entry_type.as_deref(),
                key,
                default_year.as_deref(),
            )?;

            let labels = normalize_labels(labels);
            if !labels.is_empty() {
                remember_labels(&label_store(&config), &labels);
            }

            print_entry(&entry, &labels, &config, today, format)?;
        }

        Commands::Fallback { title, url, format } => {
            let entry = fallback_record(title.as_deref(), &url, today);
            print_entry(&entry, &[], &config, today, format)?;
        }

        Commands::Labels { action } => {
            let store = label_store(&config);
            match action {
                LabelsAction::List => {
                    for label in store.load()? {
                        println!("{}", label);
                    }
                }
                LabelsAction::Add { label } => {
                    let labels = store.add(&label)?;
                    eprintln!("Saved {} label(s) to {}", labels.len(), store.path().display());
                }
                LabelsAction::Remove { label } => {
                    let labels = store.remove(&label)?;
                    eprintln!("{} label(s) left in {}", labels.len(), store.path().display());
                }
                LabelsAction::Clear => {
                    store.clear()?;
                    eprintln!("Cleared labels in {}", store.path().display());
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => {
                let path = path
                    .or_else(default_config_path)
                    .ok_or_else(|| anyhow!("Could not determine the user config directory"))?;
                if path.exists() && !force {
                    bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                ConfigFile::create_default().save(&path)?;
                eprintln!("Wrote default configuration to {}", path.display());
            }
        },
    }

    Ok(())
}

/// Apply the command-line edits to an entry
///
/// The key is rebuilt from the edited record unless `key` is given.
/// `default_year` stands in for a record without a year, as in the minimal
/// entry.
fn apply_edits(
    entry: &mut ExtractedRecord,
    overrides: &[String],
    author: Option<&str>,
    entry_type: Option<&str>,
    key: Option<String>,
    default_year: Option<&str>,
) -> Result<()> {
    let mut field_overrides = FieldOverrides::new();
    for assignment in overrides {
        field_overrides.set_assignment(assignment).map_err(|e| anyhow!(e))?;
    }
    if let Some(author) = author {
        field_overrides.set_authors_from_ui(author);
    }
    if !field_overrides.is_empty() {
        entry.record = field_overrides.apply(&entry.record);
        entry.cite_key = cite_key_from_parts(
            entry.record.get(Field::Authors),
            entry.record.get(Field::Year).or(default_year),
            entry.record.get(Field::Title),
        );
    }
    if let Some(entry_type) = entry_type {
        entry.entry_type = entry_type.parse::<EntryType>().map_err(|e| anyhow!(e))?;
    }
    if let Some(key) = key {
        entry.cite_key = key;
    }
    Ok(())
}

/// Read the page from a file, or from stdin when the path is "-"
fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("Failed to read HTML from stdin")?;
        Ok(html)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))
    }
}

/// The document's `<title>`, for the minimal entry
fn document_title(html: &str) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let document = Html::parse_document(html);
    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>();
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

fn label_store(config: &Config) -> LabelStore {
    match &config.labels.path {
        Some(path) => LabelStore::at(path),
        None => LabelStore::new(),
    }
}

/// Add newly used labels to the saved suggestions; failures only warn
fn remember_labels(store: &LabelStore, labels: &[String]) {
    let saved = match store.load() {
        Ok(saved) => saved,
        Err(e) => {
            tracing::warn!("Could not read labels from {}: {}", store.path().display(), e);
            return;
        }
    };
    let merged = normalize_labels(saved.iter().chain(labels).cloned().collect());
    if merged.len() != saved.len() {
        if let Err(e) = store.save(&merged) {
            tracing::warn!("Could not save labels to {}: {}", store.path().display(), e);
        }
    }
}

fn print_entry(
    entry: &ExtractedRecord,
    labels: &[String],
    config: &Config,
    today: NaiveDate,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Bibtex => {
            let bibtex =
                BibtexRecord::build(entry.entry_type, &entry.cite_key, &entry.record, labels, today);
            print!("{}", bibtex.render(&config.output));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entry)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["pagebib", "-v", "labels", "list"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["pagebib", "-vv", "labels", "list"]);
        assert_eq!(cli.verbose, 2);

        let cli = Cli::parse_from(["pagebib", "labels", "list", "--verbose"]);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_cli_quiet_and_config_flags() {
        let cli = Cli::parse_from(["pagebib", "-q", "--config", "/path/to/config.toml", "labels", "list"]);
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_cli_extract_command() {
        let cli = Cli::parse_from([
            "pagebib",
            "extract",
            "page.html",
            "--url",
            "https://example.org/a",
            "-l",
            "reading",
            "--label",
            "ml",
            "--set",
            "journal=Nature",
            "--author",
            "Jane Doe; John Smith",
            "--type",
            "article",
            "-f",
            "json",
        ]);
        match cli.command {
            Commands::Extract {
                input,
                url,
                labels,
                overrides,
                author,
                entry_type,
                key,
                format,
            } => {
                assert_eq!(input, PathBuf::from("page.html"));
                assert_eq!(url, "https://example.org/a");
                assert_eq!(labels, vec!["reading", "ml"]);
                assert_eq!(overrides, vec!["journal=Nature"]);
                assert_eq!(author.as_deref(), Some("Jane Doe; John Smith"));
                assert_eq!(entry_type.as_deref(), Some("article"));
                assert!(key.is_none());
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_cli_extract_requires_url() {
        assert!(Cli::try_parse_from(["pagebib", "extract", "page.html"]).is_err());
    }

    #[test]
    fn test_cli_extract_alias_and_default_format() {
        let cli = Cli::parse_from(["pagebib", "x", "-", "-u", "https://example.org/"]);
        match cli.command {
            Commands::Extract { input, format, .. } => {
                assert_eq!(input, PathBuf::from("-"));
                assert_eq!(format, OutputFormat::Bibtex);
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_cli_fallback_command() {
        let cli = Cli::parse_from(["pagebib", "fallback", "-t", "Notes", "-u", "https://example.org/"]);
        match cli.command {
            Commands::Fallback { title, url, format } => {
                assert_eq!(title.as_deref(), Some("Notes"));
                assert_eq!(url, "https://example.org/");
                assert_eq!(format, OutputFormat::Bibtex);
            }
            _ => panic!("Expected Fallback command"),
        }
    }

    #[test]
    fn test_cli_labels_commands() {
        let cli = Cli::parse_from(["pagebib", "labels", "add", "to-read"]);
        assert!(matches!(
            cli.command,
            Commands::Labels { action: LabelsAction::Add { ref label } } if label == "to-read"
        ));

        let cli = Cli::parse_from(["pagebib", "labels", "clear"]);
        assert!(matches!(cli.command, Commands::Labels { action: LabelsAction::Clear }));
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::parse_from(["pagebib", "config", "init", "--path", "/tmp/p.toml", "--force"]);
        match cli.command {
            Commands::Config {
                action: ConfigAction::Init { path, force },
            } => {
                assert_eq!(path, Some(PathBuf::from("/tmp/p.toml")));
                assert!(force);
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_document_title() {
        assert_eq!(
            document_title("<html><head><title>  A\n Page </title></head></html>").as_deref(),
            Some("A Page")
        );
        assert_eq!(document_title("<html></html>"), None);
    }

    #[test]
    fn test_edits_rebuild_the_key() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let mut entry = fallback_record(None, "https://example.org/p", today);
        assert_eq!(entry.cite_key, "unknown2026untitled");

        apply_edits(
            &mut entry,
            &["title=Plain Words".to_string()],
            Some("Jane Doe; John Smith"),
            None,
            None,
            Some("2026"),
        )
        .unwrap();
        assert_eq!(entry.cite_key, "doe2026plain");

        apply_edits(&mut entry, &["year=2019".to_string()], None, None, None, Some("2026"))
            .unwrap();
        assert_eq!(entry.cite_key, "doe2019plain");
    }

    #[test]
    fn test_explicit_key_wins_over_edits() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let mut entry = fallback_record(Some("A Page"), "https://example.org/p", today);

        apply_edits(
            &mut entry,
            &["title=Other Words".to_string()],
            None,
            Some("misc"),
            Some("mykey".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(entry.cite_key, "mykey");
        assert_eq!(entry.entry_type, EntryType::Misc);
        assert_eq!(entry.record.get(Field::Title), Some("Other Words"));
    }

    #[test]
    fn test_remember_labels_preserves_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = LabelStore::at(dir.path().join("labels.json"));
        store.save(&["ml".to_string()]).unwrap();

        remember_labels(&store, &["reading".to_string(), "ML".to_string()]);
        let saved = store.load().unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved.iter().any(|l| l == "reading"));
    }
}
