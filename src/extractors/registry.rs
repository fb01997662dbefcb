//! Registry for managing metadata extractors.

use std::sync::Arc;

use super::{
    ArxivExtractor, DoiExtractor, Extractor, ExtractorId, MetaTagExtractor,
    PublisherHeuristicsExtractor, PubMedExtractor, ScholarExtractor, StructuredDataExtractor,
    WebpageExtractor,
};
use crate::config::{Config, ExtractorsConfig};
use crate::models::{Page, PartialRecord};

/// What one extractor reported for a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorOutput {
    /// Which extractor produced the record
    pub id: ExtractorId,
    /// Whether its `entry_type` is final
    pub pins_entry_type: bool,
    /// The fields it found; empty when it failed or did not apply
    pub record: PartialRecord,
}

/// Registry for all available extractors
///
/// Extractors run in registration order. Their outputs are independent, so
/// the order only affects logging.
#[derive(Debug, Clone)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Create a registry with every built-in extractor
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Create a registry with the built-in extractors the config allows
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::empty();

        registry.register(Arc::new(ArxivExtractor::new()));
        registry.register(Arc::new(PubMedExtractor::new()));
        registry.register(Arc::new(ScholarExtractor::new()));
        registry.register(Arc::new(MetaTagExtractor::new()));
        registry.register(Arc::new(StructuredDataExtractor::new()));
        registry.register(Arc::new(WebpageExtractor::new()));
        registry.register(Arc::new(PublisherHeuristicsExtractor::new(
            config.heuristics.body_scan_limit,
        )));
        registry.register(Arc::new(DoiExtractor::new()));

        registry.retain_enabled(&config.extractors);
        registry
    }

    /// Create a registry with no extractors
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Register an extractor, replacing any earlier one with the same id
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) {
        let id = extractor.id();
        self.extractors.retain(|e| e.id() != id);
        self.extractors.push(extractor);
    }

    /// Get an extractor by id
    pub fn get(&self, id: ExtractorId) -> Option<&Arc<dyn Extractor>> {
        self.extractors.iter().find(|e| e.id() == id)
    }

    /// Check if an extractor is registered
    pub fn has(&self, id: ExtractorId) -> bool {
        self.get(id).is_some()
    }

    /// Get all registered extractors
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Extractor>> {
        self.extractors.iter()
    }

    /// Get all registered ids
    pub fn ids(&self) -> impl Iterator<Item = ExtractorId> + '_ {
        self.extractors.iter().map(|e| e.id())
    }

    /// Get the number of registered extractors
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Run every applicable extractor against `page`.
    ///
    /// An extractor that does not apply, or that fails, contributes an empty
    /// record; failures are logged and never abort the run.
    pub fn run(&self, page: &Page) -> Vec<ExtractorOutput> {
        self.extractors
            .iter()
            .map(|extractor| {
                let record = if extractor.applies_to(page) {
                    match extractor.extract(page) {
                        Ok(record) => {
                            tracing::debug!(
                                "{} extractor found {} field(s)",
                                extractor.name(),
                                record.len()
                            );
                            record
                        }
                        Err(e) => {
                            tracing::warn!("{} extractor failed: {}", extractor.name(), e);
                            PartialRecord::new()
                        }
                    }
                } else {
                    tracing::debug!("{} extractor does not apply", extractor.name());
                    PartialRecord::new()
                };
                ExtractorOutput {
                    id: extractor.id(),
                    pins_entry_type: extractor.pins_entry_type(),
                    record,
                }
            })
            .collect()
    }

    /// Drop extractors excluded by the enabled/disabled lists.
    ///
    /// 1. If `enabled` is set, only those extractors are kept
    /// 2. `disabled` always takes precedence
    fn retain_enabled(&mut self, config: &ExtractorsConfig) {
        let enabled = parse_id_list(config.enabled.as_deref());
        let disabled = parse_id_list(config.disabled.as_deref());
        self.extractors.retain(|e| {
            let id = e.id();
            let allowed = enabled.as_ref().map(|list| list.contains(&id)).unwrap_or(true);
            let blocked = disabled.as_ref().map(|list| list.contains(&id)).unwrap_or(false);
            allowed && !blocked
        });
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_id_list(list: Option<&str>) -> Option<Vec<ExtractorId>> {
    let list = list?.trim();
    if list.is_empty() {
        return None;
    }
    Some(
        list.split(',')
            .filter_map(|s| match s.parse::<ExtractorId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!("Ignoring {}", e);
                    None
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{ExtractError, MockExtractor};
    use crate::models::Field;

    #[test]
    fn test_registry_basic() {
        let registry = ExtractorRegistry::new();

        assert_eq!(registry.len(), 8);
        assert!(!registry.is_empty());
        for id in ExtractorId::ALL {
            assert!(registry.has(id), "Extractor '{}' should be registered", id);
        }
    }

    #[test]
    fn test_enabled_and_disabled_lists() {
        let mut config = Config::default();
        config.extractors.enabled = Some("meta, jsonld,doi,bogus".to_string());
        config.extractors.disabled = Some("doi".to_string());

        let registry = ExtractorRegistry::from_config(&config);
        let ids: Vec<ExtractorId> = registry.ids().collect();
        assert_eq!(ids, vec![ExtractorId::Meta, ExtractorId::JsonLd]);
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = ExtractorRegistry::empty();
        registry.register(Arc::new(MockExtractor::new(ExtractorId::Meta)));
        registry.register(Arc::new(MockExtractor::new(ExtractorId::Meta)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failures_degrade_to_empty_records() {
        let mut good = PartialRecord::new();
        good.set(Field::Title, "Kept");

        let mut registry = ExtractorRegistry::empty();
        registry.register(Arc::new(MockExtractor::new(ExtractorId::Meta).returning(good)));
        registry.register(Arc::new(
            MockExtractor::new(ExtractorId::JsonLd)
                .failing(ExtractError::Selector("div[".to_string())),
        ));
        registry.register(Arc::new(
            MockExtractor::new(ExtractorId::Arxiv).not_applicable(),
        ));

        let page = Page::parse("https://example.org/", "<html></html>").unwrap();
        let outputs = registry.run(&page);

        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].record.get(Field::Title), Some("Kept"));
        assert!(outputs[1].record.is_empty());
        assert!(outputs[2].record.is_empty());
    }
}
