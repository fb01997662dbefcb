//! Mock extractor for testing purposes.

use crate::extractors::{ExtractError, Extractor, ExtractorId};
use crate::models::{Field, Page, PartialRecord};

/// A mock extractor that returns a predefined record or error.
#[derive(Debug, Clone)]
pub struct MockExtractor {
    id: ExtractorId,
    record: PartialRecord,
    error: Option<ExtractError>,
    applies: bool,
    pins: bool,
}

impl MockExtractor {
    /// Create a mock that reports an empty record under `id`
    pub fn new(id: ExtractorId) -> Self {
        Self {
            id,
            record: PartialRecord::new(),
            error: None,
            applies: true,
            pins: false,
        }
    }

    /// Report `record` on every page
    pub fn returning(mut self, record: PartialRecord) -> Self {
        self.record = record;
        self
    }

    /// Fail with `error` on every page
    pub fn failing(mut self, error: ExtractError) -> Self {
        self.error = Some(error);
        self
    }

    /// Never apply to any page
    pub fn not_applicable(mut self) -> Self {
        self.applies = false;
        self
    }

    /// Mark the reported entry type as final
    pub fn pinning(mut self) -> Self {
        self.pins = true;
        self
    }
}

impl Extractor for MockExtractor {
    fn id(&self) -> ExtractorId {
        self.id
    }

    fn name(&self) -> &str {
        "Mock Extractor"
    }

    fn applies_to(&self, _page: &Page) -> bool {
        self.applies
    }

    fn pins_entry_type(&self) -> bool {
        self.pins
    }

    fn extract(&self, _page: &Page) -> Result<PartialRecord, ExtractError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.record.clone()),
        }
    }
}

/// Helper function to build a record from `(field, value)` pairs for tests.
pub fn make_record(fields: &[(Field, &str)]) -> PartialRecord {
    let mut record = PartialRecord::new();
    for (field, value) in fields {
        record.set(*field, value);
    }
    record
}
