//! Extracted entities - the validated result of an extraction

use std::collections::BTreeMap;

/// Mapping from allowed field name to extracted value
///
/// Only built through [`crate::UseCaseDefinition::retain_allowed`], so the
/// keys are always a subset of the use case's allowed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedEntities(BTreeMap<String, String>);

impl ExtractedEntities {
    pub(crate) fn new(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }

    /// Get the value extracted for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Check if a field was extracted
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Extracted field names, in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of extracted fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}
