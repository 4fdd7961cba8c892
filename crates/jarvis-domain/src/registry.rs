//! Use case registry
//!
//! Populated once at startup and never mutated afterwards. Reads need no
//! locking; share it behind an `Arc`.

use crate::usecase::UseCaseDefinition;
use std::collections::HashMap;

/// Immutable mapping from use case name to its field governance
#[derive(Debug, Clone, Default)]
pub struct UseCaseRegistry {
    cases: HashMap<String, UseCaseDefinition>,
}

impl UseCaseRegistry {
    /// Build a registry from definitions
    ///
    /// If two definitions share a name, the later one wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use jarvis_domain::{UseCaseDefinition, UseCaseRegistry};
    ///
    /// let registry = UseCaseRegistry::from_definitions(vec![
    ///     UseCaseDefinition::new("CreateShipment", ["origin"], ["origin"]),
    /// ]);
    /// assert!(registry.lookup("CreateShipment").is_some());
    /// assert!(registry.lookup("TrackShipment").is_none());
    /// ```
    pub fn from_definitions(definitions: impl IntoIterator<Item = UseCaseDefinition>) -> Self {
        let cases = definitions
            .into_iter()
            .map(|def| (def.name().to_string(), def))
            .collect();

        Self { cases }
    }

    /// Look up a use case by exact name
    pub fn lookup(&self, use_case: &str) -> Option<&UseCaseDefinition> {
        self.cases.get(use_case)
    }

    /// Registered use case names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cases.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all definitions (unordered)
    pub fn definitions(&self) -> impl Iterator<Item = &UseCaseDefinition> {
        self.cases.values()
    }

    /// Number of registered use cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether no use cases are registered
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
