//! Use case module - per-use-case field governance

use crate::entities::ExtractedEntities;
use std::collections::{BTreeMap, BTreeSet};

/// Field governance for a named business scenario (e.g. "CreateShipment")
///
/// `allowed_fields` is the closed set of keys an extraction result may
/// contain. `required_fields` lists keys whose absence is reported back to
/// the caller. Required fields are NOT forced to be a subset of the allowed
/// fields; see [`UseCaseDefinition::unreachable_required_fields`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseCaseDefinition {
    name: String,
    allowed_fields: BTreeSet<String>,
    required_fields: BTreeSet<String>,
}

impl UseCaseDefinition {
    /// Create a new use case definition
    ///
    /// # Examples
    ///
    /// ```
    /// use jarvis_domain::UseCaseDefinition;
    ///
    /// let def = UseCaseDefinition::new(
    ///     "CreateShipment",
    ///     ["origin", "destination", "weight"],
    ///     ["origin", "destination"],
    /// );
    /// assert!(def.is_allowed("weight"));
    /// assert!(def.is_required("origin"));
    /// ```
    pub fn new<A, R>(name: impl Into<String>, allowed_fields: A, required_fields: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            name: name.into(),
            allowed_fields: allowed_fields.into_iter().map(Into::into).collect(),
            required_fields: required_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Use case name (the registry key)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The only keys an extraction result may contain
    pub fn allowed_fields(&self) -> &BTreeSet<String> {
        &self.allowed_fields
    }

    /// Keys whose absence is reported as missing
    pub fn required_fields(&self) -> &BTreeSet<String> {
        &self.required_fields
    }

    /// Check if a field may appear in an extraction result
    pub fn is_allowed(&self, field: &str) -> bool {
        self.allowed_fields.contains(field)
    }

    /// Check if a field is required
    pub fn is_required(&self, field: &str) -> bool {
        self.required_fields.contains(field)
    }

    /// Required fields that are not allowed
    ///
    /// Such fields are filtered out of every possible result and will
    /// therefore always be reported as missing.
    pub fn unreachable_required_fields(&self) -> Vec<&str> {
        self.required_fields
            .difference(&self.allowed_fields)
            .map(String::as_str)
            .collect()
    }

    /// Keep only the entries whose key is an allowed field
    ///
    /// # Examples
    ///
    /// ```
    /// use jarvis_domain::UseCaseDefinition;
    /// use std::collections::BTreeMap;
    ///
    /// let def = UseCaseDefinition::new("CreateShipment", ["origin"], ["origin"]);
    /// let mut raw = BTreeMap::new();
    /// raw.insert("origin".to_string(), "Mumbai".to_string());
    /// raw.insert("notes".to_string(), "fragile".to_string());
    ///
    /// let entities = def.retain_allowed(raw);
    /// assert_eq!(entities.get("origin"), Some("Mumbai"));
    /// assert!(entities.get("notes").is_none());
    /// ```
    pub fn retain_allowed(&self, mut raw: BTreeMap<String, String>) -> ExtractedEntities {
        raw.retain(|key, _| self.allowed_fields.contains(key));
        ExtractedEntities::new(raw)
    }

    /// Required fields with no entry in `entities`
    pub fn missing_fields(&self, entities: &ExtractedEntities) -> BTreeSet<String> {
        self.required_fields
            .iter()
            .filter(|field| !entities.contains(field))
            .cloned()
            .collect()
    }
}
