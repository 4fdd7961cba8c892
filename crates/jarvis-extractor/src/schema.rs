//! Extraction schema construction
//!
//! Turns a use case's field sets into the JSON Schema object attached to the
//! function definition. Property order carries no meaning; properties are
//! emitted in sorted order so the output is stable.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Per-call JSON Schema for the extraction function's parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionSchema {
    #[serde(rename = "type")]
    schema_type: &'static str,
    properties: BTreeMap<String, FieldProperty>,
    required: Vec<String>,
}

/// Schema entry for a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldProperty {
    #[serde(rename = "type")]
    field_type: &'static str,
    description: String,
}

impl ExtractionSchema {
    /// Field names with a property entry
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Description of a field's property, if present
    pub fn description(&self, field: &str) -> Option<&str> {
        self.properties.get(field).map(|p| p.description.as_str())
    }

    /// The schema's required list
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Convert to a JSON value for a function definition
    pub fn to_value(&self) -> serde_json::Value {
        // Only strings and string maps: serialization cannot fail
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Builds extraction schemas
pub struct SchemaBuilder;

impl SchemaBuilder {
    /// Build the schema for a set of allowed and required fields
    ///
    /// Every allowed field becomes a string-typed property. The required
    /// list is `required_fields` verbatim; it is not checked against the
    /// allowed fields.
    pub fn build(
        allowed_fields: &BTreeSet<String>,
        required_fields: &BTreeSet<String>,
    ) -> ExtractionSchema {
        let properties = allowed_fields
            .iter()
            .map(|field| {
                (
                    field.clone(),
                    FieldProperty {
                        field_type: "string",
                        description: format!("Extracted field: {}", field),
                    },
                )
            })
            .collect();

        ExtractionSchema {
            schema_type: "object",
            properties,
            required: required_fields.iter().cloned().collect(),
        }
    }
}
