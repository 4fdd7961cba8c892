//! Configuration for the Extractor

use serde::Deserialize;

/// Configuration for the Extractor
///
/// Only the function naming is read from configuration files; the model is
/// supplied by the caller alongside the endpoint settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Model (Azure deployment) identifier sent with every request
    #[serde(skip)]
    pub model: String,

    /// Name of the function the model must invoke
    pub function_name: String,

    /// Human-readable description of that function
    pub function_description: String,
}

impl ExtractorConfig {
    /// Create a configuration for `model` with default function naming
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        // Function names are limited to a-z, A-Z, 0-9, '_' and '-', max 64 chars
        if self.function_name.is_empty() || self.function_name.len() > 64 {
            return Err("function_name must be 1-64 characters".to_string());
        }
        if !self
            .function_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(format!(
                "function_name '{}' may only contain letters, digits, '_' and '-'",
                self.function_name
            ));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            function_name: "extract_entities".to_string(),
            function_description: "Extract business entities from the user input.".to_string(),
        }
    }
}
