//! Request and response types for extraction

use jarvis_domain::ExtractedEntities;
use std::collections::BTreeSet;

/// Language reported when the request carries none
pub const DEFAULT_LANGUAGE: &str = "en";

/// Fixed reason attached to every successful result
pub const EXTRACTION_REASON: &str = "LLM function-calling extraction";

/// Request to extract entities from text
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Raw input text
    pub text: String,

    /// Name of a registered use case (e.g. "CreateShipment")
    pub use_case: String,

    /// Optional language tag, passed through untranslated
    pub language: Option<String>,
}

impl ExtractionRequest {
    /// Create a request without a language
    pub fn new(text: impl Into<String>, use_case: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            use_case: use_case.into(),
            language: None,
        }
    }

    /// Set the request language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// The request language, or [`DEFAULT_LANGUAGE`] when absent or blank
    pub fn effective_language(&self) -> &str {
        match self.language.as_deref() {
            Some(lang) if !lang.trim().is_empty() => lang,
            _ => DEFAULT_LANGUAGE,
        }
    }
}

/// Result of an extraction operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Extracted values, keyed by allowed field name
    pub extracted_entities: ExtractedEntities,

    /// Required fields with no extracted value
    pub missing_fields: BTreeSet<String>,

    /// How the entities were obtained
    pub reason: String,

    /// Echoed or defaulted language
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_defaults_when_absent() {
        let request = ExtractionRequest::new("text", "CreateShipment");
        assert_eq!(request.effective_language(), "en");
    }

    #[test]
    fn test_language_defaults_when_blank() {
        let request = ExtractionRequest::new("text", "CreateShipment").with_language("  ");
        assert_eq!(request.effective_language(), "en");
    }

    #[test]
    fn test_language_kept_verbatim() {
        let request = ExtractionRequest::new("text", "CreateShipment").with_language("hi-IN");
        assert_eq!(request.effective_language(), "hi-IN");
    }
}
