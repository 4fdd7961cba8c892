//! Error types for the Extractor

use thiserror::Error;

/// Internal failure taxonomy of an extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Blank text or use case reached the extractor
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Use case not present in the registry
    #[error("Unknown business use case: {0}")]
    UnknownUseCase(String),

    /// The model returned no choices
    #[error("No response from model")]
    NoModelResponse,

    /// The model answered in prose instead of invoking the function
    #[error("No function call result in model response")]
    NoFunctionCallInResponse,

    /// Function-call arguments are not a flat JSON object
    #[error("Malformed function-call arguments: {0}")]
    MalformedArguments(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::MalformedArguments(e.to_string())
    }
}

/// The single error kind surfaced by [`crate::Extractor::extract`]
///
/// Every internal failure collapses into this type. The display message
/// carries the underlying cause; [`ExtractionFailed::kind`] exposes it for
/// logging and tests, but callers are expected to treat all failures alike.
#[derive(Error, Debug)]
#[error("Entity extraction failed: {source}")]
pub struct ExtractionFailed {
    #[source]
    source: ExtractorError,
}

impl ExtractionFailed {
    /// The underlying failure
    pub fn kind(&self) -> &ExtractorError {
        &self.source
    }
}

impl From<ExtractorError> for ExtractionFailed {
    fn from(source: ExtractorError) -> Self {
        Self { source }
    }
}
