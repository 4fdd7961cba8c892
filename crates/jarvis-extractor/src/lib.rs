//! Jarvis Extractor
//!
//! Converts free-text business input into the structured entities of a
//! configured use case, using LLM function calling.
//!
//! # Overview
//!
//! Each use case (e.g. "CreateShipment") defines which fields may be
//! extracted and which are required. The extractor offers the model a single
//! function whose parameters are exactly the allowed fields, forces it to
//! answer by calling that function, then reconciles the answer against the
//! use case.
//!
//! # Architecture
//!
//! ```text
//! Request → Registry lookup → SchemaBuilder → LLM function call
//!         → parse arguments → keep allowed fields → diff required fields
//! ```
//!
//! # Example Usage
//!
//! ```
//! use jarvis_domain::{CorrelationId, UseCaseDefinition, UseCaseRegistry};
//! use jarvis_extractor::{ExtractionRequest, Extractor, ExtractorConfig};
//! use jarvis_llm::{ChatCompletion, MockClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(UseCaseRegistry::from_definitions(vec![
//!     UseCaseDefinition::new(
//!         "CreateShipment",
//!         ["origin", "destination", "weight"],
//!         ["origin", "destination"],
//!     ),
//! ]));
//! let client = MockClient::new(ChatCompletion::with_function_call(
//!     "extract_entities",
//!     r#"{"origin":"Mumbai"}"#,
//! ));
//!
//! let extractor = Extractor::new(client, registry, ExtractorConfig::default());
//!
//! let request = ExtractionRequest::new("Ship my parcel from Mumbai", "CreateShipment");
//! let result = extractor.extract(request, &CorrelationId::new()).await?;
//!
//! assert_eq!(result.extracted_entities.get("origin"), Some("Mumbai"));
//! assert!(result.missing_fields.contains("destination"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod schema;
mod types;


pub use config::ExtractorConfig;
pub use error::{ExtractionFailed, ExtractorError};
pub use extractor::Extractor;
pub use parser::parse_function_arguments;
pub use schema::{ExtractionSchema, FieldProperty, SchemaBuilder};
pub use types::{ExtractionRequest, ExtractionResult, DEFAULT_LANGUAGE, EXTRACTION_REASON};
