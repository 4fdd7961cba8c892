//! Jarvis Domain Layer
//!
//! This crate contains the core business concepts for entity extraction.
//! Its only external dependency is `uuid`; it defines the value objects that
//! every other layer depends upon.
//!
//! ## Key Concepts
//!
//! - **Use case**: a named business scenario (e.g. "CreateShipment") that
//!   decides which entity fields are relevant
//! - **Allowed fields**: every field name a result may ever contain
//! - **Required fields**: field names whose absence is reported as missing
//! - **Correlation id**: an opaque per-request token for log correlation
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Infrastructure (LLM transport, HTTP, config files) lives in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod correlation;
pub mod entities;
pub mod registry;
pub mod usecase;

// Re-exports for convenience
pub use correlation::CorrelationId;
pub use entities::ExtractedEntities;
pub use registry::UseCaseRegistry;
pub use usecase::UseCaseDefinition;
