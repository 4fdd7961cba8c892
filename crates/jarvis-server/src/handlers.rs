//! HTTP request handlers for the extraction service.
//!
//! Implements entity extraction and health check endpoints using axum.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use jarvis_domain::CorrelationId;
use jarvis_extractor::{ExtractionFailed, ExtractionRequest, ExtractionResult, Extractor};
use jarvis_llm::FunctionCallClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Request header carrying the correlation id
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Shared application state
pub struct AppState<C>
where
    C: FunctionCallClient,
{
    /// Extraction orchestrator
    pub extractor: Arc<Extractor<C>>,
}

impl<C> Clone for AppState<C>
where
    C: FunctionCallClient,
{
    fn clone(&self) -> Self {
        Self {
            extractor: Arc::clone(&self.extractor),
        }
    }
}

/// Entity extraction request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractEntitiesRequest {
    /// Raw input text
    #[serde(default)]
    pub text: String,
    /// Business use case name
    #[serde(default)]
    pub use_case: String,
    /// Optional language tag
    #[serde(default)]
    pub language: Option<String>,
}

/// Entity extraction response body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractEntitiesResponse {
    /// Extracted values keyed by field name
    pub extracted_entities: BTreeMap<String, String>,
    /// Required fields that could not be extracted
    pub missing_fields: Vec<String>,
    /// How the entities were obtained
    pub reason: String,
    /// Echoed or defaulted language
    pub language: String,
}

impl From<ExtractionResult> for ExtractEntitiesResponse {
    fn from(result: ExtractionResult) -> Self {
        Self {
            extracted_entities: result.extracted_entities.into_inner(),
            missing_fields: result.missing_fields.into_iter().collect(),
            reason: result.reason,
            language: result.language,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of registered use cases
    pub use_case_count: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request body failed validation
    Validation(String),
    /// Extraction failed (unknown use case, model malfunction, ...)
    Extraction(ExtractionFailed),
    /// Anything unclassified; details are logged, never returned
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => {
                warn!("Request validation failed: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Extraction(e) => {
                error!("Entity extraction error: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Internal(msg) => {
                error!("Unhandled error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<ExtractionFailed> for AppError {
    fn from(e: ExtractionFailed) -> Self {
        AppError::Extraction(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_) => AppError::Validation(message),
            _ => AppError::Internal(message),
        }
    }
}

impl ExtractEntitiesRequest {
    fn validate(self) -> Result<ExtractionRequest, AppError> {
        if self.text.trim().is_empty() {
            return Err(AppError::Validation(
                "Input text must not be blank".to_string(),
            ));
        }
        if self.use_case.trim().is_empty() {
            return Err(AppError::Validation(
                "Business use case/intent must be specified".to_string(),
            ));
        }

        Ok(ExtractionRequest {
            text: self.text,
            use_case: self.use_case,
            language: self.language,
        })
    }
}

/// POST /extract-entities - Extract the entities of a use case from text
///
/// The correlation id is taken from `x-correlation-id` (or generated) and
/// echoed back on every response, including errors.
async fn extract_entities<C>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    payload: Result<Json<ExtractEntitiesRequest>, JsonRejection>,
) -> Response
where
    C: FunctionCallClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    let correlation_id = CorrelationId::from_header(
        headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
    );

    let mut response = handle_extract(&state, payload, &correlation_id)
        .await
        .into_response();

    if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}

async fn handle_extract<C>(
    state: &AppState<C>,
    payload: Result<Json<ExtractEntitiesRequest>, JsonRejection>,
    correlation_id: &CorrelationId,
) -> Result<Json<ExtractEntitiesResponse>, AppError>
where
    C: FunctionCallClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    let Json(body) = payload?;

    info!(
        correlation_id = %correlation_id,
        use_case = %body.use_case,
        text_length = body.text.len(),
        "Received extract-entities request"
    );

    let request = body.validate()?;
    let result = state.extractor.extract(request, correlation_id).await?;

    Ok(Json(ExtractEntitiesResponse::from(result)))
}

/// GET /health - Health check
async fn health_check<C>(State(state): State<AppState<C>>) -> Json<HealthCheckResponse>
where
    C: FunctionCallClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        use_case_count: state.extractor.registry().len(),
    })
}

/// Create the axum router with all routes
pub fn create_router<C>(state: AppState<C>) -> AxumRouter
where
    C: FunctionCallClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    AxumRouter::new()
        .route("/extract-entities", post(extract_entities::<C>))
        .route("/health", get(health_check::<C>))
        .with_state(state)
}
