//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::{ExtractionFailed, ExtractorError};
use crate::parser::parse_function_arguments;
use crate::prompt::PromptBuilder;
use crate::schema::SchemaBuilder;
use crate::types::{ExtractionRequest, ExtractionResult, EXTRACTION_REASON};
use jarvis_domain::{CorrelationId, UseCaseRegistry};
use jarvis_llm::{ChatCompletion, FunctionCallClient, FunctionCallRequest};
use std::sync::Arc;
use tracing::{debug, error, info};

/// The Extractor turns free text into the entities of a use case
///
/// Holds no per-request state: the registry is immutable and the client is
/// shared, so one instance serves any number of concurrent requests.
pub struct Extractor<C>
where
    C: FunctionCallClient,
{
    client: Arc<C>,
    registry: Arc<UseCaseRegistry>,
    config: ExtractorConfig,
}

impl<C> Extractor<C>
where
    C: FunctionCallClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    /// Create a new Extractor
    pub fn new(client: C, registry: Arc<UseCaseRegistry>, config: ExtractorConfig) -> Self {
        Self {
            client: Arc::new(client),
            registry,
            config,
        }
    }

    /// The use case registry this extractor resolves against
    pub fn registry(&self) -> &UseCaseRegistry {
        &self.registry
    }

    /// Extract the entities of `request.use_case` from `request.text`
    ///
    /// Performs at most one outbound model call. Every failure is logged
    /// with `correlation_id` and returned as [`ExtractionFailed`].
    pub async fn extract(
        &self,
        request: ExtractionRequest,
        correlation_id: &CorrelationId,
    ) -> Result<ExtractionResult, ExtractionFailed> {
        info!(
            correlation_id = %correlation_id,
            use_case = %request.use_case,
            text_length = request.text.len(),
            "Extracting entities"
        );

        match self.try_extract(&request, correlation_id).await {
            Ok(result) => {
                info!(
                    correlation_id = %correlation_id,
                    use_case = %request.use_case,
                    extracted = result.extracted_entities.len(),
                    missing = result.missing_fields.len(),
                    "Extraction complete"
                );
                Ok(result)
            }
            Err(e) => {
                error!(
                    correlation_id = %correlation_id,
                    use_case = %request.use_case,
                    error = %e,
                    "Entity extraction failed"
                );
                Err(ExtractionFailed::from(e))
            }
        }
    }

    async fn try_extract(
        &self,
        request: &ExtractionRequest,
        correlation_id: &CorrelationId,
    ) -> Result<ExtractionResult, ExtractorError> {
        if request.text.trim().is_empty() {
            return Err(ExtractorError::InvalidRequest(
                "Input text must not be blank".to_string(),
            ));
        }
        if request.use_case.trim().is_empty() {
            return Err(ExtractorError::InvalidRequest(
                "Business use case/intent must be specified".to_string(),
            ));
        }

        let definition = self
            .registry
            .lookup(&request.use_case)
            .ok_or_else(|| ExtractorError::UnknownUseCase(request.use_case.clone()))?;

        let schema =
            SchemaBuilder::build(definition.allowed_fields(), definition.required_fields());

        let outbound =
            PromptBuilder::new(&self.config, definition.name(), &request.text).build(&schema);

        let completion = self.call_llm(outbound, correlation_id).await?;

        if completion.choices.is_empty() {
            return Err(ExtractorError::NoModelResponse);
        }

        let function_call = completion
            .top_function_call()
            .ok_or(ExtractorError::NoFunctionCallInResponse)?;

        debug!(
            correlation_id = %correlation_id,
            function = %function_call.name,
            arguments = %function_call.arguments,
            "Function call arguments"
        );

        let raw_fields = parse_function_arguments(&function_call.arguments)?;
        let extracted_entities = definition.retain_allowed(raw_fields);
        let missing_fields = definition.missing_fields(&extracted_entities);

        Ok(ExtractionResult {
            extracted_entities,
            missing_fields,
            reason: EXTRACTION_REASON.to_string(),
            language: request.effective_language().to_string(),
        })
    }

    /// Call the LLM client
    async fn call_llm(
        &self,
        request: FunctionCallRequest,
        correlation_id: &CorrelationId,
    ) -> Result<ChatCompletion, ExtractorError> {
        info!(
            correlation_id = %correlation_id,
            model = %request.model,
            "Calling LLM"
        );

        let client = Arc::clone(&self.client);

        // Call in a blocking context since FunctionCallClient is not async
        tokio::task::spawn_blocking(move || {
            client
                .complete(&request)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jarvis_domain::UseCaseDefinition;
    use jarvis_llm::MockClient;

    fn create_test_extractor(client: MockClient) -> Extractor<MockClient> {
        let registry = Arc::new(UseCaseRegistry::from_definitions(vec![UseCaseDefinition::new(
            "CreateShipment",
            ["origin", "destination", "weight"],
            ["origin", "destination"],
        )]));
        Extractor::new(client, registry, ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_blank_text_rejected_without_call() {
        let client = MockClient::default();
        let extractor = create_test_extractor(client.clone());

        let result = extractor
            .extract(ExtractionRequest::new("  ", "CreateShipment"), &CorrelationId::new())
            .await;

        assert!(matches!(
            result.unwrap_err().kind(),
            ExtractorError::InvalidRequest(_)
        ));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_use_case_rejected_without_call() {
        let client = MockClient::default();
        let extractor = create_test_extractor(client.clone());

        let result = extractor
            .extract(ExtractionRequest::new("Ship it", ""), &CorrelationId::new())
            .await;

        assert!(matches!(
            result.unwrap_err().kind(),
            ExtractorError::InvalidRequest(_)
        ));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_llm_failure_is_wrapped() {
        let client = MockClient::failing("connection reset");
        let extractor = create_test_extractor(client);

        let err = extractor
            .extract(ExtractionRequest::new("Ship it", "CreateShipment"), &CorrelationId::new())
            .await
            .unwrap_err();

        assert!(matches!(err.kind(), ExtractorError::Llm(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}
