//! Jarvis Server
//!
//! HTTP boundary for entity extraction: request validation, correlation id
//! handling and error-to-status mapping around the extractor.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use jarvis_extractor::Extractor;
use jarvis_llm::{AzureOpenAiClient, LlmError};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// LLM client could not be created
    #[error("LLM client error: {0}")]
    Llm(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Build application state backed by Azure OpenAI
///
/// Must be called outside of an async context: the client is blocking.
pub fn build_state(config: &ServerConfig) -> Result<AppState<AzureOpenAiClient>, ServerError> {
    let mut client =
        AzureOpenAiClient::new(config.llm.endpoint.clone(), config.llm.api_key.clone())?
            .with_api_version(config.llm.api_version.clone());

    match config.request_timeout() {
        Some(timeout) => {
            info!("LLM request timeout: {:?}", timeout);
            client = client.with_timeout(timeout)?;
        }
        None => info!("LLM request timeout: none"),
    }

    let registry = Arc::new(config.registry());
    log_registry(config, &registry);

    let extractor = Extractor::new(client, registry, config.extractor_config());

    Ok(AppState {
        extractor: Arc::new(extractor),
    })
}

fn log_registry(config: &ServerConfig, registry: &jarvis_domain::UseCaseRegistry) {
    info!("Registered use cases: {:?}", registry.names());

    let mut definitions: Vec<_> = registry.definitions().collect();
    definitions.sort_by(|a, b| a.name().cmp(b.name()));
    for definition in definitions {
        let unreachable = definition.unreachable_required_fields();
        if !unreachable.is_empty() {
            warn!(
                "Use case '{}' requires fields that are not allowed \
                 and will always be reported missing: {:?}",
                definition.name(),
                unreachable
            );
        }
    }

    if let Some(threshold) = config.confidence_threshold {
        warn!(
            "confidence_threshold = {} is configured but not used by extraction",
            threshold
        );
    }
}

/// Serve the HTTP API until Ctrl+C
pub async fn serve<C>(config: ServerConfig, state: AppState<C>) -> Result<(), ServerError>
where
    C: jarvis_llm::FunctionCallClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    info!("Starting Jarvis entity extraction server");
    info!("Bind address: {}", config.bind_addr());
    info!("Model: {}", config.llm.model);

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_from_test_config() {
        let config = ServerConfig::default_test_config();
        let state = build_state(&config).unwrap();
        assert_eq!(state.extractor.registry().len(), 1);
    }

    #[test]
    fn test_build_state_with_timeout() {
        let mut config = ServerConfig::default_test_config();
        config.llm.request_timeout_secs = Some(15);
        assert!(build_state(&config).is_ok());
    }
}
