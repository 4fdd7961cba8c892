//! Azure OpenAI Provider Implementation
//!
//! Function-calling chat completions against an Azure OpenAI deployment.
//!
//! # Features
//!
//! - Blocking HTTP communication (call it from a blocking thread)
//! - Configurable endpoint, API version and key
//! - Optional request timeout (none by default)
//! - No retries: every call is exactly one HTTP request
//!
//! # Examples
//!
//! ```no_run
//! use jarvis_llm::AzureOpenAiClient;
//!
//! let client = AzureOpenAiClient::new("https://my-resource.openai.azure.com", "secret-key")
//!     .unwrap()
//!     .with_api_version("2024-02-01");
//! ```

use crate::types::{
    ChatCompletion, ChatMessage, FunctionCallMode, FunctionCallRequest, FunctionSpec,
};
use crate::{FunctionCallClient, LlmError};
use serde::Serialize;
use std::time::Duration;

/// Default Azure OpenAI REST API version
pub const DEFAULT_API_VERSION: &str = "2024-02-01";

/// Azure OpenAI chat-completions client
pub struct AzureOpenAiClient {
    endpoint: String,
    api_key: String,
    api_version: String,
    timeout: Option<Duration>,
    client: reqwest::blocking::Client,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatCompletionsBody<'a> {
    messages: &'a [ChatMessage],
    functions: [&'a FunctionSpec; 1],
    function_call: FunctionCallMode,
    temperature: f32,
}

impl AzureOpenAiClient {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `endpoint`: resource endpoint (e.g., "https://my-resource.openai.azure.com")
    /// - `api_key`: resource key, sent as the `api-key` header
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: None,
            client: build_client(None)?,
        })
    }

    /// Set the REST API version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Bound every request by `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the HTTP client cannot be rebuilt.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(Some(timeout))?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    fn timeout_error(&self) -> LlmError {
        LlmError::Timeout(self.timeout.unwrap_or_default())
    }

    /// Chat completions URL for a deployment
    fn completions_url(&self, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, deployment, self.api_version
        )
    }
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::blocking::Client, LlmError> {
    // reqwest's blocking client defaults to a 30s timeout; `None` disables it
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}

impl FunctionCallClient for AzureOpenAiClient {
    type Error = LlmError;

    fn complete(&self, request: &FunctionCallRequest) -> Result<ChatCompletion, Self::Error> {
        let url = self.completions_url(&request.model);

        let body = ChatCompletionsBody {
            messages: &request.messages,
            functions: [&request.function],
            function_call: request.function_call,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    self.timeout_error()
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<ChatCompletion>().map_err(|e| {
                if e.is_timeout() {
                    self.timeout_error()
                } else {
                    LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                }
            });
        }

        match status {
            reqwest::StatusCode::NOT_FOUND => {
                Err(LlmError::ModelNotAvailable(request.model.clone()))
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(LlmError::RateLimitExceeded),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(LlmError::Authentication(format!("HTTP {}", status)))
            }
            _ => {
                let error_text = response
                    .text()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::net::TcpListener;

    const COMPLETIONS_PATH: &str = r"^/openai/deployments/gpt-4o/chat/completions";

    fn request() -> FunctionCallRequest {
        FunctionCallRequest {
            model: "gpt-4o".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("Ship from Mumbai")],
            function: FunctionSpec {
                name: "extract_entities".to_string(),
                description: "d".to_string(),
                parameters: serde_json::json!({"type": "object"}),
            },
            function_call: FunctionCallMode::Auto,
            temperature: 0.0,
        }
    }

    fn completions_mock(server: &mut mockito::Server, status: usize) -> mockito::Mock {
        server
            .mock("POST", Matcher::Regex(COMPLETIONS_PATH.to_string()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "nope"}}"#)
            .create()
    }

    #[test]
    fn test_client_creation() {
        let client = AzureOpenAiClient::new("https://example.openai.azure.com/", "key").unwrap();
        assert_eq!(client.endpoint, "https://example.openai.azure.com");
        assert_eq!(client.api_version, DEFAULT_API_VERSION);
        assert!(client.timeout.is_none());
    }

    #[test]
    fn test_completions_url() {
        let client = AzureOpenAiClient::new("https://example.openai.azure.com", "key")
            .unwrap()
            .with_api_version("2024-06-01");
        assert_eq!(
            client.completions_url("gpt-4o"),
            "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions\
             ?api-version=2024-06-01"
        );
    }

    #[test]
    fn test_with_timeout() {
        let client = AzureOpenAiClient::new("https://example.openai.azure.com", "key")
            .unwrap()
            .with_timeout(Duration::from_secs(5))
            .unwrap();
        assert_eq!(client.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("text")];
        let function = FunctionSpec {
            name: "extract_entities".to_string(),
            description: "desc".to_string(),
            parameters: serde_json::json!({"type": "object"}),
        };
        let body = ChatCompletionsBody {
            messages: &messages,
            functions: [&function],
            function_call: FunctionCallMode::Auto,
            temperature: 0.0,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["function_call"], "auto");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "text");
        assert_eq!(json["functions"][0]["name"], "extract_entities");
        assert_eq!(json["functions"][0]["parameters"]["type"], "object");
    }

    #[test]
    fn test_successful_completion_sends_key_and_api_version() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", Matcher::Regex(COMPLETIONS_PATH.to_string()))
            .match_query(Matcher::UrlEncoded(
                "api-version".to_string(),
                "2024-06-01".to_string(),
            ))
            .match_header("api-key", "secret-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "function_call": "auto"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices": [{"message": {"role": "assistant", "function_call":
                    {"name": "extract_entities", "arguments": "{\"origin\":\"Mumbai\"}"}}}]}"#,
            )
            .create();

        let client = AzureOpenAiClient::new(server.url(), "secret-key")
            .unwrap()
            .with_api_version("2024-06-01");
        let completion = client.complete(&request()).unwrap();

        mock.assert();
        let call = completion.top_function_call().unwrap();
        assert_eq!(call.arguments, r#"{"origin":"Mumbai"}"#);
    }

    #[test]
    fn test_unauthorized_is_authentication_error() {
        let mut server = mockito::Server::new();
        let mock = completions_mock(&mut server, 401);

        let client = AzureOpenAiClient::new(server.url(), "wrong-key").unwrap();
        let result = client.complete(&request());

        mock.assert();
        assert!(matches!(result, Err(LlmError::Authentication(_))));
    }

    #[test]
    fn test_not_found_is_model_not_available() {
        let mut server = mockito::Server::new();
        let mock = completions_mock(&mut server, 404);

        let client = AzureOpenAiClient::new(server.url(), "key").unwrap();
        let result = client.complete(&request());

        mock.assert();
        assert!(matches!(result, Err(LlmError::ModelNotAvailable(ref m)) if m == "gpt-4o"));
    }

    #[test]
    fn test_too_many_requests_is_rate_limit() {
        let mut server = mockito::Server::new();
        let mock = completions_mock(&mut server, 429);

        let client = AzureOpenAiClient::new(server.url(), "key").unwrap();
        let result = client.complete(&request());

        mock.assert();
        assert!(matches!(result, Err(LlmError::RateLimitExceeded)));
    }

    #[test]
    fn test_server_error_is_communication_error() {
        let mut server = mockito::Server::new();
        let mock = completions_mock(&mut server, 500);

        let client = AzureOpenAiClient::new(server.url(), "key").unwrap();
        let result = client.complete(&request());

        mock.assert();
        match result {
            Err(LlmError::Communication(msg)) => assert!(msg.contains("500")),
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    #[test]
    fn test_slow_endpoint_times_out() {
        // Accepts the connection but never answers
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let holder = std::thread::spawn(move || {
            let (_stream, _) = listener.accept().unwrap();
            std::thread::sleep(Duration::from_millis(500));
        });

        let timeout = Duration::from_millis(50);
        let client = AzureOpenAiClient::new(format!("http://{}", addr), "key")
            .unwrap()
            .with_timeout(timeout)
            .unwrap();

        match client.complete(&request()) {
            Err(LlmError::Timeout(elapsed)) => assert_eq!(elapsed, timeout),
            other => panic!("Expected Timeout error, got {:?}", other),
        }
        holder.join().unwrap();
    }

    #[test]
    fn test_unreachable_endpoint_is_communication_error() {
        let client = AzureOpenAiClient::new("http://127.0.0.1:9", "key").unwrap();

        match client.complete(&request()) {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }
}
