//! Jarvis LLM Provider Layer
//!
//! Function-calling LLM clients behind a narrow, synchronous contract.
//!
//! # Architecture
//!
//! The extraction core only needs one operation: send a conversation plus a
//! function definition and get back the provider's choices. That contract is
//! the [`FunctionCallClient`] trait. Implementations perform exactly one
//! request per call, with no retry, pagination or streaming.
//!
//! # Providers
//!
//! - `MockClient`: Deterministic mock for testing
//! - `AzureOpenAiClient`: Azure OpenAI chat completions
//!
//! # Examples
//!
//! ```
//! use jarvis_llm::{ChatCompletion, FunctionCallClient, MockClient};
//! # use jarvis_llm::{ChatMessage, FunctionCallMode, FunctionCallRequest, FunctionSpec};
//! # let request = FunctionCallRequest {
//! #     model: "gpt-4o".to_string(),
//! #     messages: vec![ChatMessage::user("Ship from Mumbai")],
//! #     function: FunctionSpec {
//! #         name: "extract_entities".to_string(),
//! #         description: "Extract entities".to_string(),
//! #         parameters: serde_json::json!({"type": "object"}),
//! #     },
//! #     function_call: FunctionCallMode::Auto,
//! #     temperature: 0.0,
//! # };
//!
//! let client = MockClient::new(ChatCompletion::with_function_call(
//!     "extract_entities",
//!     r#"{"origin":"Mumbai"}"#,
//! ));
//! let response = client.complete(&request).unwrap();
//! assert_eq!(response.top_function_call().unwrap().arguments, r#"{"origin":"Mumbai"}"#);
//! ```

#![warn(missing_docs)]

pub mod azure;
pub mod types;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use azure::AzureOpenAiClient;
pub use types::{
    ChatCompletion, ChatMessage, Choice, FunctionCall, FunctionCallMode, FunctionCallRequest,
    FunctionSpec, MessageRole, ResponseMessage,
};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Rejected credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Trait for function-calling LLM providers
///
/// One call is one blocking round trip to the provider. Callers running on
/// an async runtime should invoke it from a blocking thread.
pub trait FunctionCallClient {
    /// Error type for LLM operations
    type Error;

    /// Send a function-calling completion request
    fn complete(&self, request: &FunctionCallRequest) -> Result<ChatCompletion, Self::Error>;
}

/// Mock function-calling client for deterministic testing
///
/// Returns queued responses first, then the default response. Every request
/// is recorded so tests can inspect exactly what would have been sent.
///
/// # Examples
///
/// ```
/// use jarvis_llm::{ChatCompletion, MockClient};
///
/// let client = MockClient::new(ChatCompletion::empty());
/// client.push_response(ChatCompletion::with_text("no function call"));
/// assert_eq!(client.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockClient {
    default_response: Result<ChatCompletion, String>,
    queued: Arc<Mutex<VecDeque<Result<ChatCompletion, String>>>>,
    requests: Arc<Mutex<Vec<FunctionCallRequest>>>,
}

impl MockClient {
    /// Create a new MockClient returning `response` for every request
    pub fn new(response: ChatCompletion) -> Self {
        Self {
            default_response: Ok(response),
            queued: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a MockClient that fails every request with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            default_response: Err(message.into()),
            queued: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response for the next unanswered request
    pub fn push_response(&self, response: ChatCompletion) {
        self.queued.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a failure for the next unanswered request
    pub fn push_error(&self, message: impl Into<String>) {
        self.queued.lock().unwrap().push_back(Err(message.into()));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// All requests received so far, oldest first
    pub fn requests(&self) -> Vec<FunctionCallRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<FunctionCallRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new(ChatCompletion::with_function_call("extract_entities", "{}"))
    }
}

impl FunctionCallClient for MockClient {
    type Error = LlmError;

    fn complete(&self, request: &FunctionCallRequest) -> Result<ChatCompletion, Self::Error> {
        self.requests.lock().unwrap().push(request.clone());

        let next = self
            .queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone());

        next.map_err(LlmError::Other)
    }
}
