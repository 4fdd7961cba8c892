//! Function-calling request/response types
//!
//! These mirror the chat-completions wire format closely enough to be
//! serialized directly, while staying independent of any one provider.

use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions
    System,
    /// User message
    User,
    /// Assistant (LLM) response
    Assistant,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Text content of the message
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Creates a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Definition of the function the model is asked to invoke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Name of the function
    pub name: String,
    /// Description of what the function does
    pub description: String,
    /// JSON Schema for the function's parameters
    pub parameters: serde_json::Value,
}

/// How the model chooses whether to call a function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionCallMode {
    /// The model picks the function itself
    #[default]
    Auto,
}

/// A single function-calling completion request
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallRequest {
    /// Model (or deployment) identifier
    pub model: String,
    /// Ordered conversation messages
    pub messages: Vec<ChatMessage>,
    /// The function offered to the model
    pub function: FunctionSpec,
    /// Function selection mode
    pub function_call: FunctionCallMode,
    /// Sampling temperature
    pub temperature: f32,
}

/// Function invocation returned by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the invoked function
    #[serde(default)]
    pub name: String,
    /// Raw JSON argument string, exactly as the model produced it
    #[serde(default)]
    pub arguments: String,
}

/// Message part of a completion choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Role reported by the provider
    #[serde(default)]
    pub role: Option<String>,
    /// Plain-text content, if the model answered in prose
    #[serde(default)]
    pub content: Option<String>,
    /// Function invocation, if the model called the function
    #[serde(default)]
    pub function_call: Option<FunctionCall>,
}

/// One completion choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// The generated message
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    /// Provider finish reason ("stop", "function_call", ...)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response from a function-calling completion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Completion choices; may be empty
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChatCompletion {
    /// A response with no choices at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// A response whose single choice invokes `name` with raw `arguments`
    pub fn with_function_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: Some(ResponseMessage {
                    role: Some("assistant".to_string()),
                    content: None,
                    function_call: Some(FunctionCall {
                        name: name.into(),
                        arguments: arguments.into(),
                    }),
                }),
                finish_reason: Some("function_call".to_string()),
            }],
        }
    }

    /// A response whose single choice is plain prose
    pub fn with_text(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: Some(ResponseMessage {
                    role: Some("assistant".to_string()),
                    content: Some(content.into()),
                    function_call: None,
                }),
                finish_reason: Some("stop".to_string()),
            }],
        }
    }

    /// The function call of the top choice, if any
    pub fn top_function_call(&self) -> Option<&FunctionCall> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.function_call.as_ref())
    }
}
