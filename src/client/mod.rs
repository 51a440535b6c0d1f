//! Remote client abstraction for generative-language APIs
//!
//! The probe never talks to the network directly. It goes through the
//! [`RemoteClient`] trait so tests can inject stub clients that fail in
//! controlled ways, and so the vendor protocol stays confined to one module.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A function the remote model may choose to invoke instead of answering
/// with free text.
///
/// The parameter schema is an opaque JSON Schema object passed through to
/// the vendor API unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    #[serde(default = "empty_object_schema")]
    pub parameters: serde_json::Value,
}

impl ToolDeclaration {
    /// Create a declaration with an empty object parameter schema
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: empty_object_schema(),
        }
    }
}

fn empty_object_schema() -> serde_json::Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

/// A structured function-call selected by the remote model
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: serde_json::Value,
}

/// Response from a generation call
///
/// Carries the text payload (if any) and, for tool-enabled calls, the
/// function-call the model selected (if any). Both may be absent when the
/// model returns an empty candidate.
#[derive(Debug, Clone, Default)]
pub struct GenerationResponse {
    text: Option<String>,
    function_call: Option<FunctionCall>,
}

impl GenerationResponse {
    /// Build a text-only response
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            function_call: None,
        }
    }

    /// Build a response carrying a function-call
    pub fn from_function_call(name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            text: None,
            function_call: Some(FunctionCall {
                name: name.into(),
                args,
            }),
        }
    }

    /// The text payload, if the model answered with text
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The function-call the model selected, if any
    pub fn function_call(&self) -> Option<&FunctionCall> {
        self.function_call.as_ref()
    }
}

/// Errors from a remote generation call
///
/// Structured status codes are preserved so callers can classify failures
/// without matching on message text. Transport-level failures carry only the
/// underlying error message.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with a non-success HTTP status
    #[error("API returned HTTP {status} for {model}: {message}")]
    Api {
        model: String,
        status: u16,
        message: String,
    },

    /// The request did not complete within the configured timeout
    #[error("Request to {model} timed out after {timeout_seconds}s")]
    Timeout { model: String, timeout_seconds: u64 },

    /// Connection-level failure (DNS, TLS, refused, reset)
    #[error("Transport error for {model}: {message}")]
    Transport { model: String, message: String },

    /// The API answered 2xx but the body did not match the expected shape
    #[error("Unexpected response shape from {model}: {message}")]
    InvalidResponse { model: String, message: String },
}

impl ClientError {
    /// The HTTP status code, when the failure carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client abstraction over a generative-language API
///
/// Implementations must be cheap to share across sequential probe calls.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Plain text generation against one model
    async fn generate(&self, model: &str, prompt: &str)
    -> Result<GenerationResponse, ClientError>;

    /// Generation with caller-supplied tools the model may invoke
    async fn generate_with_tools(
        &self,
        model: &str,
        prompt: &str,
        tools: &[ToolDeclaration],
    ) -> Result<GenerationResponse, ClientError>;
}
