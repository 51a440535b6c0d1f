//! Gemini-style generative-language API client
//!
//! Implements [`RemoteClient`](super::RemoteClient) over the REST surface
//! `POST {base_url}/models/{model}:generateContent`. The API key travels in
//! the `x-goog-api-key` header, never in the URL, so request-line logs can't
//! leak it.

use super::{ClientError, GenerationResponse, RemoteClient, ToolDeclaration};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client for a generativelanguage-compatible API
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_seconds: u64,
}

impl GeminiClient {
    /// Create a new client with a bounded per-request timeout
    ///
    /// The timeout applies to the whole request (connect + response body).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_seconds: u64,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout_seconds,
        })
    }

    /// Full generateContent URL for a model identifier
    pub fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    async fn send(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerationResponse, ClientError> {
        let url = self.generate_url(model);

        tracing::debug!(
            model = %model,
            url = %url,
            tools = body.tools.is_some(),
            "Sending generateContent request"
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout {
                        model: model.to_string(),
                        timeout_seconds: self.timeout_seconds,
                    }
                } else {
                    ClientError::Transport {
                        model: model.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::extract_error_message(response).await;
            tracing::debug!(
                model = %model,
                status = status.as_u16(),
                message = %message,
                "generateContent request failed"
            );
            return Err(ClientError::Api {
                model: model.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout {
                    model: model.to_string(),
                    timeout_seconds: self.timeout_seconds,
                }
            } else {
                ClientError::InvalidResponse {
                    model: model.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        body.into_generation_response(model)
    }

    /// Pull the human-readable message out of an API error body
    ///
    /// Error bodies look like `{"error": {"code": 429, "message": "...", "status": "..."}}`.
    /// Falls back to the raw body text when the shape doesn't match.
    async fn extract_error_message(response: reqwest::Response) -> String {
        let raw = match response.text().await {
            Ok(text) => text,
            Err(e) => return format!("(failed to read error body: {})", e),
        };

        match serde_json::from_str::<ApiErrorEnvelope>(&raw) {
            Ok(envelope) => envelope.error.message,
            Err(_) => raw,
        }
    }
}

#[async_trait]
impl RemoteClient for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GenerationResponse, ClientError> {
        let body = GenerateContentRequest::from_prompt(prompt);
        self.send(model, &body).await
    }

    async fn generate_with_tools(
        &self,
        model: &str,
        prompt: &str,
        tools: &[ToolDeclaration],
    ) -> Result<GenerationResponse, ClientError> {
        let body = GenerateContentRequest::from_prompt(prompt).with_tools(tools);
        self.send(model, &body).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireToolGroup>>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![WireContent {
                parts: vec![WirePart {
                    text: Some(prompt.to_string()),
                    function_call: None,
                }],
            }],
            tools: None,
        }
    }

    fn with_tools(mut self, tools: &[ToolDeclaration]) -> Self {
        self.tools = Some(vec![WireToolGroup {
            function_declarations: tools.to_vec(),
        }]);
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireToolGroup {
    function_declarations: Vec<ToolDeclaration>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<WireFunctionCall>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireContent>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

impl GenerateContentResponse {
    /// Flatten the first candidate into a GenerationResponse
    ///
    /// A function-call part takes precedence over text parts. Text parts are
    /// concatenated in order, matching how the API splits long answers.
    fn into_generation_response(
        self,
        model: &str,
    ) -> Result<GenerationResponse, ClientError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::InvalidResponse {
                model: model.to_string(),
                message: "response contained no candidates".to_string(),
            })?;

        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

        for part in &parts {
            if let Some(call) = &part.function_call {
                return Ok(GenerationResponse::from_function_call(
                    call.name.clone(),
                    call.args.clone(),
                ));
            }
        }

        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            return Err(ClientError::InvalidResponse {
                model: model.to_string(),
                message: "candidate contained neither text nor a function call".to_string(),
            });
        }

        Ok(GenerationResponse::from_text(text))
    }
}
