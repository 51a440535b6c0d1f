//! Capability probing for candidate model identifiers
//!
//! Probes each candidate through an injected [`RemoteClient`], converts every
//! failure into outcome data (nothing escapes the probe boundary), optionally
//! checks function-calling support on one candidate, and ranks usable
//! candidates by a caller-supplied preference order.
//!
//! Printing and process exit codes are the CLI's concern - this module only
//! emits tracing events.

use crate::client::{ClientError, RemoteClient, ToolDeclaration};
use std::sync::Arc;
use uuid::Uuid;

/// Maximum snippet length captured from a successful response, in characters
///
/// Truncation counts characters, not bytes, so multi-byte text never gets cut
/// mid-codepoint.
pub const SNIPPET_CHARS: usize = 100;

/// Classified outcome of probing one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The candidate answered; carries a truncated snippet of the response text
    Success { snippet: String },
    /// The API rejected the call for quota/rate reasons (HTTP 429 equivalent)
    QuotaExceeded { message: String },
    /// The candidate identifier does not exist on this API (HTTP 404 equivalent)
    NotFound { message: String },
    /// Any other failure, with the underlying message preserved for diagnostics
    Other { message: String },
}

impl Outcome {
    /// Whether this outcome counts as a usable candidate
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Short category label for report rendering
    pub fn category(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "pass",
            Outcome::QuotaExceeded { .. } => "quota-exceeded",
            Outcome::NotFound { .. } => "not-found",
            Outcome::Other { .. } => "error",
        }
    }
}

/// Result of probing one candidate
///
/// `probe_all` yields exactly one of these per input candidate, in input
/// order. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub candidate: String,
    pub outcome: Outcome,
}

impl ProbeResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Result of the function-calling probe
///
/// Computed for at most one candidate per run. A failed probe is still a
/// result: `did_invoke_tool` is false and `error` carries the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallResult {
    pub candidate: String,
    pub did_invoke_tool: bool,
    /// Name of the function the model selected, when it invoked one
    pub tool_name: Option<String>,
    /// Truncated text answer, when the model answered with text instead
    pub text_fallback: Option<String>,
    /// Client error message, when the probe call itself failed
    pub error: Option<String>,
}

/// Map a client error onto the closed outcome taxonomy
///
/// Structured HTTP status codes are checked first (429 and 404 never depend
/// on message wording). Unstructured failures fall back to case-insensitive
/// substring matching, the same signals the vendor embeds in its messages.
pub fn classify_error(error: &ClientError) -> Outcome {
    let message = error.to_string();

    match error.status() {
        Some(429) => return Outcome::QuotaExceeded { message },
        Some(404) => return Outcome::NotFound { message },
        _ => {}
    }

    let lower = message.to_lowercase();
    if lower.contains("quota") || lower.contains("429") {
        Outcome::QuotaExceeded { message }
    } else if lower.contains("not found") || lower.contains("404") {
        Outcome::NotFound { message }
    } else {
        Outcome::Other { message }
    }
}

/// Truncate response text to the snippet bound, on a character boundary
pub fn truncate_snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

/// Pick the first preferred candidate that probed successfully
///
/// The preference list is the ranking: a successful candidate absent from it
/// is ineligible, and input order is never used as a fallback. Returns `None`
/// when no preferred candidate succeeded, even if unlisted ones did.
pub fn recommend<'a>(results: &[ProbeResult], preference: &'a [String]) -> Option<&'a str> {
    preference
        .iter()
        .find(|preferred| {
            results
                .iter()
                .any(|r| r.candidate == **preferred && r.is_success())
        })
        .map(String::as_str)
}

/// Probes candidates through an injected client
///
/// Holds no state between runs beyond a run identifier used to correlate
/// log lines across the sequential probe calls.
pub struct CapabilityProbe {
    client: Arc<dyn RemoteClient>,
    run_id: Uuid,
}

impl CapabilityProbe {
    /// Create a probe over the given client
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self {
            client,
            run_id: Uuid::new_v4(),
        }
    }

    /// The identifier attached to this probe's log events
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Probe every candidate with a plain generation call
    ///
    /// Candidates are probed sequentially in input order, and the returned
    /// sequence maps 1:1 onto the input - duplicates are probed
    /// independently. Client failures are classified into outcomes, never
    /// propagated.
    pub async fn probe_all(&self, candidates: &[String], prompt: &str) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.iter().enumerate() {
            tracing::info!(
                run_id = %self.run_id,
                candidate = %candidate,
                index = index,
                total = candidates.len(),
                "Probing candidate"
            );

            let outcome = match self.client.generate(candidate, prompt).await {
                Ok(response) => {
                    let snippet = truncate_snippet(response.text().unwrap_or_default());
                    tracing::info!(
                        run_id = %self.run_id,
                        candidate = %candidate,
                        snippet_chars = snippet.chars().count(),
                        "Candidate responded"
                    );
                    Outcome::Success { snippet }
                }
                Err(error) => {
                    let outcome = classify_error(&error);
                    tracing::warn!(
                        run_id = %self.run_id,
                        candidate = %candidate,
                        category = outcome.category(),
                        error = %error,
                        "Candidate probe failed"
                    );
                    outcome
                }
            };

            results.push(ProbeResult {
                candidate: candidate.clone(),
                outcome,
            });
        }

        results
    }

    /// Probe function-calling support on a single candidate
    ///
    /// The caller picks the candidate (normally the first success from
    /// `probe_all`). Never raises: a failed call yields a result with the
    /// error message recorded.
    pub async fn probe_tool_call(
        &self,
        candidate: &str,
        prompt: &str,
        tool: &ToolDeclaration,
    ) -> ToolCallResult {
        tracing::info!(
            run_id = %self.run_id,
            candidate = %candidate,
            tool = %tool.name,
            "Probing function-calling support"
        );

        match self
            .client
            .generate_with_tools(candidate, prompt, std::slice::from_ref(tool))
            .await
        {
            Ok(response) => {
                if let Some(call) = response.function_call() {
                    tracing::info!(
                        run_id = %self.run_id,
                        candidate = %candidate,
                        tool = %call.name,
                        "Model invoked the declared function"
                    );
                    ToolCallResult {
                        candidate: candidate.to_string(),
                        did_invoke_tool: true,
                        tool_name: Some(call.name.clone()),
                        text_fallback: None,
                        error: None,
                    }
                } else {
                    tracing::info!(
                        run_id = %self.run_id,
                        candidate = %candidate,
                        "Model answered with text instead of invoking the function"
                    );
                    ToolCallResult {
                        candidate: candidate.to_string(),
                        did_invoke_tool: false,
                        tool_name: None,
                        text_fallback: Some(truncate_snippet(
                            response.text().unwrap_or_default(),
                        )),
                        error: None,
                    }
                }
            }
            Err(error) => {
                tracing::warn!(
                    run_id = %self.run_id,
                    candidate = %candidate,
                    error = %error,
                    "Function-calling probe failed"
                );
                ToolCallResult {
                    candidate: candidate.to_string(),
                    did_invoke_tool: false,
                    tool_name: None,
                    text_fallback: None,
                    error: Some(error.to_string()),
                }
            }
        }
    }
}
