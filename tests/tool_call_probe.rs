//! Integration tests for the function-calling probe
//!
//! Covers the full cycle the CLI runs: probe every candidate, then probe
//! tool support on the first success only. The tool probe never raises -
//! client failures are folded into the result.

use async_trait::async_trait;
use modelprobe::client::{ClientError, GenerationResponse, RemoteClient, ToolDeclaration};
use modelprobe::probe::CapabilityProbe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Stub where plain generation succeeds for scripted models and the
/// tool-enabled call has its own scripted behavior
struct ToolScriptClient {
    /// Models that answer plain generation calls
    generating: Vec<String>,
    tool_behavior: ToolBehavior,
    tool_calls: AtomicUsize,
}

enum ToolBehavior {
    InvokeFunction(String),
    AnswerWithText(String),
    Fail(u16, String),
}

impl ToolScriptClient {
    fn new(generating: &[&str], tool_behavior: ToolBehavior) -> Self {
        Self {
            generating: generating.iter().map(|s| s.to_string()).collect(),
            tool_behavior,
            tool_calls: AtomicUsize::new(0),
        }
    }

    fn tool_call_count(&self) -> usize {
        self.tool_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteClient for ToolScriptClient {
    async fn generate(
        &self,
        model: &str,
        _prompt: &str,
    ) -> Result<GenerationResponse, ClientError> {
        if self.generating.iter().any(|m| m == model) {
            Ok(GenerationResponse::from_text("twelve workers online"))
        } else {
            Err(ClientError::Api {
                model: model.to_string(),
                status: 429,
                message: "quota exceeded".to_string(),
            })
        }
    }

    async fn generate_with_tools(
        &self,
        model: &str,
        _prompt: &str,
        tools: &[ToolDeclaration],
    ) -> Result<GenerationResponse, ClientError> {
        self.tool_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(tools.len(), 1, "probe declares exactly one tool");

        match &self.tool_behavior {
            ToolBehavior::InvokeFunction(name) => Ok(GenerationResponse::from_function_call(
                name.clone(),
                serde_json::json!({}),
            )),
            ToolBehavior::AnswerWithText(text) => Ok(GenerationResponse::from_text(text.clone())),
            ToolBehavior::Fail(status, message) => Err(ClientError::Api {
                model: model.to_string(),
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

fn workers_tool() -> ToolDeclaration {
    ToolDeclaration::new("get_workers", "List workers currently on shift")
}

#[tokio::test]
async fn test_tool_probe_detects_invoked_function() {
    let client = Arc::new(ToolScriptClient::new(
        &["model-b"],
        ToolBehavior::InvokeFunction("get_workers".to_string()),
    ));
    let probe = CapabilityProbe::new(client);

    let result = probe
        .probe_tool_call("model-b", "how many workers?", &workers_tool())
        .await;

    assert!(result.did_invoke_tool);
    assert_eq!(result.tool_name.as_deref(), Some("get_workers"));
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_tool_probe_text_answer_is_not_an_invocation() {
    let client = Arc::new(ToolScriptClient::new(
        &["model-b"],
        ToolBehavior::AnswerWithText("there are 12 workers on shift".to_string()),
    ));
    let probe = CapabilityProbe::new(client);

    let result = probe
        .probe_tool_call("model-b", "how many workers?", &workers_tool())
        .await;

    assert!(!result.did_invoke_tool);
    assert!(result.tool_name.is_none());
    assert_eq!(
        result.text_fallback.as_deref(),
        Some("there are 12 workers on shift")
    );
}

#[tokio::test]
async fn test_tool_probe_failure_is_recorded_not_raised() {
    let client = Arc::new(ToolScriptClient::new(
        &["model-b"],
        ToolBehavior::Fail(503, "model overloaded".to_string()),
    ));
    let probe = CapabilityProbe::new(client);

    let result = probe
        .probe_tool_call("model-b", "how many workers?", &workers_tool())
        .await;

    assert!(!result.did_invoke_tool);
    assert!(result.tool_name.is_none());
    assert!(result.text_fallback.is_none());
    assert!(
        result
            .error
            .as_deref()
            .is_some_and(|e| e.contains("model overloaded"))
    );
}

#[tokio::test]
async fn test_full_cycle_probes_tool_on_first_success_only() {
    // model-a fails, model-b and model-c succeed; the cycle must run exactly
    // one tool probe, against model-b
    let client = Arc::new(ToolScriptClient::new(
        &["model-b", "model-c"],
        ToolBehavior::InvokeFunction("get_workers".to_string()),
    ));
    let probe = CapabilityProbe::new(client.clone());

    let candidates: Vec<String> = ["model-a", "model-b", "model-c"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let results = probe.probe_all(&candidates, "how many workers?").await;

    let first_success = results
        .iter()
        .find(|r| r.is_success())
        .expect("model-b should succeed");
    assert_eq!(first_success.candidate, "model-b");

    let tool_result = probe
        .probe_tool_call(&first_success.candidate, "how many workers?", &workers_tool())
        .await;

    assert_eq!(tool_result.candidate, "model-b");
    assert_eq!(client.tool_call_count(), 1);
}

#[tokio::test]
async fn test_full_cycle_skips_tool_probe_when_nothing_succeeds() {
    let client = Arc::new(ToolScriptClient::new(
        &[],
        ToolBehavior::InvokeFunction("get_workers".to_string()),
    ));
    let probe = CapabilityProbe::new(client.clone());

    let candidates: Vec<String> = ["model-a", "model-b"].iter().map(|s| s.to_string()).collect();
    let results = probe.probe_all(&candidates, "prompt").await;

    assert!(results.iter().all(|r| !r.is_success()));
    // Caller contract: no success, no tool probe
    assert_eq!(client.tool_call_count(), 0);
}
