//! Human-readable rendering of a probe run
//!
//! The probe itself only produces data; everything printed to the operator
//! is assembled here and written out by the CLI.

use crate::probe::{Outcome, ProbeResult, ToolCallResult};
use std::fmt::Write;

/// Everything one probe run produced
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub results: Vec<ProbeResult>,
    pub tool_call: Option<ToolCallResult>,
    pub recommendation: Option<String>,
}

impl ProbeReport {
    /// Whether at least one candidate probed successfully
    ///
    /// This, not the presence of a recommendation, decides the process exit
    /// code.
    pub fn any_success(&self) -> bool {
        self.results.iter().any(|r| r.is_success())
    }

    /// Render the full report: summary table, tool-call section,
    /// recommendation
    ///
    /// `base_url` is used to print the ready-to-paste generateContent URL for
    /// the recommended model.
    pub fn render(&self, base_url: &str) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "PROBE SUMMARY");
        let _ = writeln!(out, "{}", "-".repeat(60));
        for result in &self.results {
            let _ = writeln!(out, "{}", render_result_line(result));
        }

        if let Some(tool_call) = &self.tool_call {
            let _ = writeln!(out);
            let _ = writeln!(out, "FUNCTION CALLING ({})", tool_call.candidate);
            let _ = writeln!(out, "{}", "-".repeat(60));
            if tool_call.did_invoke_tool {
                let _ = writeln!(
                    out,
                    "model invoked function: {}",
                    tool_call.tool_name.as_deref().unwrap_or("(unnamed)")
                );
            } else if let Some(error) = &tool_call.error {
                let _ = writeln!(out, "probe failed: {}", error);
            } else {
                let _ = writeln!(
                    out,
                    "model answered with text instead: {}",
                    tool_call.text_fallback.as_deref().unwrap_or("")
                );
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "RECOMMENDATION");
        let _ = writeln!(out, "{}", "-".repeat(60));
        match &self.recommendation {
            Some(model) => {
                let _ = writeln!(out, "use model: {}", model);
                let _ = writeln!(
                    out,
                    "deployment URL: {}/models/{}:generateContent",
                    base_url.trim_end_matches('/'),
                    model
                );
            }
            None if self.any_success() => {
                let _ = writeln!(
                    out,
                    "no preferred candidate succeeded - a candidate outside the \
                    preference list responded, update the preference list to use it"
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "no working candidate found - check the API key and quota"
                );
            }
        }

        out
    }
}

/// One summary-table line for a probed candidate
fn render_result_line(result: &ProbeResult) -> String {
    match &result.outcome {
        Outcome::Success { snippet } => {
            format!("{:<30} PASS  {}", result.candidate, snippet)
        }
        outcome => format!(
            "{:<30} FAIL  ({})",
            result.candidate,
            outcome.category()
        ),
    }
}
