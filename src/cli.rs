//! Command-line interface for modelprobe
//!
//! Provides argument parsing and subcommand handling for the modelprobe binary.

use clap::{Parser, Subcommand};

/// Capability prober for hosted generative model endpoints
#[derive(Parser)]
#[command(name = "modelprobe")]
#[command(version)]
#[command(about = "Capability prober for hosted generative model endpoints")]
#[command(
    long_about = "Modelprobe calls each candidate model with a test prompt, classifies \
    which ones are usable (quota, not-found, or other failures), checks function-calling \
    support on the first working candidate, and recommends which model identifier to adopt."
)]
pub struct Cli {
    /// Path to configuration file (built-in candidate set is used if absent)
    #[arg(short, long, default_value = "modelprobe.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Modelprobe Configuration
# ========================
#
# This file configures the API endpoint, the candidate probe set, the
# recommendation preference order, and observability settings.
#
# The API key is NEVER stored in this file. It is read from the environment
# variable named by api.key_env at startup.

# ─────────────────────────────────────────────────────────────────────────────
# API ACCESS
# ─────────────────────────────────────────────────────────────────────────────

[api]
# Base URL of the generative-language API
base_url = "https://generativelanguage.googleapis.com/v1beta"

# Environment variable holding the API key
key_env = "GEMINI_API_KEY"

# Per-request timeout in seconds (must be in 1..=300)
request_timeout_seconds = 30

# ─────────────────────────────────────────────────────────────────────────────
# PROBE SET
# ─────────────────────────────────────────────────────────────────────────────

[probe]
# Candidate model identifiers, probed sequentially in this order.
# Duplicates are allowed and probed independently.
candidates = [
    "gemini-2.5-flash",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-2.0-flash-exp",
]

# Prompt sent to every candidate
prompt = "How many workers are currently online?"

# Ranking for the recommendation. The first entry in this list that probed
# successfully wins. Candidates left off this list are probed but never
# recommended.
preference = [
    "gemini-2.5-flash",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
]

# Function declared when probing function-calling support on the first
# working candidate. The parameter schema is an empty object.
[probe.tool]
name = "get_workers"
description = "List workers currently on shift"

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"
"#
}
