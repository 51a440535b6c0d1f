//! Configuration management for modelprobe
//!
//! Parses TOML configuration files and provides typed access to settings.
//! When no config file exists, the built-in probe set is used so the tool
//! works out of the box with just an API key in the environment.

use crate::client::ToolDeclaration;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    pub probe: ProbeConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// API access configuration
///
/// The key itself is never stored here. Only the name of the environment
/// variable holding it is configurable, and the variable is read once at
/// startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable the API key is read from
    #[serde(default = "default_key_env")]
    pub key_env: String,
    /// Per-request timeout, validated into (0, 300] at parse time
    #[serde(default)]
    pub request_timeout_seconds: RequestTimeout,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            key_env: default_key_env(),
            request_timeout_seconds: RequestTimeout::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

/// Validated per-request timeout in seconds
///
/// Custom `Deserialize` enforces the (0, 300] bound during TOML parsing, so
/// an out-of-range value is rejected before an invalid instance can exist.
/// The upper bound also rules out extreme values like `u64::MAX` that would
/// overflow duration arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequestTimeout(u64);

impl RequestTimeout {
    /// Create a validated timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero or exceeds 300 seconds.
    pub fn new(seconds: u64) -> AppResult<Self> {
        if seconds == 0 {
            return Err(AppError::Config(
                "api.request_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if seconds > 300 {
            return Err(AppError::Config(format!(
                "api.request_timeout_seconds cannot exceed 300 seconds (5 minutes), got {}",
                seconds
            )));
        }
        Ok(Self(seconds))
    }

    /// The timeout value in seconds
    pub fn seconds(&self) -> u64 {
        self.0
    }
}

impl Default for RequestTimeout {
    fn default() -> Self {
        Self(30)
    }
}

impl<'de> Deserialize<'de> for RequestTimeout {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Probe run configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Candidate model identifiers, probed in listed order
    pub candidates: Vec<String>,
    /// Prompt sent to every candidate
    pub prompt: String,
    /// Ranking list for the recommendation - candidates absent from this
    /// list are never recommended, even when they probe successfully
    #[serde(default)]
    pub preference: Vec<String>,
    /// Function declared for the tool-call probe
    #[serde(default)]
    pub tool: ToolProbeConfig,
}

/// Tool declared when probing function-calling support
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolProbeConfig {
    #[serde(default = "default_tool_name")]
    pub name: String,
    #[serde(default = "default_tool_description")]
    pub description: String,
}

impl Default for ToolProbeConfig {
    fn default() -> Self {
        Self {
            name: default_tool_name(),
            description: default_tool_description(),
        }
    }
}

impl ToolProbeConfig {
    /// Build the wire-level declaration (empty object parameter schema)
    pub fn to_declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new(self.name.clone(), self.description.clone())
    }
}

fn default_tool_name() -> String {
    "get_workers".to_string()
}

fn default_tool_description() -> String {
    "List workers currently on shift".to_string()
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 2: Parse TOML (preserves toml::de::Error context)
        let config: Self =
            toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            })?;

        // Phase 3: Validate parsed config (provides contextual reason)
        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Load from a file if it exists, otherwise fall back to the built-in set
    pub fn load_or_builtin<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::info!(
                path = %path.as_ref().display(),
                "No config file found, using built-in candidate set"
            );
            Ok(Self::builtin())
        }
    }

    /// The built-in probe set used when no config file is present
    ///
    /// The experimental model is deliberately part of the candidate list but
    /// not the preference list: it gets probed, but never recommended.
    pub fn builtin() -> Self {
        Self {
            api: ApiConfig::default(),
            probe: ProbeConfig {
                candidates: vec![
                    "gemini-2.5-flash".to_string(),
                    "gemini-1.5-flash".to_string(),
                    "gemini-1.5-pro".to_string(),
                    "gemini-2.0-flash-exp".to_string(),
                ],
                prompt: "How many workers are currently online?".to_string(),
                preference: vec![
                    "gemini-2.5-flash".to_string(),
                    "gemini-1.5-flash".to_string(),
                    "gemini-1.5-pro".to_string(),
                ],
                tool: ToolProbeConfig::default(),
            },
            observability: ObservabilityConfig::default(),
        }
    }

    /// Validate configuration after parsing
    ///
    /// This is called automatically by `from_file()`, but can also be called
    /// explicitly when constructing Config via other means (e.g., in tests).
    pub fn validate(&self) -> AppResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::Config(
                "api.base_url must not be empty".to_string(),
            ));
        }
        if self.api.key_env.trim().is_empty() {
            return Err(AppError::Config(
                "api.key_env must not be empty".to_string(),
            ));
        }

        if self.probe.candidates.is_empty() {
            return Err(AppError::Config(
                "probe.candidates must not be empty".to_string(),
            ));
        }
        for (index, candidate) in self.probe.candidates.iter().enumerate() {
            if candidate.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "probe.candidates[{}] must not be empty",
                    index
                )));
            }
        }

        if self.probe.prompt.trim().is_empty() {
            return Err(AppError::Config(
                "probe.prompt must not be empty".to_string(),
            ));
        }

        for (index, preferred) in self.probe.preference.iter().enumerate() {
            if preferred.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "probe.preference[{}] must not be empty",
                    index
                )));
            }
        }

        if self.probe.tool.name.trim().is_empty() {
            return Err(AppError::Config(
                "probe.tool.name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the API key from the configured environment variable
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` when the variable is unset or empty. The key
    /// is never read from the config file itself.
    pub fn resolve_api_key(&self) -> AppResult<String> {
        match std::env::var(&self.api.key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AppError::MissingApiKey {
                variable: self.api.key_env.clone(),
            }),
        }
    }
}
