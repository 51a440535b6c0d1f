//! Error types for modelprobe
//!
//! Application-level errors cover configuration loading and credential
//! resolution. Failures while probing individual candidates are never
//! surfaced here - the probe converts them into outcome data instead.

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error(
        "API key not found: environment variable {variable} is unset or empty. \
        Export it before running (the key is never read from the config file)."
    )]
    MissingApiKey { variable: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
