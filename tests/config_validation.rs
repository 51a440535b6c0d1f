//! Integration tests for configuration loading and validation
//!
//! Exercises the three-phase load (read, parse, validate) through real
//! files, plus the built-in fallback used when no config file exists.

use modelprobe::config::Config;
use modelprobe::error::AppError;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("modelprobe.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

#[test]
fn test_missing_file_reports_read_error_with_path() {
    let err = Config::from_file("definitely/not/here.toml").expect_err("should fail");

    match err {
        AppError::ConfigFileRead { path, .. } => {
            assert!(path.contains("definitely/not/here.toml"));
        }
        other => panic!("expected ConfigFileRead, got {:?}", other),
    }
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "this is [not toml");

    let err = Config::from_file(&path).expect_err("should fail");
    assert!(matches!(err, AppError::ConfigParseFailed { .. }));
}

#[test]
fn test_empty_candidates_rejected_with_context() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        r#"
        [probe]
        candidates = []
        prompt = "hello"
        "#,
    );

    let err = Config::from_file(&path).expect_err("should fail");
    match err {
        AppError::ConfigValidationFailed { reason, .. } => {
            assert!(reason.contains("candidates"));
        }
        other => panic!("expected ConfigValidationFailed, got {:?}", other),
    }
}

#[test]
fn test_blank_prompt_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        r#"
        [probe]
        candidates = ["model-a"]
        prompt = "   "
        "#,
    );

    let err = Config::from_file(&path).expect_err("should fail");
    assert!(err.to_string().contains("prompt"));
}

#[test]
fn test_out_of_range_timeout_rejected_during_parse() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        r#"
        [api]
        request_timeout_seconds = 0

        [probe]
        candidates = ["model-a"]
        prompt = "hello"
        "#,
    );

    // Bound enforcement happens inside deserialization, so this surfaces as
    // a parse failure, not a validation failure
    let err = Config::from_file(&path).expect_err("should fail");
    assert!(matches!(err, AppError::ConfigParseFailed { .. }));
}

#[test]
fn test_valid_file_loads_with_overrides() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        r#"
        [api]
        base_url = "http://localhost:9000/v1beta"
        key_env = "MY_PROBE_KEY"
        request_timeout_seconds = 10

        [probe]
        candidates = ["local-a", "local-b"]
        prompt = "ping"
        preference = ["local-b"]

        [probe.tool]
        name = "get_status"
        description = "Read system status"

        [observability]
        log_level = "debug"
        "#,
    );

    let config = Config::from_file(&path).expect("should load");

    assert_eq!(config.api.base_url, "http://localhost:9000/v1beta");
    assert_eq!(config.api.key_env, "MY_PROBE_KEY");
    assert_eq!(config.api.request_timeout_seconds.seconds(), 10);
    assert_eq!(config.probe.candidates, vec!["local-a", "local-b"]);
    assert_eq!(config.probe.preference, vec!["local-b"]);
    assert_eq!(config.probe.tool.name, "get_status");
    assert_eq!(config.observability.log_level, "debug");
}

#[test]
fn test_load_or_builtin_falls_back_when_file_absent() {
    let dir = TempDir::new().expect("temp dir");
    let absent = dir.path().join("nope.toml");

    let config = Config::load_or_builtin(&absent).expect("should fall back");

    assert_eq!(config.probe.candidates, Config::builtin().probe.candidates);
}

#[test]
fn test_load_or_builtin_still_rejects_broken_file() {
    // A file that exists but is invalid must fail loudly, not silently fall
    // back to the built-in set
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "candidates = 5");

    let err = Config::load_or_builtin(&path).expect_err("should fail");
    assert!(matches!(err, AppError::ConfigParseFailed { .. }));
}
