//! Section validation tests for querydesk-config.
// crates/querydesk-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Validate per-section limits and cross-field rules.
// Purpose: Ensure invalid configuration fails closed with precise messages.
// =============================================================================

use std::path::PathBuf;

use querydesk_config::AuditSinkKind;
use querydesk_config::ConfigError;
use querydesk_config::QueryDeskConfig;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn defaults_are_valid() -> TestResult {
    let config = QueryDeskConfig::default();
    config.validate().map_err(|err| err.to_string())?;
    if config.history.capacity != 50 {
        return Err(format!("unexpected default capacity {}", config.history.capacity));
    }
    if config.session.default_query != "SELECT * FROM table" {
        return Err("unexpected default query".to_string());
    }
    Ok(())
}

#[test]
fn history_capacity_zero_rejected() -> TestResult {
    let mut config = QueryDeskConfig::default();
    config.history.capacity = 0;
    assert_invalid(config.validate(), "history.capacity must be between 1")
}

#[test]
fn history_capacity_upper_bound_enforced() -> TestResult {
    let mut config = QueryDeskConfig::default();
    config.history.capacity = 10_001;
    assert_invalid(config.validate(), "history.capacity")
}

#[test]
fn loader_max_source_bytes_zero_rejected() -> TestResult {
    let mut config = QueryDeskConfig::default();
    config.loader.max_source_bytes = 0;
    assert_invalid(config.validate(), "loader.max_source_bytes")
}

#[test]
fn loader_busy_timeout_bounded() -> TestResult {
    let mut config = QueryDeskConfig::default();
    config.loader.busy_timeout_ms = 60_001;
    assert_invalid(config.validate(), "loader.busy_timeout_ms")
}

#[test]
fn loader_artifact_dir_must_be_non_empty() -> TestResult {
    let mut config = QueryDeskConfig::default();
    config.loader.artifact_dir = Some(PathBuf::from("  "));
    assert_invalid(config.validate(), "loader.artifact_dir must be non-empty")
}

#[test]
fn audit_file_sink_requires_path() -> TestResult {
    let mut config = QueryDeskConfig::default();
    config.audit.sink = AuditSinkKind::File;
    assert_invalid(config.validate(), "audit.path is required")
}

#[test]
fn audit_path_rejected_without_file_sink() -> TestResult {
    let mut config = QueryDeskConfig::default();
    config.audit.sink = AuditSinkKind::Stderr;
    config.audit.path = Some(PathBuf::from("audit.jsonl"));
    assert_invalid(config.validate(), "audit.path is only valid")
}

#[test]
fn session_default_query_length_bounded() -> TestResult {
    let mut config = QueryDeskConfig::default();
    config.session.default_query = "x".repeat(64 * 1024 + 1);
    assert_invalid(config.validate(), "session.default_query exceeds")
}

#[test]
fn key_roles_follow_show_types_when_unset() -> TestResult {
    let config = QueryDeskConfig::from_toml_str("[schema]\nshow_types = false\n")
        .map_err(|err| err.to_string())?;
    let options = config.schema.options();
    if options.include_types || options.include_key_roles {
        return Err("expected both toggles off".to_string());
    }
    Ok(())
}

#[test]
fn key_roles_can_be_set_independently() -> TestResult {
    let config =
        QueryDeskConfig::from_toml_str("[schema]\nshow_types = false\nshow_key_roles = true\n")
            .map_err(|err| err.to_string())?;
    let options = config.schema.options();
    if options.include_types || !options.include_key_roles {
        return Err("expected independent key role toggle".to_string());
    }
    Ok(())
}

#[test]
fn unknown_keys_rejected() -> TestResult {
    match QueryDeskConfig::from_toml_str("[history]\ncapacity = 5\nretention = 3\n") {
        Err(ConfigError::Parse(message)) if message.contains("unknown field") => Ok(()),
        Err(other) => Err(format!("unexpected error: {other}")),
        Ok(_) => Err("expected parse failure".to_string()),
    }
}

#[test]
fn invalid_sink_name_rejected() -> TestResult {
    match QueryDeskConfig::from_toml_str("[audit]\nsink = \"syslog\"\n") {
        Err(ConfigError::Parse(_)) => Ok(()),
        Err(other) => Err(format!("unexpected error: {other}")),
        Ok(_) => Err("expected parse failure".to_string()),
    }
}
