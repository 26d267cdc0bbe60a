// crates/querydesk-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the CLI.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for QueryDesk configuration. The output is static and
//! must always parse and validate.

/// Returns a canonical example `querydesk.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[history]
capacity = 50

[loader]
# artifact_dir = "/var/tmp/querydesk"
max_source_bytes = 536870912
busy_timeout_ms = 5000

[schema]
show_types = true
# show_key_roles = true

[audit]
sink = "file"
path = "querydesk-audit.jsonl"
log_query_text = false

[session]
default_query = "SELECT * FROM table"
"#,
    )
}
