// crates/querydesk-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The QueryDesk CLI stores user-facing strings in a small translation
//! catalog to keep messaging consistent. All runtime output should be routed
//! through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself to avoid panics.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries loaded into the message bundle.
pub(crate) const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "querydesk {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("input.read_failed", "Failed to read {path}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("history.init_failed", "Failed to initialize query history: {error}"),
    ("source.load_failed", "Failed to load {path}: {error}"),
    ("query.failed", "{error}"),
    ("query.empty", "Nothing to run."),
    ("query.summary", "{rows} rows x {columns} columns in {elapsed} ms"),
    ("query.ok_no_rows", "Statement executed in {elapsed} ms"),
    ("query.serialize_failed", "Failed to serialize result: {error}"),
    ("grid.null", "NULL"),
    ("grid.empty", "Empty set"),
    ("schema.failed", "Failed to read schema: {error}"),
    ("schema.empty", "No tables."),
    ("schema.primary", "PK"),
    ("schema.foreign", "FK"),
    ("history.header", "Query history for {identity}"),
    ("history.empty", "No queries yet."),
    ("history.entry", "{timestamp}  {elapsed} ms  ({rows}, {columns})  {query}"),
    (
        "history.warn.shared",
        "Warning: no user identity was provided, so this history is shared with every \
         anonymous user.",
    ),
    ("history.failed", "Failed to read history: {error}"),
    ("export.none", "No successful query to export yet."),
    ("export.failed", "Failed to export result: {error}"),
    ("export.write_failed", "Failed to write export to {path}: {error}"),
    ("export.ok", "Exported {rows} rows to {path}"),
    ("export.usage", "Usage: .export PATH"),
    ("sample.exists", "Refusing to overwrite {path}; pass --force to replace it."),
    ("sample.write_failed", "Failed to write sample database to {path}: {error}"),
    ("sample.ok", "Sample database written to {path}"),
    ("shell.banner", "Connected to {source}. Enter SQL, or .schema, .history, .export PATH, .quit."),
    ("shell.hint", "Example: {query}"),
    ("shell.prompt", "querydesk> "),
    ("shell.unknown_command", "Unknown command: {command}"),
    ("shell.read_failed", "Failed to read input: {error}"),
];

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the English catalog while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

/// Returns the static English catalog used by the CLI.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
