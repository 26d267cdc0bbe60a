// crates/querydesk-config/src/config.rs
// ============================================================================
// Module: QueryDesk Configuration
// Description: Configuration loading and validation for QueryDesk.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: querydesk-core, querydesk-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Resolution order is the explicit path, then the `QUERYDESK_CONFIG`
//! environment variable, then `querydesk.toml` in the working directory. Only
//! the last may be absent, in which case defaults apply. Unknown keys are
//! rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use querydesk_core::DEFAULT_HISTORY_CAPACITY;
use querydesk_core::SchemaOptions;
use querydesk_sqlite::DEFAULT_BUSY_TIMEOUT_MS;
use querydesk_sqlite::DEFAULT_MAX_SOURCE_BYTES;
use querydesk_sqlite::LoaderOptions;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "querydesk.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "QUERYDESK_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum records per history ledger.
pub(crate) const MAX_HISTORY_CAPACITY: usize = 10_000;
/// Upper bound for the upload size limit.
pub(crate) const MAX_SOURCE_BYTES_LIMIT: usize = 2 * 1024 * 1024 * 1024;
/// Upper bound for the engine busy timeout in milliseconds.
pub(crate) const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;
/// Maximum length of the initial query text.
pub(crate) const MAX_DEFAULT_QUERY_LENGTH: usize = 64 * 1024;
/// Initial query text shown in a new session.
const DEFAULT_QUERY: &str = "SELECT * FROM table";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// QueryDesk configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryDeskConfig {
    /// Query history configuration.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Upload loader configuration.
    #[serde(default)]
    pub loader: LoaderConfig,
    /// Schema browser defaults.
    #[serde(default)]
    pub schema: SchemaConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Session defaults.
    #[serde(default)]
    pub session: SessionConfig,
}

impl QueryDeskConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, required) = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = match fs::read(&resolved) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound && !required => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(err) => {
                return Err(ConfigError::Io(format!("{}: {err}", resolved.display())));
            }
        };
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.history.validate()?;
        self.loader.validate()?;
        self.audit.validate()?;
        self.session.validate()?;
        Ok(())
    }
}

/// Query history configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum records kept per identity.
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

impl HistoryConfig {
    /// Validates history limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 || self.capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "history.capacity must be between 1 and {MAX_HISTORY_CAPACITY}"
            )));
        }
        Ok(())
    }
}

/// Upload loader configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Directory for materialized uploads (OS temp dir when unset).
    #[serde(default)]
    pub artifact_dir: Option<PathBuf>,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,
    /// Engine busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            artifact_dir: None,
            max_source_bytes: default_max_source_bytes(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl LoaderConfig {
    /// Validates loader limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_source_bytes == 0 || self.max_source_bytes > MAX_SOURCE_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "loader.max_source_bytes must be between 1 and {MAX_SOURCE_BYTES_LIMIT}"
            )));
        }
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "loader.busy_timeout_ms must be at most {MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        if let Some(dir) = &self.artifact_dir {
            validate_path_string("loader.artifact_dir", &dir.to_string_lossy())?;
        }
        Ok(())
    }

    /// Converts the section into engine loader options.
    #[must_use]
    pub fn to_options(&self) -> LoaderOptions {
        LoaderOptions {
            artifact_dir: self.artifact_dir.clone(),
            max_source_bytes: self.max_source_bytes,
            busy_timeout_ms: self.busy_timeout_ms,
        }
    }
}

/// Schema browser defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Show declared column types.
    #[serde(default = "default_true")]
    pub show_types: bool,
    /// Show key roles; follows `show_types` when unset.
    #[serde(default)]
    pub show_key_roles: Option<bool>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            show_types: true,
            show_key_roles: None,
        }
    }
}

impl SchemaConfig {
    /// Returns the effective introspection options.
    #[must_use]
    pub fn options(&self) -> SchemaOptions {
        SchemaOptions {
            include_types: self.show_types,
            include_key_roles: self.show_key_roles.unwrap_or(self.show_types),
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path (required for the file sink).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Include raw query text in audit events (explicit opt-in).
    #[serde(default)]
    pub log_query_text: bool,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required when audit.sink = \"file\"".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid when audit.sink = \"file\"".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

/// Session defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Query text prefilled in a new session.
    #[serde(default = "default_query")]
    pub default_query: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_query: default_query(),
        }
    }
}

impl SessionConfig {
    /// Validates session defaults.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_query.len() > MAX_DEFAULT_QUERY_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "session.default_query exceeds {MAX_DEFAULT_QUERY_LENGTH} bytes"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default history capacity.
const fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

/// Default upload size limit.
const fn default_max_source_bytes() -> usize {
    DEFAULT_MAX_SOURCE_BYTES
}

/// Default busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Serde helper for `true` defaults.
const fn default_true() -> bool {
    true
}

/// Default initial query text.
fn default_query() -> String {
    DEFAULT_QUERY.to_string()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path and whether it must exist.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
