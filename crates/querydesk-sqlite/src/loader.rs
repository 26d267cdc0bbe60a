// crates/querydesk-sqlite/src/loader.rs
// ============================================================================
// Module: SQLite Source Loader
// Description: Turns uploaded bytes into a live SQLite handle.
// Purpose: Materialize binary uploads and execute SQL script uploads.
// Dependencies: querydesk-core, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! Two routes exist:
//! - Binary databases are written to a uniquely named temporary file and
//!   opened read-write. A catalog probe runs immediately so a file that
//!   is not a database fails here rather than on the first query.
//! - SQL scripts are decoded as UTF-8 and executed, in textual order, against a
//!   fresh in-memory database. Any failing statement aborts the load and the
//!   partially built database is dropped.
//!
//! Uploads are untrusted input; size is bounded by [`LoaderOptions`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use querydesk_core::LoadError;
use querydesk_core::LoadErrorKind;
use querydesk_core::SourceKind;
use rusqlite::Connection;
use rusqlite::OpenFlags;

use crate::handle::DatabaseHandle;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum upload size accepted by the loader.
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 512 * 1024 * 1024;
/// Default busy timeout (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// File name prefix for materialized uploads.
const ARTIFACT_PREFIX: &str = "querydesk-";
/// File name suffix for materialized uploads.
const ARTIFACT_SUFFIX: &str = ".db";

// ============================================================================
// SECTION: Options
// ============================================================================

/// Loader configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Directory for materialized uploads (OS temp dir when `None`).
    pub artifact_dir: Option<PathBuf>,
    /// Maximum accepted upload size in bytes.
    pub max_source_bytes: usize,
    /// Busy timeout applied to every connection, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            artifact_dir: None,
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Builds [`DatabaseHandle`] values from uploaded bytes.
#[derive(Debug, Clone, Default)]
pub struct SourceLoader {
    /// Loader configuration.
    options: LoaderOptions,
}

impl SourceLoader {
    /// Creates a loader with explicit options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self {
            options,
        }
    }

    /// Returns the loader options.
    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads `bytes` according to `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the upload is too large, cannot be decoded,
    /// fails to execute, cannot be written, or is not a database.
    pub fn load(&self, bytes: &[u8], kind: SourceKind) -> Result<DatabaseHandle, LoadError> {
        if bytes.len() > self.options.max_source_bytes {
            return Err(LoadError::new(
                LoadErrorKind::TooLarge,
                format!(
                    "upload is {} bytes (max {})",
                    bytes.len(),
                    self.options.max_source_bytes
                ),
            ));
        }
        match kind {
            SourceKind::BinaryDb => self.load_binary(bytes),
            SourceKind::SqlScript => self.load_script(bytes),
        }
    }

    /// Materializes a binary upload and opens it.
    fn load_binary(&self, bytes: &[u8]) -> Result<DatabaseHandle, LoadError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(ARTIFACT_PREFIX).suffix(ARTIFACT_SUFFIX);
        let created = match &self.options.artifact_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let mut file = created.map_err(|err| io_failure("create artifact", &err))?;
        file.write_all(bytes).map_err(|err| io_failure("write artifact", &err))?;
        file.as_file().sync_all().map_err(|err| io_failure("sync artifact", &err))?;
        let artifact = file.into_temp_path();

        let connection = open_artifact(&artifact, self.options.busy_timeout_ms)?;
        probe_database(&connection)?;
        Ok(DatabaseHandle::new(connection, SourceKind::BinaryDb, Some(artifact)))
    }

    /// Executes a script upload into a fresh in-memory database.
    fn load_script(&self, bytes: &[u8]) -> Result<DatabaseHandle, LoadError> {
        let script = std::str::from_utf8(bytes).map_err(|err| {
            LoadError::new(LoadErrorKind::DecodeFailure, format!("script is not utf-8: {err}"))
        })?;
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
        let connection = Connection::open_in_memory_with_flags(flags)
            .map_err(|err| LoadError::new(LoadErrorKind::IoFailure, err.to_string()))?;
        apply_busy_timeout(&connection, self.options.busy_timeout_ms)?;
        connection
            .execute_batch(script)
            .map_err(|err| LoadError::new(LoadErrorKind::ScriptExecFailure, err.to_string()))?;
        Ok(DatabaseHandle::new(connection, SourceKind::SqlScript, None))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Opens a materialized artifact for shared read-write use.
fn open_artifact(path: &Path, busy_timeout_ms: u64) -> Result<Connection, LoadError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(path, flags)
        .map_err(|err| LoadError::new(LoadErrorKind::IoFailure, err.to_string()))?;
    apply_busy_timeout(&connection, busy_timeout_ms)?;
    Ok(connection)
}

/// Applies the configured busy timeout.
fn apply_busy_timeout(connection: &Connection, busy_timeout_ms: u64) -> Result<(), LoadError> {
    connection
        .busy_timeout(Duration::from_millis(busy_timeout_ms))
        .map_err(|err| LoadError::new(LoadErrorKind::IoFailure, err.to_string()))
}

/// Reads the schema cookie so non-database uploads fail at load time.
fn probe_database(connection: &Connection) -> Result<(), LoadError> {
    connection
        .query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
        .map(|_| ())
        .map_err(|err| LoadError::new(LoadErrorKind::InvalidDatabase, err.to_string()))
}

/// Builds an I/O load error with context.
fn io_failure(action: &str, error: &std::io::Error) -> LoadError {
    LoadError::new(LoadErrorKind::IoFailure, format!("{action}: {error}"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
