// crates/querydesk-sqlite/src/handle.rs
// ============================================================================
// Module: SQLite Database Handle
// Description: Exclusively owned connection to one loaded database.
// Purpose: Make a single SQLite connection safe to use from any caller thread.
// Dependencies: rusqlite, tempfile
// ============================================================================

//! ## Overview
//! A [`DatabaseHandle`] wraps one `rusqlite` connection behind a mutex so the
//! hosting layer may call into it from whichever worker thread it happens to
//! run on. Simultaneous queries are serialized rather than run in parallel.
//!
//! When the handle backs a materialized upload, it also owns the temporary
//! artifact. Dropping the handle closes the connection first and then deletes
//! the file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Mutex;
use std::sync::MutexGuard;

use querydesk_core::SourceKind;
use rusqlite::Connection;
use tempfile::TempPath;

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Live connection to one loaded database.
///
/// # Invariants
/// - `connection` is declared before `artifact` so it closes first on drop.
#[derive(Debug)]
pub struct DatabaseHandle {
    /// Connection guarded for cross-thread use.
    connection: Mutex<Connection>,
    /// How the database was built.
    kind: SourceKind,
    /// Temporary file backing a binary upload; removed on drop.
    artifact: Option<TempPath>,
}

impl DatabaseHandle {
    /// Wraps an open connection.
    pub(crate) fn new(
        connection: Connection,
        kind: SourceKind,
        artifact: Option<TempPath>,
    ) -> Self {
        Self {
            connection: Mutex::new(connection),
            kind,
            artifact,
        }
    }

    /// Returns how the database was built.
    #[must_use]
    pub const fn source_kind(&self) -> SourceKind {
        self.kind
    }

    /// Returns the temporary artifact path for binary uploads.
    #[must_use]
    pub fn artifact_path(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    /// Locks the connection for exclusive use.
    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>, String> {
        self.connection.lock().map_err(|_| "database handle mutex poisoned".to_string())
    }
}
