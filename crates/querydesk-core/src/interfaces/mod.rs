// crates/querydesk-core/src/interfaces/mod.rs
// ============================================================================
// Module: QueryDesk Interfaces
// Description: Engine-agnostic interfaces for loading, querying, and history.
// Purpose: Define the contract surfaces used by the session layer.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The session layer depends on two seams: a [`QueryEngine`] that turns
//! uploads into live handles and runs SQL against them, and a
//! [`HistoryStore`] that keeps bounded per-identity query ledgers. The error
//! taxonomy is shared by every implementation:
//! - [`LoadError`] aborts session setup; no partial handle is exposed.
//! - [`ExecError`] is non-fatal; the handle stays usable.
//! - [`SchemaError::ContractViolation`] signals a broken metadata assumption
//!   and aborts the introspection call instead of guessing a value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::core::Execution;
use crate::core::LedgerKey;
use crate::core::QueryRecord;
use crate::core::RecordOutcome;
use crate::core::SchemaOptions;
use crate::core::SourceKind;
use crate::core::TableDescriptor;

// ============================================================================
// SECTION: Load Errors
// ============================================================================

/// Classification of source load failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    /// Script bytes were not valid UTF-8.
    DecodeFailure,
    /// A script statement failed; partial state was discarded.
    ScriptExecFailure,
    /// The temporary database artifact could not be written or opened.
    IoFailure,
    /// Binary bytes were not a database the engine can read.
    InvalidDatabase,
    /// Source exceeded the configured size limit.
    TooLarge,
    /// File name did not carry an accepted extension.
    UnsupportedSource,
}

impl LoadErrorKind {
    /// Returns a stable label for the failure kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DecodeFailure => "decode_failure",
            Self::ScriptExecFailure => "script_exec_failure",
            Self::IoFailure => "io_failure",
            Self::InvalidDatabase => "invalid_database",
            Self::TooLarge => "too_large",
            Self::UnsupportedSource => "unsupported_source",
        }
    }
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source load failure. Terminal for the upload; the user must re-upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("source load failed ({kind}): {message}")]
pub struct LoadError {
    /// Failure classification.
    pub kind: LoadErrorKind,
    /// Underlying detail.
    pub message: String,
}

impl LoadError {
    /// Creates a new load error.
    #[must_use]
    pub fn new(kind: LoadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Execution Errors
// ============================================================================

/// Query execution failure.
///
/// Engine errors are forwarded verbatim and not classified further.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The engine rejected or failed the query.
    #[error("query failed: {0}")]
    EngineFailure(String),
}

impl ExecError {
    /// Returns the engine message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::EngineFailure(message) => message,
        }
    }
}

// ============================================================================
// SECTION: Schema Errors
// ============================================================================

/// Schema introspection failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The engine failed while reading catalog metadata.
    #[error("schema introspection failed: {0}")]
    Engine(String),
    /// Catalog metadata carried a value outside its documented domain.
    #[error("schema contract violation on {table}.{column}: key indicator {indicator}")]
    ContractViolation {
        /// Table being described.
        table: String,
        /// Column being described.
        column: String,
        /// Out-of-domain key indicator.
        indicator: i64,
    },
}

// ============================================================================
// SECTION: Query Engine
// ============================================================================

/// Embedded SQL engine capability contract.
///
/// Handles must be usable from any caller thread; implementations serialize
/// access when the engine is not reentrant.
pub trait QueryEngine: Send + Sync {
    /// Live connection to one loaded database.
    type Handle: Send + Sync;

    /// Builds a handle from uploaded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the source cannot be decoded, executed, or stored.
    fn load(&self, bytes: &[u8], kind: SourceKind) -> Result<Self::Handle, LoadError>;

    /// Describes the user tables of a handle. Never cached.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] on engine failure or contract violation.
    fn describe(
        &self,
        handle: &Self::Handle,
        options: SchemaOptions,
    ) -> Result<Vec<TableDescriptor>, SchemaError>;

    /// Executes one query; blank text returns `Ok(None)` without touching the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] when the engine reports a failure.
    fn execute(&self, handle: &Self::Handle, query: &str) -> Result<Option<Execution>, ExecError>;
}

// ============================================================================
// SECTION: History Store
// ============================================================================

/// History store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Ledger capacity must be at least one.
    #[error("history capacity must be greater than zero (got {0})")]
    InvalidCapacity(usize),
    /// A ledger lock was poisoned by a panicking holder.
    #[error("history store lock poisoned: {0}")]
    Poisoned(String),
}

/// Process-wide, identity-keyed store of bounded query ledgers.
pub trait HistoryStore: Send + Sync {
    /// Records an entry in the ledger selected by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when the ledger cannot be accessed.
    fn record(&self, key: &LedgerKey, entry: QueryRecord) -> Result<RecordOutcome, HistoryError>;

    /// Lists the ledger selected by `key`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when the ledger cannot be accessed.
    fn list(&self, key: &LedgerKey) -> Result<Vec<QueryRecord>, HistoryError>;

    /// Lists every identity that has touched the store, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when the store cannot be accessed.
    fn identities(&self) -> Result<Vec<LedgerKey>, HistoryError>;

    /// Per-ledger capacity.
    fn capacity(&self) -> usize;
}
