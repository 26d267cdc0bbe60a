// crates/querydesk-session/src/session.rs
// ============================================================================
// Module: Query Session
// Description: Per-user session over one loaded data source.
// Purpose: Drive load, submit, schema, history, and export for a user.
// Dependencies: querydesk-core, querydesk-sqlite, time
// ============================================================================

//! ## Overview
//! A [`QuerySession`] holds exactly one active source handle. Replacing the
//! source loads the new one first and only then drops the old handle, so a
//! failed re-upload leaves the session untouched.
//!
//! Submissions run in order: the engine executes the text, duplicate column
//! labels are disambiguated, and the record is appended to the caller's
//! history ledger. Failed and blank submissions leave history unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use querydesk_core::CsvExport;
use querydesk_core::ExecError;
use querydesk_core::ExportError;
use querydesk_core::HistoryError;
use querydesk_core::HistoryStore;
use querydesk_core::LedgerKey;
use querydesk_core::LoadError;
use querydesk_core::QueryEngine;
use querydesk_core::QueryRecord;
use querydesk_core::QueryResult;
use querydesk_core::RecordOutcome;
use querydesk_core::ResultShape;
use querydesk_core::SchemaError;
use querydesk_core::SchemaOptions;
use querydesk_core::SourceKind;
use querydesk_core::TableDescriptor;
use querydesk_sqlite::SqliteEngine;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::audit::HistoryAuditEvent;
use crate::audit::NoopAuditSink;
use crate::audit::QueryAuditEvent;
use crate::audit::QueryAuditEventParams;
use crate::audit::SessionAuditSink;
use crate::audit::SourceAuditEvent;
use crate::audit::SourceAuditEventParams;
use crate::upload::Upload;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Session operation failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Source could not be loaded.
    #[error("{0}")]
    Load(#[from] LoadError),
    /// Query submission failed.
    #[error("{0}")]
    Exec(#[from] ExecError),
    /// Schema introspection failed.
    #[error("{0}")]
    Schema(#[from] SchemaError),
    /// History ledger failure.
    #[error("{0}")]
    History(#[from] HistoryError),
    /// CSV export failure.
    #[error("{0}")]
    Export(#[from] ExportError),
    /// Execution timestamp could not be formatted.
    #[error("timestamp formatting failed: {0}")]
    Timestamp(String),
}

// ============================================================================
// SECTION: Dependencies
// ============================================================================

/// Shared services a session is built from.
pub struct SessionDeps<E: QueryEngine> {
    /// Embedded SQL engine.
    pub engine: Arc<E>,
    /// Process-wide history ledgers.
    pub history: Arc<dyn HistoryStore>,
    /// Audit event sink.
    pub audit: Arc<dyn SessionAuditSink>,
    /// Include query text in audit events.
    pub log_query_text: bool,
}

impl<E: QueryEngine> SessionDeps<E> {
    /// Creates dependencies with audit disabled.
    #[must_use]
    pub fn new(engine: Arc<E>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            engine,
            history,
            audit: Arc::new(NoopAuditSink),
            log_query_text: false,
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn SessionAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Enables or disables query text in audit events.
    #[must_use]
    pub fn with_query_text_logging(mut self, enabled: bool) -> Self {
        self.log_query_text = enabled;
        self
    }
}

impl<E: QueryEngine> Clone for SessionDeps<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            history: Arc::clone(&self.history),
            audit: Arc::clone(&self.audit),
            log_query_text: self.log_query_text,
        }
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// A successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    /// Result with disambiguated column labels.
    pub result: QueryResult,
    /// Engine time in whole milliseconds.
    pub elapsed_ms: u64,
    /// Result shape.
    pub shape: ResultShape,
    /// Execution time as RFC 3339 UTC.
    pub executed_at: String,
    /// What the history ledger did with the record.
    pub history: RecordOutcome,
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// The loaded source a session queries.
struct ActiveSource<H> {
    /// Uploaded file name.
    file_name: String,
    /// Load route used.
    kind: SourceKind,
    /// Live engine handle.
    handle: H,
}

/// Session over the embedded `SQLite` engine.
pub type SqliteSession = QuerySession<SqliteEngine>;

/// One user's query session.
pub struct QuerySession<E: QueryEngine> {
    /// Shared services.
    deps: SessionDeps<E>,
    /// History ledger this session writes to.
    ledger: LedgerKey,
    /// Active source.
    source: ActiveSource<E::Handle>,
    /// Last successful result, kept for export.
    last_result: Option<QueryResult>,
}

impl<E: QueryEngine> QuerySession<E> {
    /// Loads `upload` and opens a session writing to `ledger`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Load`] when the source cannot be loaded; no
    /// session exists in that case.
    pub fn open(upload: Upload, ledger: LedgerKey, deps: SessionDeps<E>) -> Result<Self, SessionError> {
        let source = load_source(&deps, &ledger, &upload, false)?;
        Ok(Self {
            deps,
            ledger,
            source,
            last_result: None,
        })
    }

    /// Replaces the active source with a new upload.
    ///
    /// The previous handle is released only after the new one loads.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Load`] and keeps the current source on failure.
    pub fn replace_source(&mut self, upload: Upload) -> Result<(), SessionError> {
        let source = load_source(&self.deps, &self.ledger, &upload, true)?;
        self.source = source;
        self.last_result = None;
        Ok(())
    }

    /// Executes one submission. Blank or comment-only text returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Exec`] with the engine's message when the query
    /// fails; history is unchanged and the session stays usable.
    pub fn submit(&mut self, query: &str) -> Result<Option<QueryOutcome>, SessionError> {
        let execution = match self.deps.engine.execute(&self.source.handle, query) {
            Ok(Some(execution)) => execution,
            Ok(None) => return Ok(None),
            Err(err) => {
                self.audit_query(query, None, Some(err.message().to_string()));
                return Err(SessionError::Exec(err));
            }
        };
        let elapsed_ms = execution.elapsed_ms();
        let mut result = execution.result;
        result.deduplicate_columns();
        let shape = result.shape();
        let executed_at = now_rfc3339()?;
        self.audit_query(query, Some((elapsed_ms, shape)), None);

        let record = QueryRecord::new(executed_at.clone(), query, elapsed_ms, shape);
        let history = self.deps.history.record(&self.ledger, record)?;
        self.deps.audit.record_history(&HistoryAuditEvent::new(
            self.ledger.to_string(),
            self.ledger.is_shared(),
            outcome_label(&history),
            self.deps.history.capacity(),
        ));

        self.last_result = Some(result.clone());
        Ok(Some(QueryOutcome {
            result,
            elapsed_ms,
            shape,
            executed_at,
            history,
        }))
    }

    /// Describes the active source's user tables, freshly each call.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Schema`] when introspection fails.
    pub fn schema(&self, options: SchemaOptions) -> Result<Vec<TableDescriptor>, SessionError> {
        Ok(self.deps.engine.describe(&self.source.handle, options)?)
    }

    /// Returns this session's history, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::History`] when the store is unavailable.
    pub fn history(&self) -> Result<Vec<QueryRecord>, SessionError> {
        Ok(self.deps.history.list(&self.ledger)?)
    }

    /// Returns true when history is the shared anonymous ledger.
    #[must_use]
    pub const fn is_shared_history(&self) -> bool {
        self.ledger.is_shared()
    }

    /// Returns the last successful result as a CSV download.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Export`] when serialization fails.
    pub fn export_csv(&self) -> Result<Option<CsvExport>, SessionError> {
        let Some(result) = &self.last_result else {
            return Ok(None);
        };
        Ok(Some(CsvExport::build(&self.source.file_name, result)?))
    }

    /// Returns the ledger key.
    #[must_use]
    pub const fn ledger(&self) -> &LedgerKey {
        &self.ledger
    }

    /// Returns the active source's file name.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source.file_name
    }

    /// Returns the active source's load route.
    #[must_use]
    pub const fn source_kind(&self) -> SourceKind {
        self.source.kind
    }

    /// Returns the live engine handle.
    #[must_use]
    pub const fn handle(&self) -> &E::Handle {
        &self.source.handle
    }

    /// Returns the last successful result.
    #[must_use]
    pub const fn last_result(&self) -> Option<&QueryResult> {
        self.last_result.as_ref()
    }

    /// Emits a query audit event.
    fn audit_query(&self, query: &str, success: Option<(u64, ResultShape)>, error: Option<String>) {
        self.deps.audit.record_query(&QueryAuditEvent::new(QueryAuditEventParams {
            ledger: self.ledger.to_string(),
            source: self.source.file_name.clone(),
            elapsed_ms: success.map(|(elapsed_ms, _)| elapsed_ms),
            rows: success.map(|(_, shape)| shape.rows),
            columns: success.map(|(_, shape)| shape.columns),
            error,
            query: query.to_string(),
            log_query_text: self.deps.log_query_text,
        }));
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Routes and loads an upload, emitting the matching audit event.
fn load_source<E: QueryEngine>(
    deps: &SessionDeps<E>,
    ledger: &LedgerKey,
    upload: &Upload,
    replaced: bool,
) -> Result<ActiveSource<E::Handle>, SessionError> {
    let routed = upload.kind();
    let source_kind = routed.as_ref().ok().map(|kind| kind.as_str());
    let loaded =
        routed.and_then(|kind| deps.engine.load(&upload.bytes, kind).map(|handle| (kind, handle)));
    let (error_kind, error) = match &loaded {
        Ok(_) => (None, None),
        Err(err) => (Some(err.kind.as_str()), Some(err.message.clone())),
    };
    deps.audit.record_source(&SourceAuditEvent::new(SourceAuditEventParams {
        ledger: ledger.to_string(),
        source: upload.file_name.clone(),
        source_kind,
        bytes: upload.bytes.len(),
        replaced,
        error_kind,
        error,
    }));
    let (kind, handle) = loaded?;
    Ok(ActiveSource {
        file_name: upload.file_name.clone(),
        kind,
        handle,
    })
}

/// Current time as RFC 3339 UTC.
fn now_rfc3339() -> Result<String, SessionError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| SessionError::Timestamp(err.to_string()))
}

/// Audit label for a ledger outcome.
const fn outcome_label(outcome: &RecordOutcome) -> &'static str {
    match outcome {
        RecordOutcome::Appended => "appended",
        RecordOutcome::Evicted(_) => "evicted",
        RecordOutcome::SuppressedDuplicate => "suppressed_duplicate",
    }
}
