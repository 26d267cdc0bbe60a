// crates/querydesk-session/src/audit.rs
// ============================================================================
// Module: Session Audit Logging
// Description: Structured audit events for session activity.
// Purpose: Emit redacted JSON-lines audit logs without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Sessions report source loads, query executions, and history writes as
//! JSON lines. Query text is omitted unless the host opts in; the
//! `redaction` field records which mode produced the event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Redaction label when query text is withheld.
pub const REDACTED: &str = "redacted";
/// Redaction label when query text is included.
pub const PLAINTEXT: &str = "plaintext";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Source lifecycle audit event (`source_loaded`, `source_load_failed`).
#[derive(Debug, Clone, Serialize)]
pub struct SourceAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// History ledger identity label.
    pub ledger: String,
    /// Uploaded file name.
    pub source: String,
    /// Load route when one was selected.
    pub source_kind: Option<&'static str>,
    /// Upload size in bytes.
    pub bytes: usize,
    /// True when the load replaced an active source.
    pub replaced: bool,
    /// Failure category label.
    pub error_kind: Option<&'static str>,
    /// Failure message.
    pub error: Option<String>,
}

/// Query execution audit event (`query_executed`, `query_failed`).
#[derive(Debug, Clone, Serialize)]
pub struct QueryAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// History ledger identity label.
    pub ledger: String,
    /// Active source file name.
    pub source: String,
    /// Engine time in milliseconds on success.
    pub elapsed_ms: Option<u64>,
    /// Result row count on success.
    pub rows: Option<usize>,
    /// Result column count on success.
    pub columns: Option<usize>,
    /// Engine message on failure.
    pub error: Option<String>,
    /// Query text (explicit opt-in only).
    pub query: Option<String>,
    /// Redaction classification for query text.
    pub redaction: &'static str,
}

/// History write audit event (`history_recorded`).
#[derive(Debug, Clone, Serialize)]
pub struct HistoryAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// History ledger identity label.
    pub ledger: String,
    /// True for the shared anonymous ledger.
    pub shared: bool,
    /// What the ledger did with the record.
    pub outcome: &'static str,
    /// Ledger capacity.
    pub capacity: usize,
}

/// Inputs required to construct a source audit event.
pub struct SourceAuditEventParams {
    /// History ledger identity label.
    pub ledger: String,
    /// Uploaded file name.
    pub source: String,
    /// Load route when one was selected.
    pub source_kind: Option<&'static str>,
    /// Upload size in bytes.
    pub bytes: usize,
    /// True when the load replaced an active source.
    pub replaced: bool,
    /// Failure category label.
    pub error_kind: Option<&'static str>,
    /// Failure message.
    pub error: Option<String>,
}

/// Inputs required to construct a query audit event.
pub struct QueryAuditEventParams {
    /// History ledger identity label.
    pub ledger: String,
    /// Active source file name.
    pub source: String,
    /// Engine time in milliseconds on success.
    pub elapsed_ms: Option<u64>,
    /// Result row count on success.
    pub rows: Option<usize>,
    /// Result column count on success.
    pub columns: Option<usize>,
    /// Engine message on failure.
    pub error: Option<String>,
    /// Query text; dropped unless `log_query_text` is set.
    pub query: String,
    /// Whether query text may be logged.
    pub log_query_text: bool,
}

impl SourceAuditEvent {
    /// Creates a source event; failures are inferred from `error`.
    #[must_use]
    pub fn new(params: SourceAuditEventParams) -> Self {
        let event = if params.error.is_some() { "source_load_failed" } else { "source_loaded" };
        Self {
            event,
            timestamp_ms: now_ms(),
            ledger: params.ledger,
            source: params.source,
            source_kind: params.source_kind,
            bytes: params.bytes,
            replaced: params.replaced,
            error_kind: params.error_kind,
            error: params.error,
        }
    }
}

impl QueryAuditEvent {
    /// Creates a query event with redaction applied.
    #[must_use]
    pub fn new(params: QueryAuditEventParams) -> Self {
        let event = if params.error.is_some() { "query_failed" } else { "query_executed" };
        let (query, redaction) =
            if params.log_query_text { (Some(params.query), PLAINTEXT) } else { (None, REDACTED) };
        Self {
            event,
            timestamp_ms: now_ms(),
            ledger: params.ledger,
            source: params.source,
            elapsed_ms: params.elapsed_ms,
            rows: params.rows,
            columns: params.columns,
            error: params.error,
            query,
            redaction,
        }
    }
}

impl HistoryAuditEvent {
    /// Creates a history event.
    #[must_use]
    pub fn new(ledger: String, shared: bool, outcome: &'static str, capacity: usize) -> Self {
        Self {
            event: "history_recorded",
            timestamp_ms: now_ms(),
            ledger,
            shared,
            outcome,
            capacity,
        }
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for session events.
pub trait SessionAuditSink: Send + Sync {
    /// Record a source lifecycle event.
    fn record_source(&self, event: &SourceAuditEvent);

    /// Record a query execution event.
    fn record_query(&self, event: &QueryAuditEvent);

    /// Record a history write event.
    fn record_history(&self, _event: &HistoryAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Serializes one event to stderr.
    fn emit<T: Serialize>(event: &T) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

impl SessionAuditSink for StderrAuditSink {
    fn record_source(&self, event: &SourceAuditEvent) {
        Self::emit(event);
    }

    fn record_query(&self, event: &QueryAuditEvent) {
        Self::emit(event);
    }

    fn record_history(&self, event: &HistoryAuditEvent) {
        Self::emit(event);
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one event and flushes.
    fn emit<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl SessionAuditSink for FileAuditSink {
    fn record_source(&self, event: &SourceAuditEvent) {
        self.emit(event);
    }

    fn record_query(&self, event: &QueryAuditEvent) {
        self.emit(event);
    }

    fn record_history(&self, event: &HistoryAuditEvent) {
        self.emit(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl SessionAuditSink for NoopAuditSink {
    fn record_source(&self, _event: &SourceAuditEvent) {}

    fn record_query(&self, _event: &QueryAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
