// crates/querydesk-session/src/lib.rs
// ============================================================================
// Module: QueryDesk Session Library
// Description: Session manager tying the engine, history, and audit together.
// Purpose: Expose the per-user query session used by hosts and the CLI.
// Dependencies: querydesk-core, querydesk-sqlite
// ============================================================================

//! ## Overview
//! A [`QuerySession`] owns at most one loaded data source for one user. Each
//! submission flows through the engine, then duplicate column
//! disambiguation, then the user's history ledger. Audit events are emitted
//! through a [`SessionAuditSink`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod sample;
pub mod session;
pub mod upload;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::HistoryAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::QueryAuditEvent;
pub use audit::QueryAuditEventParams;
pub use audit::SessionAuditSink;
pub use audit::SourceAuditEvent;
pub use audit::SourceAuditEventParams;
pub use audit::StderrAuditSink;
pub use sample::SAMPLE_FILE_NAME;
pub use sample::SampleAsset;
pub use sample::sample_asset;
pub use session::QueryOutcome;
pub use session::QuerySession;
pub use session::SessionDeps;
pub use session::SessionError;
pub use session::SqliteSession;
pub use upload::Upload;
