// crates/querydesk-core/src/lib.rs
// ============================================================================
// Module: QueryDesk Core Library
// Description: Public API surface for the QueryDesk core.
// Purpose: Expose session data types, engine interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! QueryDesk core holds everything about an ad-hoc query session that does not
//! depend on a particular embedded SQL engine: the schema and result data
//! model, duplicate column disambiguation, the bounded per-identity query
//! history, and CSV export of results. Engine bindings plug in through the
//! [`QueryEngine`] interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ExecError;
pub use interfaces::HistoryError;
pub use interfaces::HistoryStore;
pub use interfaces::LoadError;
pub use interfaces::LoadErrorKind;
pub use interfaces::QueryEngine;
pub use interfaces::SchemaError;
pub use runtime::CsvExport;
pub use runtime::ExportError;
pub use runtime::InMemoryHistoryStore;
pub use runtime::export_csv;
pub use runtime::export_file_name;
