// crates/querydesk-core/src/runtime/mod.rs
// ============================================================================
// Module: QueryDesk Runtime Helpers
// Description: Concrete history storage and result export.
// Purpose: Provide the default in-process implementations used by sessions.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime helpers are the in-process pieces every deployment needs: the
//! identity-keyed history store and the CSV export of a result.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod export;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use export::CsvExport;
pub use export::ExportError;
pub use export::export_csv;
pub use export::export_file_name;
pub use store::InMemoryHistoryStore;
