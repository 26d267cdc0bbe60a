// crates/querydesk-core/src/core/mod.rs
// ============================================================================
// Module: QueryDesk Core Types
// Description: Data model for sources, schemas, results, and query history.
// Purpose: Group the engine-agnostic types shared by every QueryDesk crate.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types are plain data. They carry no engine handles and are safe to
//! clone, serialize, and hand to any presentation layer.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod columns;
pub mod history;
pub mod identifiers;
pub mod result;
pub mod schema;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use columns::deduplicate;
pub use columns::has_duplicates;
pub use history::DEFAULT_HISTORY_CAPACITY;
pub use history::HistoryLedger;
pub use history::QueryRecord;
pub use history::RecordOutcome;
pub use identifiers::LedgerKey;
pub use result::CellValue;
pub use result::Execution;
pub use result::QueryResult;
pub use result::ResultShape;
pub use schema::ColumnDescriptor;
pub use schema::KeyRole;
pub use schema::SchemaOptions;
pub use schema::TableDescriptor;
pub use source::SourceKind;
