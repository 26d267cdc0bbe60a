// crates/querydesk-sqlite/src/lib.rs
// ============================================================================
// Module: QueryDesk SQLite Engine
// Description: QueryEngine backend using embedded SQLite.
// Purpose: Load uploads, describe schemas, and run ad-hoc SQL in-process.
// Dependencies: querydesk-core, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! This crate binds the QueryDesk session model to `SQLite` through
//! `rusqlite`. Binary uploads are materialized into a scoped temporary file
//! that is removed when its [`DatabaseHandle`] drops; SQL scripts are
//! executed into a fresh in-memory database. Handles are shareable across
//! threads and serialize access internally.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod engine;
pub mod executor;
pub mod handle;
pub mod introspect;
pub mod loader;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::SqliteEngine;
pub use executor::QueryExecutor;
pub use handle::DatabaseHandle;
pub use introspect::SchemaIntrospector;
pub use loader::DEFAULT_BUSY_TIMEOUT_MS;
pub use loader::DEFAULT_MAX_SOURCE_BYTES;
pub use loader::LoaderOptions;
pub use loader::SourceLoader;
