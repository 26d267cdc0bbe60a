// crates/querydesk-cli/src/lib.rs
// ============================================================================
// Module: QueryDesk CLI Library
// Description: Shared helpers for the QueryDesk command-line interface.
// Purpose: Provide reusable components (i18n, renderers) for the binary and tests.
// Dependencies: querydesk-core, querydesk-session, serde_json
// ============================================================================

//! ## Overview
//! This library module houses shared CLI utilities: the message catalog and
//! the pure renderers for results, schemas, and history. The binary entry
//! point (`src/main.rs`) imports these helpers to keep output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Text and JSON renderers.
pub mod render;

#[cfg(test)]
mod tests;
