// crates/querydesk-sqlite/src/executor.rs
// ============================================================================
// Module: SQLite Query Executor
// Description: Runs one ad-hoc query against a live handle.
// Purpose: Time the engine call and normalize its output into a QueryResult.
// Dependencies: querydesk-core, rusqlite
// ============================================================================

//! ## Overview
//! Blank submissions never reach the engine; text made only of whitespace,
//! comments, and statement separators counts as blank. Anything else is prepared,
//! stepped to completion, and fully materialized; elapsed time covers exactly
//! that span and excludes waiting for the handle lock. Engine errors are
//! forwarded as [`ExecError::EngineFailure`] without further classification,
//! and the handle remains usable afterwards.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use querydesk_core::CellValue;
use querydesk_core::ExecError;
use querydesk_core::Execution;
use querydesk_core::QueryResult;
use rusqlite::Connection;
use rusqlite::types::ValueRef;

use crate::handle::DatabaseHandle;

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Query execution over a [`DatabaseHandle`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryExecutor;

impl QueryExecutor {
    /// Executes `query`; blank or comment-only text yields `Ok(None)`.
    ///
    /// Statements without result columns (DDL, DML) succeed with an empty
    /// result. More than one statement per submission is rejected by the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::EngineFailure`] with the engine's message.
    pub fn execute(handle: &DatabaseHandle, query: &str) -> Result<Option<Execution>, ExecError> {
        if !has_statement(query) {
            return Ok(None);
        }
        let connection = handle.connection().map_err(ExecError::EngineFailure)?;
        let started = Instant::now();
        let result = run_query(&connection, query)
            .map_err(|err| ExecError::EngineFailure(err.to_string()))?;
        let elapsed = started.elapsed();
        Ok(Some(Execution {
            result,
            elapsed,
        }))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when `query` holds anything besides whitespace, SQL
/// comments, and `;` separators.
fn has_statement(query: &str) -> bool {
    let mut rest = query;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
        if let Some(line) = rest.strip_prefix("--") {
            rest = line.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(block) = rest.strip_prefix("/*") {
            rest = block.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            return !rest.is_empty();
        }
    }
}

/// Prepares, steps, and materializes a single statement.
fn run_query(connection: &Connection, query: &str) -> rusqlite::Result<QueryResult> {
    let mut statement = connection.prepare(query)?;
    let columns: Vec<String> =
        statement.column_names().into_iter().map(str::to_string).collect();
    let width = columns.len();
    let mut rows = statement.query([])?;
    let mut collected = Vec::new();
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for index in 0 .. width {
            cells.push(cell_value(row.get_ref(index)?));
        }
        collected.push(cells);
    }
    Ok(QueryResult::new(columns, collected))
}

/// Copies an engine value out of the row buffer.
fn cell_value(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(value) => CellValue::Integer(value),
        ValueRef::Real(value) => CellValue::Real(value),
        ValueRef::Text(bytes) => CellValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => CellValue::Blob(bytes.to_vec()),
    }
}
