// crates/querydesk-core/src/core/result.rs
// ============================================================================
// Module: Query Results
// Description: Normalized tabular output of a single query execution.
// Purpose: Carry rows, columns, and timing from the engine to the display layer.
// Dependencies: base64, serde
// ============================================================================

//! ## Overview
//! A [`QueryResult`] is fully materialized: row and column counts are derived
//! from the collected data, never from engine estimates. Results live for a
//! single render cycle and are not persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde::Serializer;

use crate::core::columns::deduplicate;
use crate::core::columns::has_duplicates;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Magnitude below which integral reals render with a trailing `.0`.
const INTEGRAL_REAL_LIMIT: f64 = 1e15;

// ============================================================================
// SECTION: Cell Values
// ============================================================================

/// A single result cell, mirroring the embedded engine's storage classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// SQL NULL.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes (serialized as base64).
    #[serde(serialize_with = "serialize_blob")]
    Blob(Vec<u8>),
}

impl CellValue {
    /// Renders the value as display text.
    ///
    /// `NULL` renders empty, integral reals keep a trailing `.0`, and blobs
    /// render as standard base64.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Integer(value) => value.to_string(),
            Self::Real(value) => render_real(*value),
            Self::Text(value) => value.clone(),
            Self::Blob(bytes) => BASE64.encode(bytes),
        }
    }

    /// Returns true for SQL NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Formats a real so integral values stay visibly floating point.
fn render_real(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < INTEGRAL_REAL_LIMIT {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Serializes blob payloads as base64 strings.
fn serialize_blob<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&BASE64.encode(bytes))
}

// ============================================================================
// SECTION: Result Shape
// ============================================================================

/// Row and column counts of a materialized result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
pub struct ResultShape {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
}

impl std::fmt::Display for ResultShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.rows, self.columns)
    }
}

// ============================================================================
// SECTION: Query Result
// ============================================================================

/// Normalized result set in engine order.
///
/// # Invariants
/// - Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueryResult {
    /// Column labels (possibly duplicated before normalization).
    pub columns: Vec<String>,
    /// Rows in the order the engine returned them.
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    /// Creates a result from columns and rows.
    #[must_use]
    pub const fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            columns,
            rows,
        }
    }

    /// Number of materialized rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of result columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the `(rows, columns)` shape.
    #[must_use]
    pub fn shape(&self) -> ResultShape {
        ResultShape {
            rows: self.row_count(),
            columns: self.column_count(),
        }
    }

    /// Returns true when any column label repeats.
    #[must_use]
    pub fn has_duplicate_columns(&self) -> bool {
        has_duplicates(&self.columns)
    }

    /// Relabels repeated columns in place; a no-op when labels are distinct.
    pub fn deduplicate_columns(&mut self) {
        if self.has_duplicate_columns() {
            self.columns = deduplicate(&self.columns);
        }
    }
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// A successful execution: the result plus time spent inside the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Materialized result.
    pub result: QueryResult,
    /// Wall-clock time around the engine call.
    pub elapsed: Duration,
}

impl Execution {
    /// Elapsed time in whole milliseconds (truncated).
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
