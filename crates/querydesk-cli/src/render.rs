// crates/querydesk-cli/src/render.rs
// ============================================================================
// Module: CLI Renderers
// Description: Text, JSON, and CSV renderings of session output.
// Purpose: Turn results, schemas, and history into terminal output.
// Dependencies: querydesk-core, querydesk-session, serde_json
// ============================================================================

//! ## Overview
//! Renderers are pure: they build strings and never write. The grid is an
//! aligned text table with a dashed separator under the header. Missing
//! values are shown as `NULL` on screen while exports keep them empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use querydesk_core::CellValue;
use querydesk_core::ColumnDescriptor;
use querydesk_core::KeyRole;
use querydesk_core::QueryRecord;
use querydesk_core::QueryResult;
use querydesk_core::ResultShape;
use querydesk_core::TableDescriptor;
use serde::Serialize;

use crate::t;

// ============================================================================
// SECTION: Grid
// ============================================================================

/// Column separator for the grid.
const SEPARATOR: &str = " | ";

/// Renders a result as an aligned text grid without a trailing newline.
#[must_use]
pub fn render_grid(result: &QueryResult) -> String {
    if result.columns.is_empty() {
        return String::new();
    }
    let cells: Vec<Vec<String>> =
        result.rows.iter().map(|row| row.iter().map(display_cell).collect()).collect();
    let mut widths: Vec<usize> = result.columns.iter().map(|name| name.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(join_padded(result.columns.iter().map(String::as_str), &widths));
    let total: usize = widths.iter().sum::<usize>() + SEPARATOR.len() * (widths.len() - 1);
    lines.push("-".repeat(total));
    if cells.is_empty() {
        lines.push(t!("grid.empty"));
    }
    for row in &cells {
        lines.push(join_padded(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

/// Renders the one-line summary printed after a result.
#[must_use]
pub fn render_summary(shape: ResultShape, elapsed_ms: u64) -> String {
    if shape.columns == 0 {
        return t!("query.ok_no_rows", elapsed = elapsed_ms);
    }
    t!("query.summary", rows = shape.rows, columns = shape.columns, elapsed = elapsed_ms)
}

/// Screen form of a cell.
fn display_cell(value: &CellValue) -> String {
    if value.is_null() { t!("grid.null") } else { value.render() }
}

/// Pads each value to its column width and joins with the separator.
fn join_padded<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> =
        values.zip(widths).map(|(value, width)| format!("{value:width$}")).collect();
    padded.join(SEPARATOR).trim_end().to_string()
}

// ============================================================================
// SECTION: JSON
// ============================================================================

/// JSON document emitted for `--format json`.
#[derive(Debug, Serialize)]
pub struct JsonResult<'a> {
    /// Column labels after disambiguation.
    pub columns: &'a [String],
    /// Row values.
    pub rows: &'a [Vec<CellValue>],
    /// Result shape.
    pub shape: ResultShape,
    /// Engine time in whole milliseconds.
    pub elapsed_ms: u64,
}

/// Serializes a result with its timing as a JSON document.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn render_json(result: &QueryResult, elapsed_ms: u64) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonResult {
        columns: &result.columns,
        rows: &result.rows,
        shape: result.shape(),
        elapsed_ms,
    })
}

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Renders table descriptors as an indented listing.
#[must_use]
pub fn render_schema(tables: &[TableDescriptor]) -> String {
    if tables.is_empty() {
        return t!("schema.empty");
    }
    let mut lines = Vec::new();
    for table in tables {
        lines.push(table.name.clone());
        let width = table.columns.iter().map(|column| column.name.chars().count()).max().unwrap_or(0);
        for column in &table.columns {
            lines.push(render_column(column, width));
        }
    }
    lines.join("\n")
}

/// Renders one column line with its optional type and key tag.
fn render_column(column: &ColumnDescriptor, width: usize) -> String {
    let mut line = format!("  {:width$}", column.name);
    if !column.declared_type.is_empty() {
        line.push_str("  ");
        line.push_str(&column.declared_type);
    }
    match column.key_role {
        Some(KeyRole::Primary) => {
            line.push_str("  ");
            line.push_str(&t!("schema.primary"));
        }
        Some(KeyRole::Foreign) => {
            line.push_str("  ");
            line.push_str(&t!("schema.foreign"));
        }
        Some(KeyRole::None) | None => {}
    }
    line.trim_end().to_string()
}

// ============================================================================
// SECTION: History
// ============================================================================

/// Renders history records, most recent first, under an identity header.
#[must_use]
pub fn render_history(identity: &str, records: &[QueryRecord], shared: bool) -> String {
    let mut lines = Vec::new();
    if shared {
        lines.push(t!("history.warn.shared"));
    }
    lines.push(t!("history.header", identity = identity));
    if records.is_empty() {
        lines.push(t!("history.empty"));
    }
    for record in records {
        lines.push(t!(
            "history.entry",
            timestamp = record.timestamp,
            elapsed = record.elapsed_ms,
            rows = record.shape.rows,
            columns = record.shape.columns,
            query = record.query.replace('\n', " ")
        ));
    }
    lines.join("\n")
}
