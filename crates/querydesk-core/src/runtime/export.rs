// crates/querydesk-core/src/runtime/export.rs
// ============================================================================
// Module: Result Export
// Description: CSV serialization of query results.
// Purpose: Offer the last successful result as a downloadable UTF-8 CSV.
// Dependencies: csv, thiserror
// ============================================================================

//! ## Overview
//! The export is a header row of the result's column labels followed by one
//! record per row, comma separated, with no index column. Labels are written
//! as they are; the session normalizes them once when the result is produced
//! so the CSV header always matches what the grid shows. Cells use
//! [`CellValue::render`](crate::core::CellValue::render), so `NULL` exports
//! as an empty field.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use thiserror::Error;

use crate::core::QueryResult;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suffix appended to the source stem for export file names.
const EXPORT_SUFFIX: &str = "_result.csv";
/// Stem used when the source name has none.
const FALLBACK_STEM: &str = "query";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer failure.
    #[error("csv export failed: {0}")]
    Csv(String),
}

/// A ready-to-download CSV payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested download file name.
    pub file_name: String,
    /// UTF-8 CSV bytes.
    pub bytes: Vec<u8>,
}

impl CsvExport {
    /// Serializes `result` under a name derived from `source_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] when serialization fails.
    pub fn build(source_name: &str, result: &QueryResult) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: export_file_name(source_name),
            bytes: export_csv(result)?,
        })
    }
}

// ============================================================================
// SECTION: Export
// ============================================================================

/// Serializes a result to CSV bytes.
///
/// The header is `result.columns` verbatim. A result without columns (DDL,
/// DML) exports as an empty document.
///
/// # Errors
///
/// Returns [`ExportError`] when the CSV writer fails.
pub fn export_csv(result: &QueryResult) -> Result<Vec<u8>, ExportError> {
    if result.columns.is_empty() {
        return Ok(Vec::new());
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&result.columns)
        .map_err(|err| ExportError::Csv(err.to_string()))?;
    for row in &result.rows {
        writer
            .write_record(row.iter().map(crate::core::CellValue::render))
            .map_err(|err| ExportError::Csv(err.to_string()))?;
    }
    writer.into_inner().map_err(|err| ExportError::Csv(err.to_string()))
}

/// Derives the export file name from the uploaded source's base name.
#[must_use]
pub fn export_file_name(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.trim().is_empty())
        .unwrap_or(FALLBACK_STEM);
    format!("{stem}{EXPORT_SUFFIX}")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;
    use crate::core::CellValue;

    #[test]
    fn file_name_uses_source_stem() {
        assert_eq!(export_file_name("parch-and-posey.db"), "parch-and-posey_result.csv");
        assert_eq!(export_file_name("/tmp/dump.sql"), "dump_result.csv");
        assert_eq!(export_file_name(""), "query_result.csv");
    }

    #[test]
    fn header_follows_normalized_columns_and_nulls_are_empty() {
        let mut result = QueryResult::new(
            vec!["id".to_string(), "id".to_string()],
            vec![vec![CellValue::Integer(1), CellValue::Null]],
        );
        result.deduplicate_columns();
        let csv = String::from_utf8(export_csv(&result).unwrap()).unwrap();
        assert_eq!(csv, "id,id_2\n1,\n");
    }

    #[test]
    fn header_is_not_renamed_again() {
        let mut result = QueryResult::new(
            vec!["a".to_string(), "a".to_string(), "a_2".to_string()],
            vec![vec![CellValue::Integer(1), CellValue::Integer(1), CellValue::Integer(1)]],
        );
        result.deduplicate_columns();
        let csv = String::from_utf8(export_csv(&result).unwrap()).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(header, result.columns.join(","));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let result = QueryResult::new(
            vec!["name".to_string()],
            vec![vec![CellValue::Text("Smith, Jane".to_string())]],
        );
        let csv = String::from_utf8(export_csv(&result).unwrap()).unwrap();
        assert_eq!(csv, "name\n\"Smith, Jane\"\n");
    }

    #[test]
    fn columnless_result_exports_nothing() {
        assert!(export_csv(&QueryResult::default()).unwrap().is_empty());
    }
}
