// crates/querydesk-cli/src/tests/render.rs
// ============================================================================
// Module: CLI Renderer Tests
// Description: Unit tests for grid, schema, and history rendering.
// Purpose: Keep terminal output stable and aligned.
// Dependencies: querydesk-cli render module
// ============================================================================

//! ## Overview
//! Exercises the pure renderers with hand-built results and descriptors.

use querydesk_core::CellValue;
use querydesk_core::ColumnDescriptor;
use querydesk_core::KeyRole;
use querydesk_core::QueryRecord;
use querydesk_core::QueryResult;
use querydesk_core::ResultShape;
use querydesk_core::TableDescriptor;

use crate::render::render_grid;
use crate::render::render_history;
use crate::render::render_json;
use crate::render::render_schema;
use crate::render::render_summary;

fn sample_result() -> QueryResult {
    QueryResult::new(
        vec!["id".to_string(), "name".to_string()],
        vec![
            vec![CellValue::Integer(1), CellValue::Text("Ada".to_string())],
            vec![CellValue::Integer(22), CellValue::Null],
        ],
    )
}

#[test]
fn grid_aligns_columns_and_shows_null() {
    let grid = render_grid(&sample_result());
    let lines: Vec<&str> = grid.lines().collect();
    assert_eq!(lines[0], "id | name");
    assert_eq!(lines[1], "---------");
    assert_eq!(lines[2], "1  | Ada");
    assert_eq!(lines[3], "22 | NULL");
}

#[test]
fn grid_marks_empty_result() {
    let result = QueryResult::new(vec!["id".to_string()], Vec::new());
    let grid = render_grid(&result);
    assert!(grid.ends_with("Empty set"));
}

#[test]
fn grid_is_blank_without_columns() {
    assert!(render_grid(&QueryResult::default()).is_empty());
}

#[test]
fn summary_distinguishes_statements_from_queries() {
    let shape = ResultShape {
        rows: 2,
        columns: 2,
    };
    assert_eq!(render_summary(shape, 4), "2 rows x 2 columns in 4 ms");
    let empty = ResultShape {
        rows: 0,
        columns: 0,
    };
    assert_eq!(render_summary(empty, 1), "Statement executed in 1 ms");
}

#[test]
fn json_output_carries_shape_and_values() {
    let json = render_json(&sample_result(), 9).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["columns"][1], "name");
    assert_eq!(value["rows"][0][1], "Ada");
    assert!(value["rows"][1][1].is_null());
    assert_eq!(value["elapsed_ms"], 9);
}

#[test]
fn schema_lists_types_and_key_tags() {
    let tables = vec![TableDescriptor {
        name: "orders".to_string(),
        columns: vec![
            ColumnDescriptor {
                name: "id".to_string(),
                declared_type: "INTEGER".to_string(),
                key_role: Some(KeyRole::Primary),
            },
            ColumnDescriptor {
                name: "account_id".to_string(),
                declared_type: "INTEGER".to_string(),
                key_role: Some(KeyRole::Foreign),
            },
            ColumnDescriptor {
                name: "note".to_string(),
                declared_type: String::new(),
                key_role: None,
            },
        ],
    }];
    let text = render_schema(&tables);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "orders");
    assert_eq!(lines[1], "  id          INTEGER  PK");
    assert_eq!(lines[2], "  account_id  INTEGER  FK");
    assert_eq!(lines[3], "  note");
}

#[test]
fn schema_reports_no_tables() {
    assert_eq!(render_schema(&[]), "No tables.");
}

#[test]
fn history_warns_for_shared_ledger() {
    let records = vec![QueryRecord::new(
        "2026-01-01T00:00:00Z",
        "SELECT 1",
        3,
        ResultShape {
            rows: 1,
            columns: 1,
        },
    )];
    let text = render_history("shared_users", &records, true);
    assert!(text.starts_with("Warning:"));
    assert!(text.contains("2026-01-01T00:00:00Z  3 ms  (1, 1)  SELECT 1"));
    let private = render_history("ada", &[], false);
    assert_eq!(private, "Query history for ada\nNo queries yet.");
}
