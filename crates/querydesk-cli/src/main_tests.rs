// crates/querydesk-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for shell input classification and bounded reads.
// Purpose: Ensure meta-commands parse and oversized sources fail closed.
// Dependencies: querydesk-cli main helpers
// ============================================================================

//! ## Overview
//! Validates `classify_line` and `read_bytes_with_limit`.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use super::ReadLimitError;
use super::ShellInput;
use super::classify_line;
use super::read_bytes_with_limit;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn classify_line_recognizes_meta_commands() {
    assert_eq!(classify_line("   \n"), ShellInput::Empty);
    assert_eq!(classify_line(".quit\n"), ShellInput::Quit);
    assert_eq!(classify_line(".exit"), ShellInput::Quit);
    assert_eq!(classify_line(".schema"), ShellInput::Schema);
    assert_eq!(classify_line(".history"), ShellInput::History);
    assert_eq!(classify_line(".export out.csv\n"), ShellInput::Export(Some("out.csv")));
    assert_eq!(classify_line(".export"), ShellInput::Export(None));
    assert_eq!(classify_line(".tables"), ShellInput::Unknown(".tables"));
}

#[test]
fn classify_line_passes_sql_through_trimmed() {
    assert_eq!(classify_line("  SELECT 1;\n"), ShellInput::Query("SELECT 1;"));
}

#[test]
fn read_bytes_with_limit_allows_small_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("small.sql");
    fs::write(&path, b"ok").expect("write small file");

    let bytes = read_bytes_with_limit(&path, 16).expect("read small file");
    assert_eq!(bytes, b"ok");
}

#[test]
fn read_bytes_with_limit_rejects_large_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("large.db");
    let limit = 8_usize;
    fs::write(&path, vec![0_u8; limit + 1]).expect("write large file");

    let err = read_bytes_with_limit(&path, limit).expect_err("expected size limit failure");
    match err {
        ReadLimitError::TooLarge {
            size,
            limit: reported,
        } => {
            assert_eq!(size, 9);
            assert_eq!(reported, limit);
        }
        ReadLimitError::Io(err) => panic!("unexpected IO error: {err}"),
    }
}
