// crates/querydesk-core/src/core/columns.rs
// ============================================================================
// Module: Column Name Deduplication
// Description: Disambiguates repeated column names in a result set.
// Purpose: Keep every result column addressable by a distinct label.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Joins and hand-written projections routinely return the same column name
//! more than once (`SELECT a.id, b.id ...`). Grids and CSV headers need
//! distinct labels, so the k-th occurrence of a name (k >= 2) is relabelled
//! `{name}_{k}` while the first occurrence keeps its original text.
//!
//! ## Known limitation
//! Occurrence counts are tracked per *original* name only. A generated label
//! may therefore equal a later original column of the same text:
//! `["a", "a", "a_2"]` becomes `["a", "a_2", "a_2"]`. The output is left
//! as-is rather than re-numbered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::collections::HashSet;

// ============================================================================
// SECTION: Deduplication
// ============================================================================

/// Returns the column labels with repeated names suffixed by occurrence.
///
/// Pure function; the input order is preserved.
#[must_use]
pub fn deduplicate<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(columns.len());
    columns
        .iter()
        .map(|column| {
            let name = column.as_ref();
            let count = seen.entry(name).or_insert(0);
            *count += 1;
            if *count > 1 { format!("{name}_{count}") } else { name.to_string() }
        })
        .collect()
}

/// Returns true when any column name occurs more than once.
#[must_use]
pub fn has_duplicates<S: AsRef<str>>(columns: &[S]) -> bool {
    let mut seen = HashSet::with_capacity(columns.len());
    columns.iter().any(|column| !seen.insert(column.as_ref()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
