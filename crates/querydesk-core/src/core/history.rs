// crates/querydesk-core/src/core/history.rs
// ============================================================================
// Module: Query History Ledger
// Description: Bounded, append-only log of past query executions.
// Purpose: Record successful queries per identity with FIFO eviction.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`HistoryLedger`] is a fixed-capacity ring of [`QueryRecord`] values.
//! Appending to a full ledger evicts the single oldest record. An append is
//! suppressed when its query text equals the most recent record's text; this
//! is adjacent-duplicate suppression only, older matches are kept.
//!
//! ## Invariants
//! - `len() <= capacity()` at all times.
//! - Capacity is at least one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;

use serde::Deserialize;
use serde::Serialize;

use crate::core::result::ResultShape;
use crate::interfaces::HistoryError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of records kept per ledger.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

// ============================================================================
// SECTION: Records
// ============================================================================

/// One successful query execution. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Execution time as an RFC 3339 UTC string.
    pub timestamp: String,
    /// Query text exactly as submitted.
    pub query: String,
    /// Engine time in whole milliseconds.
    pub elapsed_ms: u64,
    /// Result shape.
    pub shape: ResultShape,
}

impl QueryRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(
        timestamp: impl Into<String>,
        query: impl Into<String>,
        elapsed_ms: u64,
        shape: ResultShape,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            query: query.into(),
            elapsed_ms,
            shape,
        }
    }
}

/// What a ledger did with a submitted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Record appended without eviction.
    Appended,
    /// Record appended after evicting the returned oldest record.
    Evicted(QueryRecord),
    /// Record matched the most recent query text and was dropped.
    SuppressedDuplicate,
}

impl RecordOutcome {
    /// Returns true when the record was stored.
    #[must_use]
    pub const fn was_recorded(&self) -> bool {
        !matches!(self, Self::SuppressedDuplicate)
    }
}

// ============================================================================
// SECTION: Ledger
// ============================================================================

/// Bounded FIFO ledger of query records for one identity.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    /// Records in insertion order (oldest first).
    records: VecDeque<QueryRecord>,
    /// Maximum number of records retained.
    capacity: usize,
}

impl HistoryLedger {
    /// Creates an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, HistoryError> {
        if capacity == 0 {
            return Err(HistoryError::InvalidCapacity(capacity));
        }
        Ok(Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Appends a record unless it repeats the most recent query text.
    pub fn record(&mut self, entry: QueryRecord) -> RecordOutcome {
        if self.records.back().is_some_and(|last| last.query == entry.query) {
            return RecordOutcome::SuppressedDuplicate;
        }
        let evicted =
            if self.records.len() >= self.capacity { self.records.pop_front() } else { None };
        self.records.push_back(entry);
        evicted.map_or(RecordOutcome::Appended, RecordOutcome::Evicted)
    }

    /// Returns the records most-recent first. Never mutates.
    #[must_use]
    pub fn list(&self) -> Vec<QueryRecord> {
        self.records.iter().rev().cloned().collect()
    }

    /// Returns the most recently appended record.
    #[must_use]
    pub fn latest(&self) -> Option<&QueryRecord> {
        self.records.back()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of records retained.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self {
            records: VecDeque::with_capacity(DEFAULT_HISTORY_CAPACITY),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
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

    fn record(query: &str) -> QueryRecord {
        QueryRecord::new(
            "2026-01-01T00:00:00Z",
            query,
            1,
            ResultShape {
                rows: 1,
                columns: 1,
            },
        )
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(HistoryLedger::new(0), Err(HistoryError::InvalidCapacity(0))));
    }

    #[test]
    fn adjacent_duplicate_is_suppressed() {
        let mut ledger = HistoryLedger::new(5).unwrap();
        assert_eq!(ledger.record(record("SELECT 1")), RecordOutcome::Appended);
        assert_eq!(ledger.record(record("SELECT 1")), RecordOutcome::SuppressedDuplicate);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn non_adjacent_duplicate_is_kept() {
        let mut ledger = HistoryLedger::new(5).unwrap();
        ledger.record(record("a"));
        ledger.record(record("b"));
        assert!(ledger.record(record("a")).was_recorded());
        let queries: Vec<_> = ledger.list().into_iter().map(|entry| entry.query).collect();
        assert_eq!(queries, vec!["a", "b", "a"]);
    }

    #[test]
    fn full_ledger_evicts_oldest() {
        let mut ledger = HistoryLedger::new(2).unwrap();
        ledger.record(record("first"));
        ledger.record(record("second"));
        let outcome = ledger.record(record("third"));
        assert_eq!(outcome, RecordOutcome::Evicted(record("first")));
        let queries: Vec<_> = ledger.list().into_iter().map(|entry| entry.query).collect();
        assert_eq!(queries, vec!["third", "second"]);
    }

    #[test]
    fn suppression_compares_exact_text() {
        let mut ledger = HistoryLedger::new(5).unwrap();
        ledger.record(record("SELECT 1"));
        assert!(ledger.record(record("SELECT 1 ")).was_recorded());
        assert_eq!(ledger.latest().map(|entry| entry.query.as_str()), Some("SELECT 1 "));
    }

    #[test]
    fn default_capacity_is_fifty() {
        assert_eq!(HistoryLedger::default().capacity(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(DEFAULT_HISTORY_CAPACITY, 50);
    }
}
