// crates/querydesk-core/src/runtime/store.rs
// ============================================================================
// Module: QueryDesk In-Memory History Store
// Description: Process-wide identity-keyed store of bounded query ledgers.
// Purpose: Share query history across sessions of the same identity.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides the in-memory [`HistoryStore`]. It is constructed
//! explicitly and handed to each session, so ownership of the shared state is
//! visible at the call site. There is no expiry; each ledger is bounded by
//! its capacity and evicts FIFO.
//!
//! Locking is two-level: a registry mutex guards bucket lookup, and each
//! bucket has its own mutex so appends for different identities do not
//! contend beyond the lookup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::DEFAULT_HISTORY_CAPACITY;
use crate::core::HistoryLedger;
use crate::core::LedgerKey;
use crate::core::QueryRecord;
use crate::core::RecordOutcome;
use crate::interfaces::HistoryError;
use crate::interfaces::HistoryStore;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Bucket registry guarded by the store's outer mutex.
#[derive(Debug, Default)]
struct Registry {
    /// Ledger per identity.
    buckets: BTreeMap<LedgerKey, Arc<Mutex<HistoryLedger>>>,
    /// Identities in first-seen order.
    order: Vec<LedgerKey>,
}

/// In-memory history store shared across sessions.
#[derive(Debug, Clone)]
pub struct InMemoryHistoryStore {
    /// Bucket registry protected by a mutex.
    registry: Arc<Mutex<Registry>>,
    /// Capacity of every ledger created by this store.
    capacity: usize,
}

impl InMemoryHistoryStore {
    /// Creates a store whose ledgers hold at most `capacity` records.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, HistoryError> {
        if capacity == 0 {
            return Err(HistoryError::InvalidCapacity(capacity));
        }
        Ok(Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            capacity,
        })
    }

    /// Returns the ledger bucket for `key`, creating it on first use.
    fn bucket(&self, key: &LedgerKey) -> Result<Arc<Mutex<HistoryLedger>>, HistoryError> {
        let mut registry = self
            .registry
            .lock()
            .map_err(|_| HistoryError::Poisoned("history registry mutex poisoned".to_string()))?;
        if let Some(bucket) = registry.buckets.get(key) {
            return Ok(Arc::clone(bucket));
        }
        let bucket = Arc::new(Mutex::new(HistoryLedger::new(self.capacity)?));
        registry.buckets.insert(key.clone(), Arc::clone(&bucket));
        registry.order.push(key.clone());
        Ok(bucket)
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn record(&self, key: &LedgerKey, entry: QueryRecord) -> Result<RecordOutcome, HistoryError> {
        let bucket = self.bucket(key)?;
        let mut ledger = bucket
            .lock()
            .map_err(|_| HistoryError::Poisoned(format!("ledger mutex poisoned for {key}")))?;
        Ok(ledger.record(entry))
    }

    fn list(&self, key: &LedgerKey) -> Result<Vec<QueryRecord>, HistoryError> {
        let bucket = self.bucket(key)?;
        let ledger = bucket
            .lock()
            .map_err(|_| HistoryError::Poisoned(format!("ledger mutex poisoned for {key}")))?;
        Ok(ledger.list())
    }

    fn identities(&self) -> Result<Vec<LedgerKey>, HistoryError> {
        let registry = self
            .registry
            .lock()
            .map_err(|_| HistoryError::Poisoned("history registry mutex poisoned".to_string()))?;
        Ok(registry.order.clone())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
