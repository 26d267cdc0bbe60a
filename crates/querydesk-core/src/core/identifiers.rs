// crates/querydesk-core/src/core/identifiers.rs
// ============================================================================
// Module: QueryDesk Identifiers
// Description: Identity keys used to scope query history.
// Purpose: Provide a typed key for per-user and shared history buckets.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! History is scoped by the identity of whoever submitted the query. When the
//! host cannot resolve an identity, every anonymous session shares a single
//! bucket. The shared bucket is not private: anyone without an identity sees
//! everyone else's anonymous queries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Display label for the shared anonymous bucket.
pub const SHARED_LEDGER_LABEL: &str = "shared_users";

// ============================================================================
// SECTION: Ledger Key
// ============================================================================

/// Key selecting a history ledger bucket.
///
/// # Invariants
/// - `Identified` values are trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "identity", rename_all = "snake_case")]
pub enum LedgerKey {
    /// History private to a resolved identity.
    Identified(String),
    /// History shared by all sessions without an identity.
    Shared,
}

impl LedgerKey {
    /// Builds a key from a single identity string; blank input maps to the shared bucket.
    #[must_use]
    pub fn identified(identity: &str) -> Self {
        let trimmed = identity.trim();
        if trimmed.is_empty() { Self::Shared } else { Self::Identified(trimmed.to_string()) }
    }

    /// Resolves a key from host-provided user attributes.
    ///
    /// The display name wins over the email; when neither is present (or both
    /// are blank) the shared bucket is selected.
    #[must_use]
    pub fn resolve(name: Option<&str>, email: Option<&str>) -> Self {
        [name, email]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map_or(Self::Shared, |value| Self::Identified(value.to_string()))
    }

    /// Returns true for the shared anonymous bucket.
    #[must_use]
    pub const fn is_shared(&self) -> bool {
        matches!(self, Self::Shared)
    }

    /// Returns the label used for display and audit output.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Identified(identity) => identity,
            Self::Shared => SHARED_LEDGER_LABEL,
        }
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
