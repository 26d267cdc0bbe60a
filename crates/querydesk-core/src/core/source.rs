// crates/querydesk-core/src/core/source.rs
// ============================================================================
// Module: Upload Sources
// Description: Classification of uploaded database sources.
// Purpose: Route an upload to binary or script loading by file extension.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The upload boundary supplies raw bytes plus a file name. Only the
//! extension is consulted; content sniffing is left to the engine loader.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Extensions routed to SQL script loading.
pub const SCRIPT_EXTENSIONS: &[&str] = &["sql"];
/// Extensions routed to binary database loading.
pub const BINARY_EXTENSIONS: &[&str] = &["db", "sqlite", "sqlite3", "db3"];

// ============================================================================
// SECTION: Source Kind
// ============================================================================

/// How uploaded bytes are turned into a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Serialized database file.
    BinaryDb,
    /// UTF-8 SQL script executed against an empty in-memory database.
    SqlScript,
}

impl SourceKind {
    /// Classifies a file name by extension (case-insensitive).
    ///
    /// Returns `None` for names without an accepted extension.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
        if SCRIPT_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::SqlScript)
        } else if BINARY_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::BinaryDb)
        } else {
            None
        }
    }

    /// Returns a stable label for the source kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BinaryDb => "binary_db",
            Self::SqlScript => "sql_script",
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
