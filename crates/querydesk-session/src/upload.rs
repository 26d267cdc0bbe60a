// crates/querydesk-session/src/upload.rs
// ============================================================================
// Module: Uploads
// Description: User-supplied data source payloads.
// Purpose: Carry the file name used for routing alongside the raw bytes.
// Dependencies: querydesk-core
// ============================================================================

//! ## Overview
//! An [`Upload`] is what a host receives from a file picker. The file name
//! selects the load route; the bytes are never inspected here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use querydesk_core::LoadError;
use querydesk_core::LoadErrorKind;
use querydesk_core::SourceKind;

// ============================================================================
// SECTION: Upload
// ============================================================================

/// A named data source payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name, used for routing and export naming.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Creates an upload from in-memory bytes.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads an upload from disk, keeping only the base name.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] with [`LoadErrorKind::IoFailure`] when the file
    /// cannot be read.
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let bytes = fs::read(path).map_err(|err| {
            LoadError::new(LoadErrorKind::IoFailure, format!("{}: {err}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.to_string_lossy().into_owned(), |name| {
                name.to_string_lossy().into_owned()
            });
        Ok(Self::new(file_name, bytes))
    }

    /// Returns the load route implied by the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoadErrorKind::UnsupportedSource`] for unknown extensions.
    pub fn kind(&self) -> Result<SourceKind, LoadError> {
        SourceKind::from_file_name(&self.file_name).ok_or_else(|| {
            LoadError::new(
                LoadErrorKind::UnsupportedSource,
                format!("unsupported file type: {}", self.file_name),
            )
        })
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

    #[test]
    fn read_keeps_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.sql");
        fs::write(&path, "CREATE TABLE t (id INTEGER);").unwrap();
        let upload = Upload::read(&path).unwrap();
        assert_eq!(upload.file_name, "seed.sql");
        assert_eq!(upload.kind().unwrap(), SourceKind::SqlScript);
    }

    #[test]
    fn read_missing_file_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = Upload::read(&dir.path().join("absent.db")).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::IoFailure);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = Upload::new("notes.txt", Vec::new()).kind().unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::UnsupportedSource);
    }
}
