// crates/querydesk-session/src/sample.rs
// ============================================================================
// Module: Sample Database
// Description: Bundled demonstration database.
// Purpose: Offer a ready-made source for first-time users.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The sample is a small Parch and Posey paper-company database embedded at
//! build time. It is handed out byte for byte.

use crate::upload::Upload;

/// Download name of the bundled sample database.
pub const SAMPLE_FILE_NAME: &str = "parch-and-posey.db";

/// Embedded sample bytes.
static SAMPLE_BYTES: &[u8] = include_bytes!("../assets/parch-and-posey.db");

/// The bundled sample database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleAsset {
    /// Suggested download file name.
    pub file_name: &'static str,
    /// Raw database file bytes.
    pub bytes: &'static [u8],
}

impl SampleAsset {
    /// Wraps the sample as an upload so it can be opened directly.
    #[must_use]
    pub fn to_upload(&self) -> Upload {
        Upload::new(self.file_name, self.bytes.to_vec())
    }
}

/// Returns the bundled sample database.
#[must_use]
pub fn sample_asset() -> SampleAsset {
    SampleAsset {
        file_name: SAMPLE_FILE_NAME,
        bytes: SAMPLE_BYTES,
    }
}
