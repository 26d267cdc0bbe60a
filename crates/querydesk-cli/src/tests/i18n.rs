// crates/querydesk-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for the message catalog and substitution.
// Purpose: Ensure catalog lookups stay deterministic.
// Dependencies: querydesk-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies catalog keys are unique, placeholders substitute, and unknown
//! keys fall back to the key itself.

use std::collections::BTreeSet;

use crate::i18n::CATALOG_ITEMS;
use crate::i18n::MessageArg;
use crate::i18n::translate;

#[test]
fn catalog_keys_are_unique() {
    let keys: BTreeSet<&str> = CATALOG_ITEMS.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys.len(), CATALOG_ITEMS.len());
}

#[test]
fn translate_substitutes_placeholders() {
    let output = translate(
        "source.load_failed",
        vec![MessageArg::new("path", "shop.db"), MessageArg::new("error", "not a database")],
    );
    assert_eq!(output, "Failed to load shop.db: not a database");
}

#[test]
fn macro_formats_named_arguments() {
    let output = crate::t!("query.summary", rows = 3, columns = 2, elapsed = 7);
    assert_eq!(output, "3 rows x 2 columns in 7 ms");
}

#[test]
fn unknown_key_falls_back_to_key() {
    assert_eq!(translate("no.such.key", Vec::new()), "no.such.key");
}
