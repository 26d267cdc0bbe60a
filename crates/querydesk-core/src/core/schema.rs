// crates/querydesk-core/src/core/schema.rs
// ============================================================================
// Module: Schema Descriptors
// Description: Display-ready table and column metadata.
// Purpose: Describe the live structure of a loaded database.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Descriptors are rebuilt on every introspection call and never cached, so
//! they always reflect schema changes made by the session's own queries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Key Roles
// ============================================================================

/// Participation of a column in a key constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
    /// Column is not part of a key.
    None,
    /// Column is part of the table's primary key.
    Primary,
    /// Column references another table.
    Foreign,
}

impl KeyRole {
    /// Returns a short display tag (`PK`, `FK`, or empty).
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Primary => "PK",
            Self::Foreign => "FK",
        }
    }
}

// ============================================================================
// SECTION: Descriptors
// ============================================================================

/// Column metadata for the schema browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Upper-cased declared type, or empty when types were not requested.
    pub declared_type: String,
    /// Key role, or `None` when key roles were not requested.
    pub key_role: Option<KeyRole>,
}

/// Table metadata with columns in declared ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Returns the columns annotated with the given key role.
    pub fn columns_with_role(&self, role: KeyRole) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(move |column| column.key_role == Some(role))
    }
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Independent introspection capabilities requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaOptions {
    /// Include upper-cased declared column types.
    pub include_types: bool,
    /// Include primary/foreign key annotations.
    pub include_key_roles: bool,
}

impl SchemaOptions {
    /// Options matching the historical single "show types" toggle, which also
    /// governed key-role annotation.
    #[must_use]
    pub const fn coupled(include_types: bool) -> Self {
        Self {
            include_types,
            include_key_roles: include_types,
        }
    }
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self::coupled(true)
    }
}
