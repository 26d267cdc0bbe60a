// crates/querydesk-sqlite/src/introspect.rs
// ============================================================================
// Module: SQLite Schema Introspector
// Description: Reads table and column metadata from a live handle.
// Purpose: Produce the schema tree shown in the schema browser.
// Dependencies: querydesk-core, rusqlite
// ============================================================================

//! ## Overview
//! User tables are read from `sqlite_master` in catalog order, skipping the
//! engine's own `sqlite_*` tables. Columns come from `pragma_table_info` in
//! ordinal order. Nothing is cached: every call re-reads the catalog, so
//! tables created by the session's own queries show up immediately.
//!
//! ## Key roles
//! The `pk` column of `table_info` is the key indicator: `0` means the column
//! is not part of the primary key, a positive value is its position within
//! the primary key. Columns with indicator `0` that appear in
//! `pragma_foreign_key_list` are foreign keys. Primary wins when a column is
//! both. A negative indicator is outside the documented domain and aborts the
//! call with [`SchemaError::ContractViolation`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;

use querydesk_core::ColumnDescriptor;
use querydesk_core::KeyRole;
use querydesk_core::SchemaError;
use querydesk_core::SchemaOptions;
use querydesk_core::TableDescriptor;
use rusqlite::Connection;

use crate::handle::DatabaseHandle;

// ============================================================================
// SECTION: Queries
// ============================================================================

/// Lists user tables in catalog order.
const TABLES_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'";
/// Lists columns of one table in ordinal order.
const COLUMNS_SQL: &str = "SELECT name, type, pk FROM pragma_table_info(?1) ORDER BY cid";
/// Lists referencing columns of one table.
const FOREIGN_KEYS_SQL: &str = "SELECT \"from\" FROM pragma_foreign_key_list(?1)";

// ============================================================================
// SECTION: Introspector
// ============================================================================

/// Schema introspection over a [`DatabaseHandle`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaIntrospector;

impl SchemaIntrospector {
    /// Describes all user tables; key roles are computed only when
    /// `include_types` is set, matching the single display toggle.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] on engine failure or an out-of-domain key indicator.
    pub fn describe(
        handle: &DatabaseHandle,
        include_types: bool,
    ) -> Result<Vec<TableDescriptor>, SchemaError> {
        Self::describe_with(handle, SchemaOptions::coupled(include_types))
    }

    /// Describes all user tables with independently selected capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] on engine failure or an out-of-domain key indicator.
    pub fn describe_with(
        handle: &DatabaseHandle,
        options: SchemaOptions,
    ) -> Result<Vec<TableDescriptor>, SchemaError> {
        let connection = handle.connection().map_err(SchemaError::Engine)?;
        list_tables(&connection)?
            .into_iter()
            .map(|table| describe_table(&connection, table, options))
            .collect()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads user table names.
fn list_tables(connection: &Connection) -> Result<Vec<String>, SchemaError> {
    let mut statement = connection.prepare(TABLES_SQL).map_err(engine_error)?;
    let names = statement
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(engine_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(engine_error)?;
    Ok(names)
}

/// Reads column metadata for one table.
fn describe_table(
    connection: &Connection,
    table: String,
    options: SchemaOptions,
) -> Result<TableDescriptor, SchemaError> {
    let mut statement = connection.prepare(COLUMNS_SQL).map_err(engine_error)?;
    let raw_columns = statement
        .query_map([table.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                row.get::<_, i64>(2)?,
            ))
        })
        .map_err(engine_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(engine_error)?;

    let foreign =
        if options.include_key_roles { foreign_key_columns(connection, &table)? } else { HashSet::new() };

    let mut columns = Vec::with_capacity(raw_columns.len());
    for (name, declared_type, indicator) in raw_columns {
        let key_role = if options.include_key_roles {
            Some(key_role(&table, &name, indicator, &foreign)?)
        } else {
            None
        };
        columns.push(ColumnDescriptor {
            declared_type: if options.include_types {
                declared_type.to_uppercase()
            } else {
                String::new()
            },
            name,
            key_role,
        });
    }
    Ok(TableDescriptor {
        name: table,
        columns,
    })
}

/// Reads the lower-cased names of columns that reference other tables.
fn foreign_key_columns(connection: &Connection, table: &str) -> Result<HashSet<String>, SchemaError> {
    let mut statement = connection.prepare(FOREIGN_KEYS_SQL).map_err(engine_error)?;
    let names = statement
        .query_map([table], |row| row.get::<_, String>(0))
        .map_err(engine_error)?
        .map(|name| name.map(|name| name.to_ascii_lowercase()))
        .collect::<Result<HashSet<_>, _>>()
        .map_err(engine_error)?;
    Ok(names)
}

/// Maps a key indicator to a key role.
fn key_role(
    table: &str,
    column: &str,
    indicator: i64,
    foreign: &HashSet<String>,
) -> Result<KeyRole, SchemaError> {
    match indicator {
        0 if foreign.contains(&column.to_ascii_lowercase()) => Ok(KeyRole::Foreign),
        0 => Ok(KeyRole::None),
        position if position > 0 => Ok(KeyRole::Primary),
        _ => Err(SchemaError::ContractViolation {
            table: table.to_string(),
            column: column.to_string(),
            indicator,
        }),
    }
}

/// Wraps an engine error.
fn engine_error(error: rusqlite::Error) -> SchemaError {
    SchemaError::Engine(error.to_string())
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
    fn indicator_domain_maps_to_roles() {
        let foreign: HashSet<String> = ["owner_id".to_string()].into_iter().collect();
        assert_eq!(key_role("t", "id", 1, &foreign).unwrap(), KeyRole::Primary);
        assert_eq!(key_role("t", "id", 2, &foreign).unwrap(), KeyRole::Primary);
        assert_eq!(key_role("t", "Owner_ID", 0, &foreign).unwrap(), KeyRole::Foreign);
        assert_eq!(key_role("t", "name", 0, &foreign).unwrap(), KeyRole::None);
    }

    #[test]
    fn negative_indicator_is_a_contract_violation() {
        let err = key_role("t", "id", -1, &HashSet::new()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::ContractViolation {
                table: "t".to_string(),
                column: "id".to_string(),
                indicator: -1,
            }
        );
    }
}
