// crates/querydesk-sqlite/src/engine.rs
// ============================================================================
// Module: SQLite Query Engine
// Description: QueryEngine implementation over the SQLite components.
// Purpose: Present loader, introspector, and executor as one engine.
// Dependencies: querydesk-core
// ============================================================================

//! ## Overview
//! [`SqliteEngine`] is the [`QueryEngine`] the session layer is built with.
//! It owns the loader configuration; introspection and execution are
//! stateless.

// ============================================================================
// SECTION: Imports
// ============================================================================

use querydesk_core::ExecError;
use querydesk_core::Execution;
use querydesk_core::LoadError;
use querydesk_core::QueryEngine;
use querydesk_core::SchemaError;
use querydesk_core::SchemaOptions;
use querydesk_core::SourceKind;
use querydesk_core::TableDescriptor;

use crate::executor::QueryExecutor;
use crate::handle::DatabaseHandle;
use crate::introspect::SchemaIntrospector;
use crate::loader::LoaderOptions;
use crate::loader::SourceLoader;

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Embedded `SQLite` engine.
#[derive(Debug, Clone, Default)]
pub struct SqliteEngine {
    /// Upload loader.
    loader: SourceLoader,
}

impl SqliteEngine {
    /// Creates an engine with explicit loader options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self {
            loader: SourceLoader::new(options),
        }
    }

    /// Returns the upload loader.
    #[must_use]
    pub const fn loader(&self) -> &SourceLoader {
        &self.loader
    }
}

impl QueryEngine for SqliteEngine {
    type Handle = DatabaseHandle;

    fn load(&self, bytes: &[u8], kind: SourceKind) -> Result<DatabaseHandle, LoadError> {
        self.loader.load(bytes, kind)
    }

    fn describe(
        &self,
        handle: &DatabaseHandle,
        options: SchemaOptions,
    ) -> Result<Vec<TableDescriptor>, SchemaError> {
        SchemaIntrospector::describe_with(handle, options)
    }

    fn execute(&self, handle: &DatabaseHandle, query: &str) -> Result<Option<Execution>, ExecError> {
        QueryExecutor::execute(handle, query)
    }
}
