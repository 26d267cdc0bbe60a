// crates/querydesk-config/src/lib.rs
// ============================================================================
// Module: QueryDesk Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for querydesk.toml semantics.
// Dependencies: querydesk-core, querydesk-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `querydesk-config` defines the configuration model for QueryDesk: history
//! capacity, upload limits, schema display defaults, audit logging, and the
//! session's initial query text. Validation is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
