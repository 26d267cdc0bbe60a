// crates/querydesk-session/tests/session_flow.rs
// ============================================================================
// Module: Session Flow Tests
// Description: End-to-end session behavior over the SQLite engine.
// Purpose: Validate submission ordering, history, export, and source swaps.
// Dependencies: querydesk-session, querydesk-core, querydesk-sqlite, csv
// ============================================================================

//! ## Overview
//! Sessions are opened against script uploads and the bundled sample, then
//! driven through the same calls a host makes.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use querydesk_core::HistoryStore;
use querydesk_core::InMemoryHistoryStore;
use querydesk_core::KeyRole;
use querydesk_core::LedgerKey;
use querydesk_core::LoadErrorKind;
use querydesk_core::RecordOutcome;
use querydesk_core::SchemaOptions;
use querydesk_core::SourceKind;
use querydesk_session::HistoryAuditEvent;
use querydesk_session::QueryAuditEvent;
use querydesk_session::SessionAuditSink;
use querydesk_session::SessionDeps;
use querydesk_session::SessionError;
use querydesk_session::SourceAuditEvent;
use querydesk_session::SqliteSession;
use querydesk_session::Upload;
use querydesk_session::sample_asset;
use querydesk_sqlite::SqliteEngine;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const SHOP_SCRIPT: &str = "
CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT);
CREATE TABLE orders (id INTEGER PRIMARY KEY, customer_id INTEGER REFERENCES customers(id), total REAL);
INSERT INTO customers VALUES (1, 'Ada'), (2, 'Grace');
INSERT INTO orders VALUES (10, 1, 9.5), (11, 2, 3.0), (12, 1, NULL);
";

/// Audit sink that keeps event names in memory.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingSink {
    fn names(&self) -> Vec<String> {
        self.events.lock().unwrap().iter().map(|(name, _)| name.clone()).collect()
    }
}

impl SessionAuditSink for RecordingSink {
    fn record_source(&self, event: &SourceAuditEvent) {
        self.events.lock().unwrap().push((event.event.to_string(), None));
    }

    fn record_query(&self, event: &QueryAuditEvent) {
        self.events.lock().unwrap().push((event.event.to_string(), event.query.clone()));
    }

    fn record_history(&self, event: &HistoryAuditEvent) {
        self.events.lock().unwrap().push((event.event.to_string(), None));
    }
}

fn deps_with_store(store: Arc<InMemoryHistoryStore>) -> SessionDeps<SqliteEngine> {
    SessionDeps::new(Arc::new(SqliteEngine::default()), store)
}

fn deps() -> SessionDeps<SqliteEngine> {
    deps_with_store(Arc::new(InMemoryHistoryStore::default()))
}

fn shop_upload() -> Upload {
    Upload::new("shop.sql", SHOP_SCRIPT.as_bytes().to_vec())
}

fn open_shop(ledger: LedgerKey) -> SqliteSession {
    SqliteSession::open(shop_upload(), ledger, deps()).unwrap()
}

// ============================================================================
// SECTION: Submission
// ============================================================================

#[test]
fn successful_query_is_recorded_with_shape() {
    let mut session = open_shop(LedgerKey::identified("ada"));
    let outcome = session.submit("SELECT * FROM orders").unwrap().unwrap();
    assert_eq!(outcome.shape.rows, 3);
    assert_eq!(outcome.shape.columns, 3);
    assert_eq!(outcome.history, RecordOutcome::Appended);
    assert!(outcome.executed_at.ends_with('Z'));

    let history = session.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].query, "SELECT * FROM orders");
    assert_eq!(history[0].shape, outcome.shape);
    assert_eq!(history[0].elapsed_ms, outcome.elapsed_ms);
}

#[test]
fn blank_submission_is_a_no_op() {
    let mut session = open_shop(LedgerKey::identified("ada"));
    assert!(session.submit("   \n").unwrap().is_none());
    assert!(session.submit("-- just a note").unwrap().is_none());
    assert!(session.history().unwrap().is_empty());
    assert!(session.export_csv().unwrap().is_none());
}

#[test]
fn failed_query_records_no_history_and_session_recovers() {
    let mut session = open_shop(LedgerKey::identified("ada"));
    let err = session.submit("SELECT * FROM missing_table").unwrap_err();
    assert!(matches!(err, SessionError::Exec(_)));
    assert!(err.to_string().contains("missing_table"));
    assert!(session.history().unwrap().is_empty());

    let outcome = session.submit("SELECT name FROM customers").unwrap().unwrap();
    assert_eq!(outcome.shape.rows, 2);
    assert_eq!(session.history().unwrap().len(), 1);
}

#[test]
fn repeated_query_is_suppressed_but_alternating_is_kept() {
    let mut session = open_shop(LedgerKey::identified("ada"));
    session.submit("SELECT 1").unwrap();
    let repeat = session.submit("SELECT 1").unwrap().unwrap();
    assert_eq!(repeat.history, RecordOutcome::SuppressedDuplicate);
    session.submit("SELECT 2").unwrap();
    session.submit("SELECT 1").unwrap();
    let queries: Vec<String> =
        session.history().unwrap().into_iter().map(|record| record.query).collect();
    assert_eq!(queries, vec!["SELECT 1", "SELECT 2", "SELECT 1"]);
}

#[test]
fn duplicate_columns_are_renamed_in_result_and_export() {
    let mut session = open_shop(LedgerKey::identified("ada"));
    let outcome = session
        .submit("SELECT o.id, c.id, c.name FROM orders o JOIN customers c ON c.id = o.customer_id ORDER BY o.id")
        .unwrap()
        .unwrap();
    assert_eq!(outcome.result.columns, vec!["id", "id_2", "name"]);

    let export = session.export_csv().unwrap().unwrap();
    assert_eq!(export.file_name, "shop_result.csv");
    let mut reader = csv::Reader::from_reader(export.bytes.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, vec!["id", "id_2", "name"]);
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "10");
    assert_eq!(&rows[0][2], "Ada");
}

#[test]
fn export_header_matches_grid_when_renaming_collides() {
    let mut session = open_shop(LedgerKey::identified("ada"));
    let outcome = session
        .submit("SELECT id AS a, id AS a, id AS a_2 FROM customers ORDER BY id")
        .unwrap()
        .unwrap();
    assert_eq!(outcome.result.columns, vec!["a", "a_2", "a_2"]);

    let export = session.export_csv().unwrap().unwrap();
    let mut reader = csv::Reader::from_reader(export.bytes.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, outcome.result.columns);
}

#[test]
fn export_tracks_last_successful_result() {
    let mut session = open_shop(LedgerKey::identified("ada"));
    session.submit("SELECT name FROM customers ORDER BY id").unwrap();
    let _ = session.submit("SELECT nope FROM customers");
    let export = session.export_csv().unwrap().unwrap();
    let text = String::from_utf8(export.bytes).unwrap();
    assert_eq!(text, "name\nAda\nGrace\n");
}

#[test]
fn schema_reflects_changes_made_by_queries() {
    let mut session = open_shop(LedgerKey::identified("ada"));
    assert_eq!(session.schema(SchemaOptions::default()).unwrap().len(), 2);
    session.submit("CREATE TABLE notes (body TEXT)").unwrap();
    let names: Vec<String> = session
        .schema(SchemaOptions::default())
        .unwrap()
        .into_iter()
        .map(|table| table.name)
        .collect();
    assert!(names.contains(&"notes".to_string()));
}

// ============================================================================
// SECTION: History Ledgers
// ============================================================================

#[test]
fn identities_keep_separate_histories_over_a_shared_store() {
    let store = Arc::new(InMemoryHistoryStore::default());
    let mut ada =
        SqliteSession::open(shop_upload(), LedgerKey::identified("ada"), deps_with_store(Arc::clone(&store)))
            .unwrap();
    let mut anon =
        SqliteSession::open(shop_upload(), LedgerKey::resolve(None, None), deps_with_store(Arc::clone(&store)))
            .unwrap();
    ada.submit("SELECT 1").unwrap();
    anon.submit("SELECT 2").unwrap();

    assert!(!ada.is_shared_history());
    assert!(anon.is_shared_history());
    assert_eq!(ada.history().unwrap()[0].query, "SELECT 1");
    assert_eq!(anon.history().unwrap()[0].query, "SELECT 2");
    assert_eq!(store.identities().unwrap().len(), 2);
}

#[test]
fn history_is_bounded_by_store_capacity() {
    let store = Arc::new(InMemoryHistoryStore::new(2).unwrap());
    let mut session =
        SqliteSession::open(shop_upload(), LedgerKey::identified("ada"), deps_with_store(store)).unwrap();
    session.submit("SELECT 1").unwrap();
    session.submit("SELECT 2").unwrap();
    let third = session.submit("SELECT 3").unwrap().unwrap();
    assert!(matches!(third.history, RecordOutcome::Evicted(ref record) if record.query == "SELECT 1"));
    let queries: Vec<String> =
        session.history().unwrap().into_iter().map(|record| record.query).collect();
    assert_eq!(queries, vec!["SELECT 3", "SELECT 2"]);
}

// ============================================================================
// SECTION: Sources
// ============================================================================

#[test]
fn unsupported_upload_opens_no_session() {
    let result = SqliteSession::open(Upload::new("notes.txt", b"hello".to_vec()), LedgerKey::Shared, deps());
    match result {
        Err(SessionError::Load(err)) => assert_eq!(err.kind, LoadErrorKind::UnsupportedSource),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected load failure"),
    }
}

#[test]
fn failed_replacement_keeps_current_source() {
    let mut session = open_shop(LedgerKey::identified("ada"));
    session.submit("SELECT name FROM customers").unwrap();
    let err = session
        .replace_source(Upload::new("broken.sql", b"CREATE TABLE (".to_vec()))
        .unwrap_err();
    assert!(matches!(err, SessionError::Load(ref load) if load.kind == LoadErrorKind::ScriptExecFailure));
    assert_eq!(session.source_name(), "shop.sql");
    assert!(session.export_csv().unwrap().is_some());
    assert!(session.submit("SELECT * FROM orders").unwrap().is_some());
}

#[test]
fn replacement_releases_previous_artifact() {
    let sample = sample_asset();
    let mut session = SqliteSession::open(sample.to_upload(), LedgerKey::identified("ada"), deps()).unwrap();
    assert_eq!(session.source_kind(), SourceKind::BinaryDb);
    let artifact = session.handle().artifact_path().unwrap().to_path_buf();
    assert!(artifact.exists());
    session.submit("SELECT COUNT(*) FROM orders").unwrap();

    session.replace_source(shop_upload()).unwrap();
    assert!(!artifact.exists());
    assert_eq!(session.source_kind(), SourceKind::SqlScript);
    assert!(session.last_result().is_none());
    assert_eq!(session.history().unwrap().len(), 1);
}

#[test]
fn sample_database_has_keyed_tables() {
    let sample = sample_asset();
    assert_eq!(sample.file_name, "parch-and-posey.db");
    assert!(sample.bytes.starts_with(b"SQLite format 3\0"));

    let session = SqliteSession::open(sample.to_upload(), LedgerKey::Shared, deps()).unwrap();
    let tables = session.schema(SchemaOptions::default()).unwrap();
    let names: Vec<&str> = tables.iter().map(|table| table.name.as_str()).collect();
    for expected in ["accounts", "orders", "region", "sales_reps", "web_events"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    for table in &tables {
        assert_eq!(table.columns_with_role(KeyRole::Primary).count(), 1, "{}", table.name);
    }
    let orders = tables.iter().find(|table| table.name == "orders").unwrap();
    let account_id = orders.columns.iter().find(|column| column.name == "account_id").unwrap();
    assert_eq!(account_id.key_role, Some(KeyRole::Foreign));
}

// ============================================================================
// SECTION: Audit
// ============================================================================

#[test]
fn audit_events_follow_session_activity() {
    let sink = Arc::new(RecordingSink::default());
    let deps = deps().with_audit(sink.clone());
    let mut session = SqliteSession::open(shop_upload(), LedgerKey::identified("ada"), deps).unwrap();
    session.submit("SELECT 1").unwrap();
    let _ = session.submit("SELEC 1");
    let _ = session.replace_source(Upload::new("bad.csv", Vec::new()));
    assert_eq!(
        sink.names(),
        vec![
            "source_loaded",
            "query_executed",
            "history_recorded",
            "query_failed",
            "source_load_failed",
        ]
    );
    assert!(sink.events.lock().unwrap().iter().all(|(_, query)| query.is_none()));
}

#[test]
fn query_text_is_audited_only_on_opt_in() {
    let sink = Arc::new(RecordingSink::default());
    let deps = deps().with_audit(sink.clone()).with_query_text_logging(true);
    let mut session = SqliteSession::open(shop_upload(), LedgerKey::identified("ada"), deps).unwrap();
    session.submit("SELECT 42").unwrap();
    let logged: Vec<String> =
        sink.events.lock().unwrap().iter().filter_map(|(_, query)| query.clone()).collect();
    assert_eq!(logged, vec!["SELECT 42"]);
}
