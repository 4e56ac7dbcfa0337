//! Test utilities for dbscope integration tests
//!
//! Fixtures are in-memory databases built with the memory driver; each test
//! gets its own isolated coordinator/session so tests can run in parallel.
#![allow(dead_code)] // each test binary uses a different subset of helpers

use dbscope::driver::memory::{MemoryDatabase, MemoryDriver};
use dbscope::driver::{ColumnDesc, RawForeignKeyRow, RawIndexRow, RawPrimaryKeyRow, TypeCode, Value};
use dbscope::{BrowseCoordinator, NodeSummary};
use std::sync::Arc;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Vendor-neutral fixture: one catalog, two schemas, a few tables
pub fn generic_database() -> MemoryDatabase {
    MemoryDatabase::new()
        .with_product(Some("TestDB"), Some("1.2"))
        .with_catalogs(&["demo"])
        .with_schemas(&["app", "audit"])
        .with_table_types(&["TABLE", "VIEW"])
        .with_table(Some("demo"), Some("app"), "users", "TABLE")
        .with_table(Some("demo"), Some("app"), "orders", "TABLE")
        .with_table(Some("demo"), Some("app"), "active_users", "VIEW")
        .with_column("users", "id", TypeCode::Integer, "INT")
        .with_column("users", "name", TypeCode::Varchar, "VARCHAR")
        .with_column("orders", "id", TypeCode::Integer, "INT")
        .with_column("orders", "user_id", TypeCode::Integer, "INT")
        .with_primary_key_row(RawPrimaryKeyRow {
            catalog: Some("demo".to_string()),
            schema: Some("app".to_string()),
            table: "users".to_string(),
            column: "id".to_string(),
            key_seq: 1,
            pk_name: Some("pk_users".to_string()),
        })
        .with_imported_key_row(fk_row("orders", "user_id", "users", "id", 1))
        .with_index_row(RawIndexRow {
            catalog: Some("demo".to_string()),
            schema: Some("app".to_string()),
            table: "users".to_string(),
            index_name: "ix_users_name".to_string(),
            column: "name".to_string(),
            unique: false,
            ordinal: 1,
        })
        .with_procedure(Some("app"), "prune_sessions")
}

/// One foreign-key row from `orders` into another table
pub fn fk_row(
    fk_table: &str,
    fk_column: &str,
    pk_table: &str,
    pk_column: &str,
    seq: u32,
) -> RawForeignKeyRow {
    RawForeignKeyRow {
        pk_catalog: Some("demo".to_string()),
        pk_schema: Some("app".to_string()),
        pk_table: pk_table.to_string(),
        pk_column: pk_column.to_string(),
        pk_name: Some(format!("pk_{}", pk_table)),
        fk_catalog: Some("demo".to_string()),
        fk_schema: Some("app".to_string()),
        fk_table: fk_table.to_string(),
        fk_column: fk_column.to_string(),
        fk_name: Some(format!("fk_{}_{}", fk_table, pk_table)),
        key_seq: seq,
        update_rule: 0,
        delete_rule: 0,
    }
}

/// A ten-row result set for paging tests
pub fn with_ten_row_query(db: MemoryDatabase, statement: &str) -> MemoryDatabase {
    let columns = vec![
        ColumnDesc::new("id", TypeCode::Integer),
        ColumnDesc::new("name", TypeCode::Varchar),
    ];
    let rows = (1..=10)
        .map(|i| {
            vec![
                Value::Integer(i),
                Value::Text(format!("row-{:02}", i)),
            ]
        })
        .collect();
    db.script_query(statement, columns, rows)
}

/// Log in against a fixture; returns the coordinator, the connection id and
/// the shared database for counters/failure injection
pub fn login(db: MemoryDatabase) -> (BrowseCoordinator, String, Arc<MemoryDatabase>) {
    init_logging();
    let driver = MemoryDriver::new(db);
    let database = driver.database();
    let coordinator = BrowseCoordinator::new();
    let connection_id = coordinator
        .login(&driver, "memory://fixture", "tester", "secret", true)
        .expect("login against memory fixture");
    (coordinator, connection_id, database)
}

/// Find a child by name, failing the test with a readable message
pub fn find<'a>(nodes: &'a [NodeSummary], name: &str) -> &'a NodeSummary {
    nodes
        .iter()
        .find(|n| n.name == name)
        .unwrap_or_else(|| panic!("no node named '{}' in {:?}", name, names(nodes)))
}

pub fn names(nodes: &[NodeSummary]) -> Vec<String> {
    nodes.iter().map(|n| n.name.clone()).collect()
}
