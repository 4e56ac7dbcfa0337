//! Tests for the metadata façade: per-method caching, vendor corrections,
//! and foreign-key deduplication

#[path = "testutils/mod.rs"]
mod testutils;

use dbscope::dialect::Dialect;
use dbscope::driver::memory::{MemoryDatabase, MemoryDriver};
use dbscope::driver::DatabaseDriver;
use dbscope::meta::{MetadataCache, TableInfo};
use std::sync::Arc;

fn facade(db: MemoryDatabase, dialect: Dialect) -> (MetadataCache, Arc<MemoryDatabase>) {
    testutils::init_logging();
    let driver = MemoryDriver::new(db);
    let database = driver.database();
    let conn = driver
        .connect("memory://fixture", "tester", "secret")
        .expect("connect");
    (MetadataCache::for_connection(conn, dialect), database)
}

fn orders_table() -> TableInfo {
    TableInfo {
        catalog: Some("demo".to_string()),
        schema: Some("app".to_string()),
        name: "orders".to_string(),
        table_type: "TABLE".to_string(),
        remarks: None,
    }
}

#[test]
fn test_stable_facts_are_fetched_once() {
    let (meta, db) = facade(testutils::generic_database(), Dialect::Generic);

    assert_eq!(meta.user_name().unwrap(), "tester");
    assert_eq!(meta.user_name().unwrap(), "tester");
    assert_eq!(db.calls("user_name"), 1);

    assert!(meta.supports_savepoints().is_ok());
    assert!(meta.supports_savepoints().is_ok());
    assert_eq!(db.calls("supports_savepoints"), 1);
}

#[test]
fn test_clear_cache_refetches() {
    let (meta, db) = facade(testutils::generic_database(), Dialect::Generic);

    meta.product_name().unwrap();
    meta.clear_cache();
    meta.product_name().unwrap();
    assert_eq!(db.calls("product_name"), 2);
}

#[test]
fn test_listings_are_never_cached() {
    let (meta, db) = facade(testutils::generic_database(), Dialect::Generic);

    meta.schemas().unwrap();
    meta.schemas().unwrap();
    assert_eq!(db.calls("schemas"), 2);

    meta.catalogs().unwrap();
    meta.catalogs().unwrap();
    assert_eq!(db.calls("catalogs"), 2);
}

#[test]
fn test_failed_fact_is_not_cached() {
    let (meta, db) = facade(testutils::generic_database(), Dialect::Generic);

    db.fail_on("supports_savepoints");
    assert!(meta.supports_savepoints().is_err());

    // No fallback was cached; the next call goes back to the driver.
    db.clear_failure("supports_savepoints");
    assert!(!meta.supports_savepoints().unwrap());
    assert_eq!(db.calls("supports_savepoints"), 2);

    // Now the successful value is cached.
    meta.supports_savepoints().unwrap();
    assert_eq!(db.calls("supports_savepoints"), 2);
}

#[test]
fn test_keyword_list_is_split_and_sorted() {
    let db = MemoryDatabase::new().with_sql_keywords("ZONE,ABS, LIMIT ,,ILIKE");
    let (meta, _) = facade(db, Dialect::Generic);

    assert_eq!(
        meta.sql_keywords().unwrap(),
        vec![
            "ABS".to_string(),
            "ILIKE".to_string(),
            "LIMIT".to_string(),
            "ZONE".to_string()
        ]
    );
}

#[test]
fn test_identifier_quote_defaults_to_empty() {
    let db = MemoryDatabase::new().with_identifier_quote(None);
    let (meta, _) = facade(db, Dialect::Generic);
    assert_eq!(meta.identifier_quote_string().unwrap(), "");
}

#[test]
fn test_postgres_empty_table_type_list_is_corrected() {
    let db = MemoryDatabase::new().with_table_types(&[]);
    let (meta, _) = facade(db, Dialect::PostgreSql);

    assert_eq!(
        meta.table_types().unwrap(),
        vec![
            "SYSTEM TABLE".to_string(),
            "SYSTEM VIEW".to_string(),
            "TABLE".to_string(),
            "VIEW".to_string()
        ]
    );
}

#[test]
fn test_postgres_pseudo_types_are_removed() {
    let db = MemoryDatabase::new().with_table_types(&[
        "TABLE", "VIEW", "INDEX", "SEQUENCE", "SYSTEM INDEX",
    ]);
    let (meta, _) = facade(db, Dialect::PostgreSql);

    assert_eq!(
        meta.table_types().unwrap(),
        vec!["TABLE".to_string(), "VIEW".to_string()]
    );
}

#[test]
fn test_instantdb_single_entry_is_corrected() {
    let db = MemoryDatabase::new().with_table_types(&["TABLES"]);
    let (meta, _) = facade(db, Dialect::InstantDb);

    assert_eq!(
        meta.table_types().unwrap(),
        vec!["SYSTEM TABLE".to_string(), "TABLE".to_string()]
    );
}

#[test]
fn test_informix_empty_table_types_get_defaults() {
    let db = MemoryDatabase::new().with_table_types(&[]);
    let (meta, _) = facade(db, Dialect::Informix);

    assert_eq!(
        meta.table_types().unwrap(),
        vec![
            "SYSTEM TABLE".to_string(),
            "TABLE".to_string(),
            "VIEW".to_string()
        ]
    );
}

#[test]
fn test_duplicate_table_types_collapse() {
    let db = MemoryDatabase::new().with_table_types(&["TABLE", "TABLE", " VIEW", "VIEW "]);
    let (meta, _) = facade(db, Dialect::Generic);

    assert_eq!(
        meta.table_types().unwrap(),
        vec!["TABLE".to_string(), "VIEW".to_string()]
    );
}

#[test]
fn test_mssql_guest_schema_is_injected() {
    let db = MemoryDatabase::new().with_schemas(&["dbo", "sys"]);
    let (meta, _) = facade(db, Dialect::MsSql);

    let schemas = meta.schemas().unwrap();
    assert!(schemas.contains(&"guest".to_string()));
}

#[test]
fn test_guest_schema_is_not_duplicated() {
    let db = MemoryDatabase::new().with_schemas(&["dbo", "guest"]);
    let (meta, _) = facade(db, Dialect::Sybase);

    let schemas = meta.schemas().unwrap();
    assert_eq!(
        schemas.iter().filter(|s| s.as_str() == "guest").count(),
        1
    );
}

#[test]
fn test_db2_sysfun_schema_is_injected() {
    let db = MemoryDatabase::new().with_schemas(&["DB2ADMIN"]);
    let (meta, _) = facade(db, Dialect::Db2);

    assert!(meta.schemas().unwrap().contains(&"SYSFUN".to_string()));
}

#[test]
fn test_generic_dialect_gets_no_schema_injection() {
    let db = MemoryDatabase::new().with_schemas(&["main"]);
    let (meta, _) = facade(db, Dialect::Generic);

    assert_eq!(meta.schemas().unwrap(), vec!["main".to_string()]);
}

#[test]
fn test_postgres_stored_procedures_forced_on() {
    let db = MemoryDatabase::new().with_stored_procedure_support(false);
    let (meta, db_handle) = facade(db, Dialect::PostgreSql);

    assert!(meta.supports_stored_procedures().unwrap());
    // The driver is not even consulted for this dialect.
    assert_eq!(db_handle.calls("supports_stored_procedures"), 0);
}

#[test]
fn test_foreign_key_rows_merge_by_identity_tuple() {
    let db = testutils::generic_database()
        .with_imported_key_row(testutils::fk_row("orders", "user_region", "users", "region", 2));
    let (meta, _) = facade(db, Dialect::Generic);

    // Two driver rows share (schema, table, key name, target) and differ only
    // in column position: one key record with two ordered columns.
    let keys = meta.imported_keys(&orders_table()).unwrap();
    assert_eq!(keys.len(), 1);
    let key = &keys[0];
    assert_eq!(key.fk_name.as_deref(), Some("fk_orders_users"));
    assert_eq!(key.columns.len(), 2);
    assert_eq!(key.columns[0].fk_column, "user_id");
    assert_eq!(key.columns[0].key_seq, 1);
    assert_eq!(key.columns[1].fk_column, "user_region");
    assert_eq!(key.columns[1].key_seq, 2);
}

#[test]
fn test_distinct_foreign_keys_stay_separate() {
    let db = testutils::generic_database()
        .with_table(Some("demo"), Some("app"), "items", "TABLE")
        .with_imported_key_row(testutils::fk_row("orders", "item_id", "items", "id", 1));
    let (meta, _) = facade(db, Dialect::Generic);

    let keys = meta.imported_keys(&orders_table()).unwrap();
    assert_eq!(keys.len(), 2);
}

#[test]
fn test_qualified_table_name_uses_separator() {
    let db = testutils::generic_database().with_catalog_separator(":");
    let (meta, _) = facade(db, Dialect::Generic);

    assert_eq!(
        meta.qualified_table_name(&orders_table()).unwrap(),
        "demo:app:orders"
    );
}
