//! Tests for dialect resolution, through the public registry and a live login

#[path = "testutils/mod.rs"]
mod testutils;

use dbscope::dialect::{Dialect, DialectDescriptor, DialectRegistry};
use dbscope::driver::memory::MemoryDatabase;
use testutils::login;

#[test]
fn test_known_products_resolve() {
    let registry = DialectRegistry::builtin();
    let cases = [
        ("MySQL Community Server", Dialect::MySql),
        ("PostgreSQL", Dialect::PostgreSql),
        ("Oracle Database 19c Enterprise Edition", Dialect::Oracle),
        ("Microsoft SQL Server", Dialect::MsSql),
        ("Adaptive Server Enterprise", Dialect::Sybase),
        ("DB2/LINUXX8664", Dialect::Db2),
        ("IDS/Informix Dynamic Server", Dialect::Informix),
        ("InstantDB", Dialect::InstantDb),
        ("Ingres", Dialect::Ingres),
        ("Progress OpenEdge", Dialect::Progress),
    ];
    for (product, expected) in cases {
        assert_eq!(
            registry.resolve(Some(product), Some("1.0")),
            expected,
            "product {:?}",
            product
        );
    }
}

#[test]
fn test_missing_product_name_is_generic() {
    let registry = DialectRegistry::builtin();
    assert_eq!(registry.resolve(None, Some("1.0")), Dialect::Generic);
}

#[test]
fn test_registration_order_breaks_ties() {
    let mut registry = DialectRegistry::empty();
    registry.register(DialectDescriptor::new(Dialect::Progress, |n, _| {
        n.contains("edge")
    }));
    registry.register(DialectDescriptor::new(Dialect::Ingres, |n, _| {
        n.contains("edge")
    }));
    assert_eq!(
        registry.resolve(Some("OpenEdge"), None),
        Dialect::Progress
    );
}

#[test]
fn test_login_resolves_dialect_from_the_connection() {
    let db = MemoryDatabase::new().with_product(Some("MySQL Community Server"), Some("8.0"));
    let (coordinator, conn, _) = login(db);
    let info = coordinator.connection_info(&conn).unwrap();
    assert_eq!(info.dialect, "mysql");
}

#[test]
fn test_login_without_product_identity_is_generic() {
    let db = MemoryDatabase::new().with_product(None, None);
    let (coordinator, conn, _) = login(db);
    let info = coordinator.connection_info(&conn).unwrap();
    assert_eq!(info.dialect, "generic");
    assert!(info.product_name.is_none());
}
