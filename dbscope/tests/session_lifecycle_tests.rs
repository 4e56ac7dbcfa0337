//! Tests for session lifecycle: login, transactions, disconnect, teardown

#[path = "testutils/mod.rs"]
mod testutils;

use dbscope::BrowseCoordinator;
use testutils::{generic_database, login, with_ten_row_query};

#[test]
fn test_connection_info_after_login() {
    let (coordinator, conn, _) = login(generic_database());
    let info = coordinator.connection_info(&conn).unwrap();

    assert_eq!(info.product_name.as_deref(), Some("TestDB"));
    assert_eq!(info.product_version.as_deref(), Some("1.2"));
    assert_eq!(info.user_name.as_deref(), Some("tester"));
    assert_eq!(info.dialect, "generic");
    assert!(info.auto_commit);
    assert!(info.live);
    assert_eq!(info.supports_catalogs, Some(true));
    assert_eq!(info.supports_schemas, Some(true));
}

#[test]
fn test_commit_and_rollback_reach_the_driver() {
    let (coordinator, conn, db) = login(generic_database());

    coordinator.commit(&conn).unwrap();
    coordinator.rollback(&conn).unwrap();
    assert_eq!(db.calls("commit"), 1);
    assert_eq!(db.calls("rollback"), 1);
}

#[test]
fn test_commit_failure_is_a_connection_error() {
    let (coordinator, conn, db) = login(generic_database());

    db.fail_on("commit");
    let err = coordinator.commit(&conn).unwrap_err();
    assert!(matches!(err, dbscope::EngineError::Connection(_)));

    // Session state is unchanged; the connection keeps working.
    db.clear_failure("commit");
    coordinator.commit(&conn).unwrap();
    coordinator.ping(&conn).unwrap();
}

#[test]
fn test_disconnect_expires_the_connection_id() {
    let (coordinator, conn, db) = login(generic_database());

    coordinator.disconnect(&conn).unwrap();
    assert_eq!(db.calls("close"), 1);

    assert!(coordinator.ping(&conn).unwrap_err().is_expired());
    assert!(coordinator.commit(&conn).unwrap_err().is_expired());
    assert!(coordinator.get_root(&conn).unwrap_err().is_expired());
    assert!(coordinator.disconnect(&conn).unwrap_err().is_expired());
}

#[test]
fn test_nodes_survive_as_empty_after_disconnect() {
    let (coordinator, conn, _) = login(generic_database());
    let root = coordinator.get_root(&conn).unwrap();
    let catalogs = coordinator.get_children(&root.id).unwrap();

    coordinator.disconnect(&conn).unwrap();

    // Already-registered nodes still resolve; their loads fail quietly into
    // empty child lists because the connection is gone.
    let schemas = coordinator.get_children(&catalogs[0].id).unwrap();
    assert!(schemas.is_empty());
}

#[test]
fn test_close_session_expires_everything() {
    let db = with_ten_row_query(generic_database(), "select id, name from app.big");
    let (coordinator, conn, db_handle) = login(db);

    let root = coordinator.get_root(&conn).unwrap();
    let catalogs = coordinator.get_children(&root.id).unwrap();
    let page = coordinator
        .run_query(&conn, "select id, name from app.big", Some(3), None)
        .unwrap();

    coordinator.close_session();

    assert_eq!(db_handle.calls("close"), 1);
    assert!(coordinator.get_root(&conn).unwrap_err().is_expired());
    assert!(coordinator.ping(&conn).unwrap_err().is_expired());
    assert!(coordinator
        .get_children(&catalogs[0].id)
        .unwrap_err()
        .is_expired());
    assert!(coordinator
        .fetch_more(&page.executor_id, false)
        .unwrap_err()
        .is_expired());

    // Teardown is idempotent.
    coordinator.close_session();
}

#[test]
fn test_sessions_are_disjoint() {
    let (first, first_conn, _) = login(generic_database());
    let (second, _second_conn, _) = login(generic_database());

    assert_ne!(first.session_id(), second.session_id());

    let root = first.get_root(&first_conn).unwrap();
    let children = first.get_children(&root.id).unwrap();
    // Ids are scoped to one session's registry; tearing down another session
    // must not disturb them.
    second.close_session();
    assert!(!first.get_children(&children[0].id).unwrap().is_empty());
}

#[test]
fn test_clear_metadata_cache_forces_refetch() {
    let (coordinator, conn, db) = login(generic_database());

    coordinator.connection_info(&conn).unwrap();
    coordinator.connection_info(&conn).unwrap();
    let calls_after_two = db.calls("user_name");

    coordinator.clear_metadata_cache(&conn).unwrap();
    coordinator.connection_info(&conn).unwrap();
    assert_eq!(db.calls("user_name"), calls_after_two + 1);
}

#[test]
fn test_failed_login_registers_nothing() {
    testutils::init_logging();
    let driver = dbscope::driver::memory::MemoryDriver::new(generic_database());
    let db = driver.database();
    db.fail_on("connect");

    let coordinator = BrowseCoordinator::new();
    let err = coordinator
        .login(&driver, "memory://fixture", "tester", "secret", true)
        .unwrap_err();
    assert!(matches!(err, dbscope::EngineError::Connection(_)));
}
