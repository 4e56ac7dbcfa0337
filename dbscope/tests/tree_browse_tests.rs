//! Tests for lazy structure-tree browsing through the coordinator

#[path = "testutils/mod.rs"]
mod testutils;

use testutils::{find, generic_database, login, names};

#[test]
fn test_root_reports_product_name() {
    let (coordinator, conn, _) = login(generic_database());
    let root = coordinator.get_root(&conn).unwrap();
    assert_eq!(root.name, "TestDB");
    assert_eq!(root.kind, "database");
    assert!(!root.leaf);
}

#[test]
fn test_drill_from_catalog_to_column() {
    let (coordinator, conn, _) = login(generic_database());
    let root = coordinator.get_root(&conn).unwrap();

    let catalogs = coordinator.get_children(&root.id).unwrap();
    assert_eq!(names(&catalogs), vec!["demo"]);
    let demo = find(&catalogs, "demo");
    assert_eq!(demo.kind, "catalog");

    let schemas = coordinator.get_children(&demo.id).unwrap();
    assert_eq!(names(&schemas), vec!["app", "audit"]);

    let app = find(&schemas, "app");
    let groups = coordinator.get_children(&app.id).unwrap();
    // Table-type groups in cached (sorted) order, then the procedure group.
    assert_eq!(names(&groups), vec!["TABLE", "VIEW", "procedure"]);
    let table_group = find(&groups, "TABLE");
    assert_eq!(table_group.kind, "table_group");
    assert_eq!(table_group.cls, "objs");

    let tables = coordinator.get_children(&table_group.id).unwrap();
    // Driver order, no client-side re-sorting.
    assert_eq!(names(&tables), vec!["users", "orders"]);
    let users = find(&tables, "users");
    assert_eq!(users.kind, "table");
    assert_eq!(users.qname.as_deref(), Some("demo.app.users"));

    let members = coordinator.get_children(&users.id).unwrap();
    let id_column = find(&members, "id");
    assert!(id_column.leaf);
    assert_eq!(id_column.kind, "column");
    assert_eq!(id_column.qname.as_deref(), Some("demo.app.users.id"));

    let pk = find(&members, "pk_users");
    assert_eq!(pk.kind, "primary_key");
    let index = find(&members, "ix_users_name");
    assert_eq!(index.kind, "index");
}

#[test]
fn test_node_summary_wire_shape() {
    let (coordinator, conn, _) = login(generic_database());
    let root = coordinator.get_root(&conn).unwrap();

    let value = serde_json::to_value(&root).unwrap();
    assert_eq!(value["name"], "TestDB");
    assert_eq!(value["kind"], "database");
    assert_eq!(value["cls"], "database");
    assert_eq!(value["leaf"], false);
    // Absent qualified names are omitted, not serialized as null.
    assert!(value.get("qname").is_none());
}

#[test]
fn test_view_group_lists_views() {
    let (coordinator, conn, _) = login(generic_database());
    let root = coordinator.get_root(&conn).unwrap();
    let catalogs = coordinator.get_children(&root.id).unwrap();
    let schemas = coordinator.get_children(&catalogs[0].id).unwrap();
    let groups = coordinator.get_children(&find(&schemas, "app").id).unwrap();

    let views = coordinator.get_children(&find(&groups, "VIEW").id).unwrap();
    assert_eq!(names(&views), vec!["active_users"]);
    assert_eq!(views[0].kind, "view");
}

#[test]
fn test_procedure_group_lists_procedures() {
    let (coordinator, conn, _) = login(generic_database());
    let root = coordinator.get_root(&conn).unwrap();
    let catalogs = coordinator.get_children(&root.id).unwrap();
    let schemas = coordinator.get_children(&catalogs[0].id).unwrap();
    let groups = coordinator.get_children(&find(&schemas, "app").id).unwrap();

    let procedures = coordinator
        .get_children(&find(&groups, "procedure").id)
        .unwrap();
    assert_eq!(names(&procedures), vec!["prune_sessions"]);
    assert!(procedures[0].leaf);
}

#[test]
fn test_empty_schema_yields_empty_groups_not_errors() {
    let (coordinator, conn, _) = login(generic_database());
    let root = coordinator.get_root(&conn).unwrap();
    let catalogs = coordinator.get_children(&root.id).unwrap();
    let schemas = coordinator.get_children(&catalogs[0].id).unwrap();
    let groups = coordinator.get_children(&find(&schemas, "audit").id).unwrap();

    let tables = coordinator.get_children(&find(&groups, "TABLE").id).unwrap();
    assert!(tables.is_empty());
}

#[test]
fn test_load_is_idempotent_until_refresh() {
    let (coordinator, conn, db) = login(generic_database());
    let root = coordinator.get_root(&conn).unwrap();
    let catalogs = coordinator.get_children(&root.id).unwrap();
    let schemas = coordinator.get_children(&catalogs[0].id).unwrap();
    let groups = coordinator.get_children(&find(&schemas, "app").id).unwrap();
    let table_group = find(&groups, "TABLE");

    let before = db.calls("tables");
    coordinator.get_children(&table_group.id).unwrap();
    coordinator.get_children(&table_group.id).unwrap();
    assert_eq!(db.calls("tables"), before + 1);

    coordinator.refresh(&table_group.id).unwrap();
    coordinator.get_children(&table_group.id).unwrap();
    assert_eq!(db.calls("tables"), before + 2);
}

#[test]
fn test_introspection_failure_leaves_empty_children() {
    let (coordinator, conn, db) = login(generic_database());
    let root = coordinator.get_root(&conn).unwrap();
    let catalogs = coordinator.get_children(&root.id).unwrap();
    let schemas = coordinator.get_children(&catalogs[0].id).unwrap();
    let groups = coordinator.get_children(&find(&schemas, "app").id).unwrap();
    let tables = coordinator.get_children(&find(&groups, "TABLE").id).unwrap();
    let users = find(&tables, "users");

    db.fail_on("columns");
    // Best-effort: the node loads to an empty (not absent) child list.
    let members = coordinator.get_children(&users.id).unwrap();
    assert!(members.is_empty());

    // Siblings stay browsable.
    let orders = find(&tables, "orders");
    db.clear_failure("columns");
    let order_members = coordinator.get_children(&orders.id).unwrap();
    assert!(!order_members.is_empty());

    // After a refresh the failed node recovers too.
    coordinator.refresh(&users.id).unwrap();
    let members = coordinator.get_children(&users.id).unwrap();
    assert!(!members.is_empty());
}

#[test]
fn test_unknown_node_id_is_expired() {
    let (coordinator, _conn, _) = login(generic_database());
    let err = coordinator.get_children("no-such-id").unwrap_err();
    assert!(err.is_expired());
    let err = coordinator.refresh("no-such-id").unwrap_err();
    assert!(err.is_expired());
}

#[test]
fn test_schema_level_root_when_catalogs_unsupported() {
    let db = generic_database().with_catalog_support(false, false, false);
    let (coordinator, conn, _) = login(db);
    let root = coordinator.get_root(&conn).unwrap();

    let children = coordinator.get_children(&root.id).unwrap();
    assert_eq!(names(&children), vec!["app", "audit"]);
    assert_eq!(children[0].kind, "schema");
}

#[test]
fn test_table_type_root_when_nothing_is_supported() {
    let db = generic_database()
        .with_catalog_support(false, false, false)
        .with_schema_support(false, false);
    let (coordinator, conn, _) = login(db);
    let root = coordinator.get_root(&conn).unwrap();

    let children = coordinator.get_children(&root.id).unwrap();
    assert_eq!(names(&children), vec!["TABLE", "VIEW"]);
}
