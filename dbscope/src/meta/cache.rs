// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Caching wrapper around the driver's introspection surface
//!
//! Facts that cannot change for the lifetime of a connection (product
//! identity, terms, quoting, capability flags, table types, keyword lists)
//! are cached keyed by accessor name. Listings that can change during a
//! session (catalogs, schemas, tables, columns, keys, procedures) are always
//! fetched fresh - caching those is the structure tree's job, at node
//! granularity with explicit invalidation.

use super::types::{
    ColumnInfo, DataTypeInfo, ForeignKeyColumn, ForeignKeyInfo, IndexInfo, PrimaryKeyInfo,
    ProcedureInfo, TableInfo,
};
use crate::dialect::Dialect;
use crate::driver::{DriverConnection, DriverResult, RawForeignKeyRow};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// A cached introspection fact
#[derive(Clone)]
enum CachedFact {
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

/// Per-connection metadata cache and quirk normalizer
pub struct MetadataCache {
    conn: Arc<Mutex<Box<dyn DriverConnection>>>,
    dialect: Dialect,
    cache: RwLock<HashMap<&'static str, CachedFact>>,
}

impl MetadataCache {
    pub fn new(conn: Arc<Mutex<Box<dyn DriverConnection>>>, dialect: Dialect) -> Self {
        Self {
            conn,
            dialect,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Wrap a standalone connection; useful outside a full browsing session
    pub fn for_connection(conn: Box<dyn DriverConnection>, dialect: Dialect) -> Self {
        Self::new(Arc::new(Mutex::new(conn)), dialect)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Drop every cached fact
    ///
    /// Used when a session's underlying settings (e.g. active catalog)
    /// change.
    pub fn clear_cache(&self) {
        self.cache.write().clear();
        log::debug!("metadata cache cleared");
    }

    // Cache population happens only on success; a driver error propagates
    // without storing any fallback value.
    fn cached_text<F>(&self, key: &'static str, fetch: F) -> DriverResult<String>
    where
        F: FnOnce(&dyn DriverConnection) -> DriverResult<String>,
    {
        if let Some(CachedFact::Text(value)) = self.cache.read().get(key) {
            return Ok(value.clone());
        }
        let value = fetch(self.conn.lock().as_ref())?;
        log::debug!("metadata cache fill: {}", key);
        self.cache
            .write()
            .insert(key, CachedFact::Text(value.clone()));
        Ok(value)
    }

    fn cached_flag<F>(&self, key: &'static str, fetch: F) -> DriverResult<bool>
    where
        F: FnOnce(&dyn DriverConnection) -> DriverResult<bool>,
    {
        if let Some(CachedFact::Flag(value)) = self.cache.read().get(key) {
            return Ok(*value);
        }
        let value = fetch(self.conn.lock().as_ref())?;
        log::debug!("metadata cache fill: {}", key);
        self.cache.write().insert(key, CachedFact::Flag(value));
        Ok(value)
    }

    fn cached_list<F>(&self, key: &'static str, fetch: F) -> DriverResult<Vec<String>>
    where
        F: FnOnce(&dyn DriverConnection) -> DriverResult<Vec<String>>,
    {
        if let Some(CachedFact::List(value)) = self.cache.read().get(key) {
            return Ok(value.clone());
        }
        let value = fetch(self.conn.lock().as_ref())?;
        log::debug!("metadata cache fill: {}", key);
        self.cache
            .write()
            .insert(key, CachedFact::List(value.clone()));
        Ok(value)
    }

    // === Cached connection facts ===

    pub fn user_name(&self) -> DriverResult<String> {
        self.cached_text("user_name", |c| c.user_name())
    }

    pub fn product_name(&self) -> DriverResult<String> {
        self.cached_text("product_name", |c| c.product_name())
    }

    pub fn product_version(&self) -> DriverResult<String> {
        self.cached_text("product_version", |c| c.product_version())
    }

    pub fn driver_name(&self) -> DriverResult<String> {
        self.cached_text("driver_name", |c| c.driver_name())
    }

    pub fn url(&self) -> DriverResult<String> {
        self.cached_text("url", |c| c.url())
    }

    /// Identifier quote string; a driver reporting none yields an empty string
    pub fn identifier_quote_string(&self) -> DriverResult<String> {
        self.cached_text("identifier_quote_string", |c| {
            Ok(c.identifier_quote()?.unwrap_or_default())
        })
    }

    pub fn catalog_term(&self) -> DriverResult<String> {
        self.cached_text("catalog_term", |c| c.catalog_term())
    }

    pub fn schema_term(&self) -> DriverResult<String> {
        self.cached_text("schema_term", |c| c.schema_term())
    }

    pub fn procedure_term(&self) -> DriverResult<String> {
        self.cached_text("procedure_term", |c| c.procedure_term())
    }

    pub fn catalog_separator(&self) -> DriverResult<String> {
        self.cached_text("catalog_separator", |c| c.catalog_separator())
    }

    pub fn sql_keywords(&self) -> DriverResult<Vec<String>> {
        self.cached_list("sql_keywords", |c| Ok(split_sorted(&c.sql_keywords()?)))
    }

    pub fn numeric_functions(&self) -> DriverResult<Vec<String>> {
        self.cached_list("numeric_functions", |c| {
            Ok(split_sorted(&c.numeric_functions()?))
        })
    }

    pub fn string_functions(&self) -> DriverResult<Vec<String>> {
        self.cached_list("string_functions", |c| {
            Ok(split_sorted(&c.string_functions()?))
        })
    }

    pub fn system_functions(&self) -> DriverResult<Vec<String>> {
        self.cached_list("system_functions", |c| {
            Ok(split_sorted(&c.system_functions()?))
        })
    }

    pub fn time_date_functions(&self) -> DriverResult<Vec<String>> {
        self.cached_list("time_date_functions", |c| {
            Ok(split_sorted(&c.time_date_functions()?))
        })
    }

    // === Cached capability flags ===

    pub fn supports_schemas_in_data_manipulation(&self) -> DriverResult<bool> {
        self.cached_flag("supports_schemas_in_data_manipulation", |c| {
            c.supports_schemas_in_data_manipulation()
        })
    }

    pub fn supports_schemas_in_table_definitions(&self) -> DriverResult<bool> {
        self.cached_flag("supports_schemas_in_table_definitions", |c| {
            c.supports_schemas_in_table_definitions()
        })
    }

    pub fn supports_schemas(&self) -> DriverResult<bool> {
        Ok(self.supports_schemas_in_data_manipulation()?
            || self.supports_schemas_in_table_definitions()?)
    }

    pub fn supports_catalogs_in_table_definitions(&self) -> DriverResult<bool> {
        self.cached_flag("supports_catalogs_in_table_definitions", |c| {
            c.supports_catalogs_in_table_definitions()
        })
    }

    pub fn supports_catalogs_in_data_manipulation(&self) -> DriverResult<bool> {
        self.cached_flag("supports_catalogs_in_data_manipulation", |c| {
            c.supports_catalogs_in_data_manipulation()
        })
    }

    pub fn supports_catalogs_in_procedure_calls(&self) -> DriverResult<bool> {
        self.cached_flag("supports_catalogs_in_procedure_calls", |c| {
            c.supports_catalogs_in_procedure_calls()
        })
    }

    pub fn supports_catalogs(&self) -> DriverResult<bool> {
        Ok(self.supports_catalogs_in_table_definitions()?
            || self.supports_catalogs_in_data_manipulation()?
            || self.supports_catalogs_in_procedure_calls()?)
    }

    /// Stored-procedure support
    ///
    /// PostgreSQL drivers report false even though the server supports them;
    /// the dialect overrides the driver here.
    pub fn supports_stored_procedures(&self) -> DriverResult<bool> {
        self.cached_flag("supports_stored_procedures", |c| {
            if self.dialect == Dialect::PostgreSql {
                return Ok(true);
            }
            c.supports_stored_procedures()
        })
    }

    pub fn supports_savepoints(&self) -> DriverResult<bool> {
        self.cached_flag("supports_savepoints", |c| c.supports_savepoints())
    }

    /// Table types reported by the driver, corrected per dialect
    ///
    /// Duplicates are collapsed and the result is sorted; some driver/bridge
    /// combinations return multiple copies of each type.
    pub fn table_types(&self) -> DriverResult<Vec<String>> {
        self.cached_list("table_types", |c| {
            let mut types: BTreeSet<String> = c
                .table_types()?
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();

            match self.dialect {
                // InstantDB only returns "TABLES", which finds nothing when
                // passed back into a table listing call.
                Dialect::InstantDb if types.len() == 1 => {
                    types.clear();
                    types.insert("TABLE".to_string());
                    types.insert("SYSTEM TABLE".to_string());
                }
                // Some PostgreSQL bridges return an empty list, others a
                // single collapsed "SYSTEM TABLE" entry. Index, sequence and
                // system-index pseudo-types misbehave as tables and are
                // always removed.
                Dialect::PostgreSql => {
                    if types.len() <= 1 {
                        types.clear();
                        types.insert("TABLE".to_string());
                        types.insert("SYSTEM TABLE".to_string());
                        types.insert("VIEW".to_string());
                        types.insert("SYSTEM VIEW".to_string());
                    }
                    types.remove("INDEX");
                    types.remove("SEQUENCE");
                    types.remove("SYSTEM INDEX");
                }
                // Informix returns no table types when the connect URL names
                // no database.
                Dialect::Informix if types.is_empty() => {
                    types.insert("TABLE".to_string());
                    types.insert("SYSTEM TABLE".to_string());
                    types.insert("VIEW".to_string());
                }
                _ => {}
            }

            Ok(types.into_iter().collect())
        })
    }

    // === Fresh listings (never cached here) ===

    pub fn catalogs(&self) -> DriverResult<Vec<String>> {
        self.conn.lock().catalogs()
    }

    /// Schema names, with names some drivers omit injected
    pub fn schemas(&self) -> DriverResult<Vec<String>> {
        let mut schemas = self.conn.lock().schemas()?;

        // Some MS SQL and Sybase drivers don't return "guest"; some DB2
        // drivers don't return "SYSFUN", which holds system stored procs.
        match self.dialect {
            Dialect::MsSql | Dialect::Sybase => {
                if !schemas.iter().any(|s| s == "guest") {
                    schemas.push("guest".to_string());
                }
            }
            Dialect::Db2 => {
                if !schemas.iter().any(|s| s == "SYSFUN") {
                    schemas.push("SYSFUN".to_string());
                }
            }
            _ => {}
        }

        Ok(schemas)
    }

    /// Tables in driver order; an empty `types` slice matches every type
    pub fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        types: &[String],
    ) -> DriverResult<Vec<TableInfo>> {
        let rows = self.conn.lock().tables(catalog, schema, types)?;
        Ok(rows.into_iter().map(TableInfo::from_raw).collect())
    }

    pub fn columns(&self, table: &TableInfo) -> DriverResult<Vec<ColumnInfo>> {
        let rows = self.conn.lock().columns(
            table.catalog.as_deref(),
            table.schema.as_deref(),
            &table.name,
        )?;
        Ok(rows.into_iter().map(ColumnInfo::from_raw).collect())
    }

    pub fn primary_keys(&self, table: &TableInfo) -> DriverResult<Vec<PrimaryKeyInfo>> {
        let rows = self.conn.lock().primary_keys(
            table.catalog.as_deref(),
            table.schema.as_deref(),
            &table.name,
        )?;
        Ok(rows.into_iter().map(PrimaryKeyInfo::from_raw).collect())
    }

    /// Foreign keys referencing other tables from `table`, deduplicated
    pub fn imported_keys(&self, table: &TableInfo) -> DriverResult<Vec<ForeignKeyInfo>> {
        let rows = self.conn.lock().imported_keys(
            table.catalog.as_deref(),
            table.schema.as_deref(),
            &table.name,
        )?;
        Ok(merge_foreign_key_rows(rows))
    }

    /// Foreign keys in other tables referencing `table`, deduplicated
    pub fn exported_keys(&self, table: &TableInfo) -> DriverResult<Vec<ForeignKeyInfo>> {
        let rows = self.conn.lock().exported_keys(
            table.catalog.as_deref(),
            table.schema.as_deref(),
            &table.name,
        )?;
        Ok(merge_foreign_key_rows(rows))
    }

    pub fn indexes(&self, table: &TableInfo) -> DriverResult<Vec<IndexInfo>> {
        let rows = self.conn.lock().indexes(
            table.catalog.as_deref(),
            table.schema.as_deref(),
            &table.name,
        )?;
        Ok(rows.into_iter().map(IndexInfo::from_raw).collect())
    }

    pub fn procedures(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> DriverResult<Vec<ProcedureInfo>> {
        let rows = self.conn.lock().procedures(catalog, schema)?;
        Ok(rows.into_iter().map(ProcedureInfo::from_raw).collect())
    }

    pub fn data_types(&self) -> DriverResult<Vec<DataTypeInfo>> {
        let rows = self.conn.lock().type_info()?;
        Ok(rows.into_iter().map(DataTypeInfo::from_raw).collect())
    }

    /// Fully qualified display name for a table
    pub fn qualified_table_name(&self, table: &TableInfo) -> DriverResult<String> {
        let separator = self.catalog_separator()?;
        let separator = if separator.is_empty() {
            ".".to_string()
        } else {
            separator
        };
        let mut parts: Vec<&str> = Vec::new();
        if let Some(catalog) = table.catalog.as_deref() {
            if !catalog.is_empty() {
                parts.push(catalog);
            }
        }
        if let Some(schema) = table.schema.as_deref() {
            if !schema.is_empty() {
                parts.push(schema);
            }
        }
        parts.push(&table.name);
        Ok(parts.join(&separator))
    }
}

/// Merge multi-row driver output into one record per foreign key
///
/// Rows sharing the identity tuple (fk catalog/schema/table/name, pk
/// catalog/schema/table/name) contribute their column pair to one key, in
/// driver row order.
fn merge_foreign_key_rows(rows: Vec<RawForeignKeyRow>) -> Vec<ForeignKeyInfo> {
    let mut keys: Vec<ForeignKeyInfo> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let info = ForeignKeyInfo {
            fk_catalog: row.fk_catalog.clone(),
            fk_schema: row.fk_schema.clone(),
            fk_table: row.fk_table.clone(),
            fk_name: row.fk_name.clone(),
            pk_catalog: row.pk_catalog.clone(),
            pk_schema: row.pk_schema.clone(),
            pk_table: row.pk_table.clone(),
            pk_name: row.pk_name.clone(),
            update_rule: row.update_rule,
            delete_rule: row.delete_rule,
            columns: Vec::new(),
        };
        let key = info.identity_key();
        let slot = *index.entry(key).or_insert_with(|| {
            keys.push(info);
            keys.len() - 1
        });
        keys[slot].columns.push(ForeignKeyColumn {
            fk_column: row.fk_column,
            pk_column: row.pk_column,
            key_seq: row.key_seq,
        });
    }

    keys
}

/// Split a comma-separated driver list and sort it
fn split_sorted(data: &str) -> Vec<String> {
    let mut items: Vec<String> = data
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    items.sort();
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fk_row(fk_name: &str, fk_column: &str, seq: u32) -> RawForeignKeyRow {
        RawForeignKeyRow {
            pk_catalog: None,
            pk_schema: Some("app".to_string()),
            pk_table: "users".to_string(),
            pk_column: format!("{}_target", fk_column),
            pk_name: Some("pk_users".to_string()),
            fk_catalog: None,
            fk_schema: Some("app".to_string()),
            fk_table: "orders".to_string(),
            fk_column: fk_column.to_string(),
            fk_name: Some(fk_name.to_string()),
            key_seq: seq,
            update_rule: 0,
            delete_rule: 0,
        }
    }

    #[test]
    fn test_equal_tuples_merge_into_one_key() {
        let merged = merge_foreign_key_rows(vec![
            fk_row("fk_orders_users", "user_id", 1),
            fk_row("fk_orders_users", "user_region", 2),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].columns.len(), 2);
        assert_eq!(merged[0].columns[0].fk_column, "user_id");
        assert_eq!(merged[0].columns[1].fk_column, "user_region");
    }

    #[test]
    fn test_distinct_tuples_stay_separate() {
        let merged = merge_foreign_key_rows(vec![
            fk_row("fk_orders_users", "user_id", 1),
            fk_row("fk_orders_items", "item_id", 1),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_split_sorted() {
        assert_eq!(
            split_sorted("ZONE, ABS ,,LIMIT"),
            vec!["ABS".to_string(), "LIMIT".to_string(), "ZONE".to_string()]
        );
        assert!(split_sorted("").is_empty());
    }
}
