// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory driver implementation for testing and embedding
//!
//! `MemoryDatabase` describes a fixture database: connection facts, capability
//! flags, introspection listings, and canned statement results. Failure
//! injection and per-method call counters make it suitable for exercising the
//! caching and best-effort policies of the engine.

use super::{
    ColumnDesc, DatabaseDriver, DriverConnection, DriverError, DriverResult, RawColumnRow,
    RawForeignKeyRow, RawIndexRow, RawPrimaryKeyRow, RawProcedureRow, RawTableRow, RawTypeInfoRow,
    RowCursor, StatementOutcome, Value,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A canned result for one scripted statement
enum CannedResult {
    Rows {
        columns: Vec<ColumnDesc>,
        rows: Vec<Vec<Value>>,
        /// Expected bind parameters; `None` accepts any
        params: Option<Vec<Value>>,
    },
    Update(u64),
}

/// Fixture description of an in-memory database
///
/// Built with the chained `with_*` setters, then shared (`Arc`) between the
/// driver and the test that wants to adjust failure injection or read call
/// counters while connections are live.
pub struct MemoryDatabase {
    product_name: Option<String>,
    product_version: Option<String>,
    driver_name: String,
    user_name: String,
    url: String,
    identifier_quote: Option<String>,
    catalog_term: String,
    schema_term: String,
    procedure_term: String,
    catalog_separator: String,
    sql_keywords: String,
    numeric_functions: String,
    string_functions: String,
    system_functions: String,
    time_date_functions: String,
    supports_schemas_in_data_manipulation: bool,
    supports_schemas_in_table_definitions: bool,
    supports_catalogs_in_table_definitions: bool,
    supports_catalogs_in_data_manipulation: bool,
    supports_catalogs_in_procedure_calls: bool,
    supports_stored_procedures: bool,
    supports_savepoints: bool,
    catalogs: Vec<String>,
    schemas: Vec<String>,
    table_types: Vec<String>,
    tables: Vec<RawTableRow>,
    columns: Vec<RawColumnRow>,
    primary_keys: Vec<RawPrimaryKeyRow>,
    imported_keys: Vec<RawForeignKeyRow>,
    exported_keys: Vec<RawForeignKeyRow>,
    indexes: Vec<RawIndexRow>,
    procedures: Vec<RawProcedureRow>,
    type_info: Vec<RawTypeInfoRow>,
    statements: Mutex<HashMap<String, CannedResult>>,
    failures: Mutex<HashSet<String>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self {
            product_name: Some("MemoryDB".to_string()),
            product_version: Some("1.0".to_string()),
            driver_name: "dbscope memory driver".to_string(),
            user_name: "tester".to_string(),
            url: "memory://local".to_string(),
            identifier_quote: Some("\"".to_string()),
            catalog_term: "catalog".to_string(),
            schema_term: "schema".to_string(),
            procedure_term: "procedure".to_string(),
            catalog_separator: ".".to_string(),
            sql_keywords: String::new(),
            numeric_functions: String::new(),
            string_functions: String::new(),
            system_functions: String::new(),
            time_date_functions: String::new(),
            supports_schemas_in_data_manipulation: true,
            supports_schemas_in_table_definitions: true,
            supports_catalogs_in_table_definitions: true,
            supports_catalogs_in_data_manipulation: true,
            supports_catalogs_in_procedure_calls: false,
            supports_stored_procedures: true,
            supports_savepoints: false,
            catalogs: Vec::new(),
            schemas: Vec::new(),
            table_types: vec!["TABLE".to_string(), "VIEW".to_string()],
            tables: Vec::new(),
            columns: Vec::new(),
            primary_keys: Vec::new(),
            imported_keys: Vec::new(),
            exported_keys: Vec::new(),
            indexes: Vec::new(),
            procedures: Vec::new(),
            type_info: Vec::new(),
            statements: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashSet::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    // === Fixture setters ===

    pub fn with_product(mut self, name: Option<&str>, version: Option<&str>) -> Self {
        self.product_name = name.map(|s| s.to_string());
        self.product_version = version.map(|s| s.to_string());
        self
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user_name = user.to_string();
        self
    }

    pub fn with_identifier_quote(mut self, quote: Option<&str>) -> Self {
        self.identifier_quote = quote.map(|s| s.to_string());
        self
    }

    pub fn with_catalog_separator(mut self, separator: &str) -> Self {
        self.catalog_separator = separator.to_string();
        self
    }

    pub fn with_sql_keywords(mut self, keywords: &str) -> Self {
        self.sql_keywords = keywords.to_string();
        self
    }

    pub fn with_schema_support(mut self, data_manipulation: bool, table_definitions: bool) -> Self {
        self.supports_schemas_in_data_manipulation = data_manipulation;
        self.supports_schemas_in_table_definitions = table_definitions;
        self
    }

    pub fn with_catalog_support(
        mut self,
        table_definitions: bool,
        data_manipulation: bool,
        procedure_calls: bool,
    ) -> Self {
        self.supports_catalogs_in_table_definitions = table_definitions;
        self.supports_catalogs_in_data_manipulation = data_manipulation;
        self.supports_catalogs_in_procedure_calls = procedure_calls;
        self
    }

    pub fn with_stored_procedure_support(mut self, supported: bool) -> Self {
        self.supports_stored_procedures = supported;
        self
    }

    pub fn with_catalogs(mut self, catalogs: &[&str]) -> Self {
        self.catalogs = catalogs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_schemas(mut self, schemas: &[&str]) -> Self {
        self.schemas = schemas.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_table_types(mut self, types: &[&str]) -> Self {
        self.table_types = types.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_table(
        mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        name: &str,
        table_type: &str,
    ) -> Self {
        self.tables.push(RawTableRow {
            catalog: catalog.map(|s| s.to_string()),
            schema: schema.map(|s| s.to_string()),
            name: name.to_string(),
            table_type: table_type.to_string(),
            remarks: None,
        });
        self
    }

    pub fn with_column(
        mut self,
        table: &str,
        name: &str,
        type_code: super::TypeCode,
        type_name: &str,
    ) -> Self {
        let ordinal = self
            .columns
            .iter()
            .filter(|c| c.table == table)
            .count() as u32
            + 1;
        self.columns.push(RawColumnRow {
            catalog: None,
            schema: None,
            table: table.to_string(),
            name: name.to_string(),
            type_code,
            type_name: type_name.to_string(),
            size: 0,
            nullable: true,
            remarks: None,
            ordinal,
        });
        self
    }

    pub fn with_primary_key_row(mut self, row: RawPrimaryKeyRow) -> Self {
        self.primary_keys.push(row);
        self
    }

    pub fn with_imported_key_row(mut self, row: RawForeignKeyRow) -> Self {
        self.imported_keys.push(row);
        self
    }

    pub fn with_exported_key_row(mut self, row: RawForeignKeyRow) -> Self {
        self.exported_keys.push(row);
        self
    }

    pub fn with_index_row(mut self, row: RawIndexRow) -> Self {
        self.indexes.push(row);
        self
    }

    pub fn with_procedure(mut self, schema: Option<&str>, name: &str) -> Self {
        self.procedures.push(RawProcedureRow {
            catalog: None,
            schema: schema.map(|s| s.to_string()),
            name: name.to_string(),
            remarks: None,
            procedure_type: 0,
        });
        self
    }

    pub fn with_type_info_row(mut self, row: RawTypeInfoRow) -> Self {
        self.type_info.push(row);
        self
    }

    /// Script a result set for one exact statement text
    pub fn script_query(
        self,
        statement: &str,
        columns: Vec<ColumnDesc>,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        self.statements.lock().insert(
            statement.to_string(),
            CannedResult::Rows {
                columns,
                rows,
                params: None,
            },
        );
        self
    }

    /// Script a result set that also checks its bind parameters
    pub fn script_query_with_params(
        self,
        statement: &str,
        params: Vec<Value>,
        columns: Vec<ColumnDesc>,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        self.statements.lock().insert(
            statement.to_string(),
            CannedResult::Rows {
                columns,
                rows,
                params: Some(params),
            },
        );
        self
    }

    /// Script an update count for one exact statement text
    pub fn script_update(self, statement: &str, count: u64) -> Self {
        self.statements
            .lock()
            .insert(statement.to_string(), CannedResult::Update(count));
        self
    }

    // === Runtime controls (usable through a shared Arc) ===

    /// Make the named introspection/statement method fail until cleared
    pub fn fail_on(&self, method: &str) {
        self.failures.lock().insert(method.to_string());
    }

    pub fn clear_failure(&self, method: &str) {
        self.failures.lock().remove(method);
    }

    /// Number of times the named method has been invoked
    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }

    fn track(&self, method: &str) -> DriverResult<()> {
        *self.calls.lock().entry(method.to_string()).or_insert(0) += 1;
        if self.failures.lock().contains(method) {
            return Err(DriverError::Introspection(format!(
                "injected failure: {}",
                method
            )));
        }
        Ok(())
    }
}

/// Driver front for a shared [`MemoryDatabase`]
pub struct MemoryDriver {
    database: Arc<MemoryDatabase>,
}

impl MemoryDriver {
    pub fn new(database: MemoryDatabase) -> Self {
        Self {
            database: Arc::new(database),
        }
    }

    pub fn shared(database: Arc<MemoryDatabase>) -> Self {
        Self { database }
    }

    pub fn database(&self) -> Arc<MemoryDatabase> {
        self.database.clone()
    }
}

impl DatabaseDriver for MemoryDriver {
    fn name(&self) -> &str {
        "memory"
    }

    fn connect(
        &self,
        _url: &str,
        _user: &str,
        _password: &str,
    ) -> DriverResult<Box<dyn DriverConnection>> {
        self.database
            .track("connect")
            .map_err(|e| DriverError::Connect(e.to_string()))?;
        Ok(Box::new(MemoryConnection {
            database: self.database.clone(),
            closed: AtomicBool::new(false),
            auto_commit: AtomicBool::new(true),
        }))
    }
}

/// One live connection against a [`MemoryDatabase`]
pub struct MemoryConnection {
    database: Arc<MemoryDatabase>,
    closed: AtomicBool,
    auto_commit: AtomicBool,
}

impl MemoryConnection {
    fn guard(&self, method: &str) -> DriverResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DriverError::Closed);
        }
        self.database.track(method)
    }
}

/// Cursor over a canned result set
struct MemoryCursor {
    columns: Vec<ColumnDesc>,
    rows: VecDeque<Vec<Value>>,
}

impl RowCursor for MemoryCursor {
    fn columns(&self) -> &[ColumnDesc] {
        &self.columns
    }

    fn next_row(&mut self) -> DriverResult<Option<Vec<Value>>> {
        Ok(self.rows.pop_front())
    }
}

impl DriverConnection for MemoryConnection {
    fn execute(&mut self, statement: &str, params: &[Value]) -> DriverResult<StatementOutcome> {
        self.guard("execute")
            .map_err(|e| DriverError::Statement(e.to_string()))?;
        let canned = self.database.statements.lock();
        match canned.get(statement) {
            Some(CannedResult::Rows {
                columns,
                rows,
                params: expected,
            }) => {
                if let Some(expected) = expected {
                    if expected.as_slice() != params {
                        return Err(DriverError::Statement(format!(
                            "unexpected parameters for: {}",
                            statement
                        )));
                    }
                }
                Ok(StatementOutcome::Rows(Box::new(MemoryCursor {
                    columns: columns.clone(),
                    rows: rows.iter().cloned().collect(),
                })))
            }
            Some(CannedResult::Update(count)) => Ok(StatementOutcome::Update(*count)),
            None => Err(DriverError::Statement(format!(
                "no scripted result for: {}",
                statement
            ))),
        }
    }

    fn commit(&mut self) -> DriverResult<()> {
        self.guard("commit")
            .map_err(|e| DriverError::Transaction(e.to_string()))
    }

    fn rollback(&mut self) -> DriverResult<()> {
        self.guard("rollback")
            .map_err(|e| DriverError::Transaction(e.to_string()))
    }

    fn set_auto_commit(&mut self, enabled: bool) -> DriverResult<()> {
        self.guard("set_auto_commit")?;
        self.auto_commit.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> DriverResult<()> {
        self.database.track("close")?;
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn product_name(&self) -> DriverResult<String> {
        self.guard("product_name")?;
        self.database
            .product_name
            .clone()
            .ok_or_else(|| DriverError::NotSupported("product name".to_string()))
    }

    fn product_version(&self) -> DriverResult<String> {
        self.guard("product_version")?;
        self.database
            .product_version
            .clone()
            .ok_or_else(|| DriverError::NotSupported("product version".to_string()))
    }

    fn driver_name(&self) -> DriverResult<String> {
        self.guard("driver_name")?;
        Ok(self.database.driver_name.clone())
    }

    fn user_name(&self) -> DriverResult<String> {
        self.guard("user_name")?;
        Ok(self.database.user_name.clone())
    }

    fn url(&self) -> DriverResult<String> {
        self.guard("url")?;
        Ok(self.database.url.clone())
    }

    fn identifier_quote(&self) -> DriverResult<Option<String>> {
        self.guard("identifier_quote")?;
        Ok(self.database.identifier_quote.clone())
    }

    fn catalog_term(&self) -> DriverResult<String> {
        self.guard("catalog_term")?;
        Ok(self.database.catalog_term.clone())
    }

    fn schema_term(&self) -> DriverResult<String> {
        self.guard("schema_term")?;
        Ok(self.database.schema_term.clone())
    }

    fn procedure_term(&self) -> DriverResult<String> {
        self.guard("procedure_term")?;
        Ok(self.database.procedure_term.clone())
    }

    fn catalog_separator(&self) -> DriverResult<String> {
        self.guard("catalog_separator")?;
        Ok(self.database.catalog_separator.clone())
    }

    fn sql_keywords(&self) -> DriverResult<String> {
        self.guard("sql_keywords")?;
        Ok(self.database.sql_keywords.clone())
    }

    fn numeric_functions(&self) -> DriverResult<String> {
        self.guard("numeric_functions")?;
        Ok(self.database.numeric_functions.clone())
    }

    fn string_functions(&self) -> DriverResult<String> {
        self.guard("string_functions")?;
        Ok(self.database.string_functions.clone())
    }

    fn system_functions(&self) -> DriverResult<String> {
        self.guard("system_functions")?;
        Ok(self.database.system_functions.clone())
    }

    fn time_date_functions(&self) -> DriverResult<String> {
        self.guard("time_date_functions")?;
        Ok(self.database.time_date_functions.clone())
    }

    fn supports_schemas_in_data_manipulation(&self) -> DriverResult<bool> {
        self.guard("supports_schemas_in_data_manipulation")?;
        Ok(self.database.supports_schemas_in_data_manipulation)
    }

    fn supports_schemas_in_table_definitions(&self) -> DriverResult<bool> {
        self.guard("supports_schemas_in_table_definitions")?;
        Ok(self.database.supports_schemas_in_table_definitions)
    }

    fn supports_catalogs_in_table_definitions(&self) -> DriverResult<bool> {
        self.guard("supports_catalogs_in_table_definitions")?;
        Ok(self.database.supports_catalogs_in_table_definitions)
    }

    fn supports_catalogs_in_data_manipulation(&self) -> DriverResult<bool> {
        self.guard("supports_catalogs_in_data_manipulation")?;
        Ok(self.database.supports_catalogs_in_data_manipulation)
    }

    fn supports_catalogs_in_procedure_calls(&self) -> DriverResult<bool> {
        self.guard("supports_catalogs_in_procedure_calls")?;
        Ok(self.database.supports_catalogs_in_procedure_calls)
    }

    fn supports_stored_procedures(&self) -> DriverResult<bool> {
        self.guard("supports_stored_procedures")?;
        Ok(self.database.supports_stored_procedures)
    }

    fn supports_savepoints(&self) -> DriverResult<bool> {
        self.guard("supports_savepoints")?;
        Ok(self.database.supports_savepoints)
    }

    fn catalogs(&self) -> DriverResult<Vec<String>> {
        self.guard("catalogs")?;
        Ok(self.database.catalogs.clone())
    }

    fn schemas(&self) -> DriverResult<Vec<String>> {
        self.guard("schemas")?;
        Ok(self.database.schemas.clone())
    }

    fn table_types(&self) -> DriverResult<Vec<String>> {
        self.guard("table_types")?;
        Ok(self.database.table_types.clone())
    }

    fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        types: &[String],
    ) -> DriverResult<Vec<RawTableRow>> {
        self.guard("tables")?;
        Ok(self
            .database
            .tables
            .iter()
            .filter(|t| matches_opt(catalog, t.catalog.as_deref()))
            .filter(|t| matches_opt(schema, t.schema.as_deref()))
            .filter(|t| types.is_empty() || types.iter().any(|ty| *ty == t.table_type))
            .cloned()
            .collect())
    }

    fn columns(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> DriverResult<Vec<RawColumnRow>> {
        self.guard("columns")?;
        Ok(self
            .database
            .columns
            .iter()
            .filter(|c| c.table == table)
            .cloned()
            .collect())
    }

    fn primary_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> DriverResult<Vec<RawPrimaryKeyRow>> {
        self.guard("primary_keys")?;
        Ok(self
            .database
            .primary_keys
            .iter()
            .filter(|k| k.table == table)
            .cloned()
            .collect())
    }

    fn imported_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> DriverResult<Vec<RawForeignKeyRow>> {
        self.guard("imported_keys")?;
        Ok(self
            .database
            .imported_keys
            .iter()
            .filter(|k| k.fk_table == table)
            .cloned()
            .collect())
    }

    fn exported_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> DriverResult<Vec<RawForeignKeyRow>> {
        self.guard("exported_keys")?;
        Ok(self
            .database
            .exported_keys
            .iter()
            .filter(|k| k.pk_table == table)
            .cloned()
            .collect())
    }

    fn indexes(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> DriverResult<Vec<RawIndexRow>> {
        self.guard("indexes")?;
        Ok(self
            .database
            .indexes
            .iter()
            .filter(|i| i.table == table)
            .cloned()
            .collect())
    }

    fn procedures(
        &self,
        _catalog: Option<&str>,
        schema: Option<&str>,
    ) -> DriverResult<Vec<RawProcedureRow>> {
        self.guard("procedures")?;
        Ok(self
            .database
            .procedures
            .iter()
            .filter(|p| matches_opt(schema, p.schema.as_deref()))
            .cloned()
            .collect())
    }

    fn type_info(&self) -> DriverResult<Vec<RawTypeInfoRow>> {
        self.guard("type_info")?;
        Ok(self.database.type_info.clone())
    }
}

/// A `None` filter matches everything
fn matches_opt(filter: Option<&str>, value: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(f) => value == Some(f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::TypeCode;

    #[test]
    fn test_connect_and_introspect() {
        let driver = MemoryDriver::new(
            MemoryDatabase::new()
                .with_product(Some("MemoryDB"), Some("2.0"))
                .with_catalogs(&["app"]),
        );
        let conn = driver.connect("memory://local", "u", "p").unwrap();
        assert_eq!(conn.product_name().unwrap(), "MemoryDB");
        assert_eq!(conn.catalogs().unwrap(), vec!["app".to_string()]);
        assert_eq!(driver.database().calls("catalogs"), 1);
    }

    #[test]
    fn test_failure_injection() {
        let driver = MemoryDriver::new(MemoryDatabase::new());
        let conn = driver.connect("memory://local", "u", "p").unwrap();
        driver.database().fail_on("schemas");
        assert!(conn.schemas().is_err());
        driver.database().clear_failure("schemas");
        assert!(conn.schemas().is_ok());
    }

    #[test]
    fn test_closed_connection_rejects_calls() {
        let driver = MemoryDriver::new(MemoryDatabase::new());
        let mut conn = driver.connect("memory://local", "u", "p").unwrap();
        conn.close().unwrap();
        assert!(matches!(conn.schemas(), Err(DriverError::Closed)));
    }

    #[test]
    fn test_scripted_query_cursor() {
        let driver = MemoryDriver::new(MemoryDatabase::new().script_query(
            "select 1",
            vec![ColumnDesc::new("one", TypeCode::Integer)],
            vec![vec![Value::Integer(1)]],
        ));
        let mut conn = driver.connect("memory://local", "u", "p").unwrap();
        match conn.execute("select 1", &[]).unwrap() {
            StatementOutcome::Rows(mut cursor) => {
                assert_eq!(cursor.columns().len(), 1);
                assert_eq!(cursor.next_row().unwrap(), Some(vec![Value::Integer(1)]));
                assert_eq!(cursor.next_row().unwrap(), None);
            }
            StatementOutcome::Update(_) => panic!("expected rows"),
        }
    }
}
