// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Database driver traits
//!
//! This module defines the connectivity seam between the browsing engine and
//! an actual database product. All drivers must implement these traits to
//! provide a consistent interface: statement execution with row cursors, and
//! the raw introspection surface the metadata façade normalizes.

pub mod memory;
mod types;

pub use types::{
    ColumnDesc, RawColumnRow, RawForeignKeyRow, RawIndexRow, RawPrimaryKeyRow, RawProcedureRow,
    RawTableRow, RawTypeInfoRow, TypeCode, Value,
};

use thiserror::Error;

/// Errors raised at the driver boundary
#[derive(Error, Debug, Clone)]
pub enum DriverError {
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Statement failed: {0}")]
    Statement(String),

    #[error("Introspection failed: {0}")]
    Introspection(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Connection is closed")]
    Closed,

    #[error("Not supported: {0}")]
    NotSupported(String),
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Outcome of executing one statement
///
/// Mirrors the two shapes a statement can take: a result set served through a
/// cursor, or an update count for statements that produce no rows.
pub enum StatementOutcome {
    Rows(Box<dyn RowCursor>),
    Update(u64),
}

/// Server-side position within an open result set
///
/// A cursor owns its result data (or a handle to it) independently of the
/// connection lock, so pages can be read across separate requests. Dropping a
/// cursor releases it.
pub trait RowCursor: Send {
    /// Column descriptors for the result set, in select order
    fn columns(&self) -> &[ColumnDesc];

    /// Read the next row, or `None` when the result set is exhausted
    fn next_row(&mut self) -> DriverResult<Option<Vec<Value>>>;
}

/// A resolvable database driver
///
/// The dispatch-layer collaborator resolves a driver reference from its stored
/// configuration records and hands it to `login`.
pub trait DatabaseDriver: Send + Sync {
    /// Short driver identifier (for logs and error messages)
    fn name(&self) -> &str;

    /// Open a new connection
    fn connect(
        &self,
        url: &str,
        user: &str,
        password: &str,
    ) -> DriverResult<Box<dyn DriverConnection>>;
}

/// One live database connection
///
/// Not safe for concurrent use; the engine serializes every call through one
/// exclusive lock per connection handle. Introspection calls return raw,
/// uncorrected driver output - normalization and caching are the metadata
/// façade's job.
pub trait DriverConnection: Send {
    // === Statements & transactions ===

    /// Execute one statement, with positional parameters
    fn execute(&mut self, statement: &str, params: &[Value]) -> DriverResult<StatementOutcome>;

    fn commit(&mut self) -> DriverResult<()>;

    fn rollback(&mut self) -> DriverResult<()>;

    fn set_auto_commit(&mut self, enabled: bool) -> DriverResult<()>;

    /// Close the connection; further calls fail with [`DriverError::Closed`]
    fn close(&mut self) -> DriverResult<()>;

    fn is_closed(&self) -> bool;

    // === Introspection: connection facts ===

    fn product_name(&self) -> DriverResult<String>;

    fn product_version(&self) -> DriverResult<String>;

    fn driver_name(&self) -> DriverResult<String>;

    fn user_name(&self) -> DriverResult<String>;

    fn url(&self) -> DriverResult<String>;

    /// Identifier quote string; drivers may return `None` for "no quoting"
    fn identifier_quote(&self) -> DriverResult<Option<String>>;

    fn catalog_term(&self) -> DriverResult<String>;

    fn schema_term(&self) -> DriverResult<String>;

    fn procedure_term(&self) -> DriverResult<String>;

    fn catalog_separator(&self) -> DriverResult<String>;

    /// Vendor keyword list as one comma-separated string
    fn sql_keywords(&self) -> DriverResult<String>;

    fn numeric_functions(&self) -> DriverResult<String>;

    fn string_functions(&self) -> DriverResult<String>;

    fn system_functions(&self) -> DriverResult<String>;

    fn time_date_functions(&self) -> DriverResult<String>;

    // === Introspection: capability flags ===

    fn supports_schemas_in_data_manipulation(&self) -> DriverResult<bool>;

    fn supports_schemas_in_table_definitions(&self) -> DriverResult<bool>;

    fn supports_catalogs_in_table_definitions(&self) -> DriverResult<bool>;

    fn supports_catalogs_in_data_manipulation(&self) -> DriverResult<bool>;

    fn supports_catalogs_in_procedure_calls(&self) -> DriverResult<bool>;

    fn supports_stored_procedures(&self) -> DriverResult<bool>;

    fn supports_savepoints(&self) -> DriverResult<bool>;

    // === Introspection: listings ===

    fn catalogs(&self) -> DriverResult<Vec<String>>;

    fn schemas(&self) -> DriverResult<Vec<String>>;

    fn table_types(&self) -> DriverResult<Vec<String>>;

    /// Tables matching the given catalog/schema and type filter; an empty
    /// `types` slice matches every type
    fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        types: &[String],
    ) -> DriverResult<Vec<RawTableRow>>;

    fn columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> DriverResult<Vec<RawColumnRow>>;

    fn primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> DriverResult<Vec<RawPrimaryKeyRow>>;

    /// Foreign keys referencing other tables from the given table; one row
    /// per participating column, as the driver reports them
    fn imported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> DriverResult<Vec<RawForeignKeyRow>>;

    /// Foreign keys in other tables referencing the given table
    fn exported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> DriverResult<Vec<RawForeignKeyRow>>;

    fn indexes(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> DriverResult<Vec<RawIndexRow>>;

    fn procedures(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> DriverResult<Vec<RawProcedureRow>>;

    fn type_info(&self) -> DriverResult<Vec<RawTypeInfoRow>>;
}
