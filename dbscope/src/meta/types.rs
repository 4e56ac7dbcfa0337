// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Immutable metadata value records
//!
//! Produced by the façade from raw introspection rows; no lifecycle beyond
//! the call that produced them.

use crate::driver::{
    RawColumnRow, RawIndexRow, RawPrimaryKeyRow, RawProcedureRow, RawTableRow, RawTypeInfoRow,
    TypeCode,
};
use serde::{Deserialize, Serialize};

/// One table, view or other table-like object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub table_type: String,
    pub remarks: Option<String>,
}

impl TableInfo {
    pub(crate) fn from_raw(row: RawTableRow) -> Self {
        Self {
            catalog: row.catalog,
            schema: row.schema,
            name: row.name,
            table_type: row.table_type,
            remarks: row.remarks,
        }
    }
}

/// One column of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub table: String,
    pub name: String,
    pub type_code: TypeCode,
    pub type_name: String,
    pub size: u32,
    pub nullable: bool,
    pub remarks: Option<String>,
    pub ordinal: u32,
}

impl ColumnInfo {
    pub(crate) fn from_raw(row: RawColumnRow) -> Self {
        Self {
            table: row.table,
            name: row.name,
            type_code: row.type_code,
            type_name: row.type_name,
            size: row.size,
            nullable: row.nullable,
            remarks: row.remarks,
            ordinal: row.ordinal,
        }
    }
}

/// One primary-key column entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyInfo {
    pub table: String,
    pub column: String,
    pub key_seq: u32,
    pub pk_name: Option<String>,
}

impl PrimaryKeyInfo {
    pub(crate) fn from_raw(row: RawPrimaryKeyRow) -> Self {
        Self {
            table: row.table,
            column: row.column,
            key_seq: row.key_seq,
            pk_name: row.pk_name,
        }
    }
}

/// One column pair participating in a foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyColumn {
    pub fk_column: String,
    pub pk_column: String,
    pub key_seq: u32,
}

/// One foreign key, with its ordered participating columns
///
/// Drivers report one row per column; the façade merges rows sharing the same
/// key identity tuple into a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyInfo {
    pub fk_catalog: Option<String>,
    pub fk_schema: Option<String>,
    pub fk_table: String,
    pub fk_name: Option<String>,
    pub pk_catalog: Option<String>,
    pub pk_schema: Option<String>,
    pub pk_table: String,
    pub pk_name: Option<String>,
    pub update_rule: u32,
    pub delete_rule: u32,
    pub columns: Vec<ForeignKeyColumn>,
}

impl ForeignKeyInfo {
    /// Identity tuple used to merge multi-row driver output
    pub(crate) fn identity_key(&self) -> String {
        [
            self.fk_catalog.as_deref().unwrap_or(""),
            self.fk_schema.as_deref().unwrap_or(""),
            &self.fk_table,
            self.fk_name.as_deref().unwrap_or(""),
            self.pk_catalog.as_deref().unwrap_or(""),
            self.pk_schema.as_deref().unwrap_or(""),
            &self.pk_table,
            self.pk_name.as_deref().unwrap_or(""),
        ]
        .join("\u{1f}")
    }
}

/// One index column entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    pub table: String,
    pub index_name: String,
    pub column: String,
    pub unique: bool,
    pub ordinal: u32,
}

impl IndexInfo {
    pub(crate) fn from_raw(row: RawIndexRow) -> Self {
        Self {
            table: row.table,
            index_name: row.index_name,
            column: row.column,
            unique: row.unique,
            ordinal: row.ordinal,
        }
    }
}

/// Whether a stored procedure returns a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcedureResultKind {
    Unknown,
    NoResult,
    ReturnsResult,
}

/// One stored procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureInfo {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub remarks: Option<String>,
    pub result_kind: ProcedureResultKind,
}

impl ProcedureInfo {
    pub(crate) fn from_raw(row: RawProcedureRow) -> Self {
        let result_kind = match row.procedure_type {
            1 => ProcedureResultKind::NoResult,
            2 => ProcedureResultKind::ReturnsResult,
            _ => ProcedureResultKind::Unknown,
        };
        Self {
            catalog: row.catalog,
            schema: row.schema,
            name: row.name,
            remarks: row.remarks,
            result_kind,
        }
    }
}

/// One entry of the driver's type catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeInfo {
    pub type_name: String,
    pub type_code: TypeCode,
    pub precision: u32,
    pub literal_prefix: Option<String>,
    pub literal_suffix: Option<String>,
    pub create_params: Option<String>,
    pub nullable: bool,
    pub case_sensitive: bool,
    pub unsigned: bool,
    pub auto_increment: bool,
    pub local_type_name: Option<String>,
    pub minimum_scale: i32,
    pub maximum_scale: i32,
    pub radix: u32,
}

impl DataTypeInfo {
    pub(crate) fn from_raw(row: RawTypeInfoRow) -> Self {
        Self {
            type_name: row.type_name,
            type_code: row.type_code,
            precision: row.precision,
            literal_prefix: row.literal_prefix,
            literal_suffix: row.literal_suffix,
            create_params: row.create_params,
            nullable: row.nullable,
            case_sensitive: row.case_sensitive,
            unsigned: row.unsigned,
            auto_increment: row.auto_increment,
            local_type_name: row.local_type_name,
            minimum_scale: row.minimum_scale,
            maximum_scale: row.maximum_scale,
            radix: row.radix,
        }
    }
}
