// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Value and raw introspection row types shared across the driver seam

use serde::{Deserialize, Serialize};

/// A single cell value read from (or bound into) a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Render the value the way a browser grid would show it
    pub fn display(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Bytes(b) => format!("0x{}", hex(b)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Vendor-neutral column type taxonomy
///
/// A reduced form of the SQL type codes drivers report; only the distinctions
/// the engine acts on (numeric vs. everything else for alignment) are modeled
/// precisely, the rest collapse into broad families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCode {
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Float,
    Double,
    Decimal,
    Numeric,
    Char,
    Varchar,
    LongVarchar,
    Date,
    Time,
    Timestamp,
    Binary,
    Boolean,
    Other,
}

impl TypeCode {
    /// True for integral, floating-point and fixed-decimal types
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeCode::TinyInt
                | TypeCode::SmallInt
                | TypeCode::Integer
                | TypeCode::BigInt
                | TypeCode::Real
                | TypeCode::Float
                | TypeCode::Double
                | TypeCode::Decimal
                | TypeCode::Numeric
        )
    }
}

/// Descriptor for one result-set column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDesc {
    pub label: String,
    pub type_code: TypeCode,
}

impl ColumnDesc {
    pub fn new(label: impl Into<String>, type_code: TypeCode) -> Self {
        Self {
            label: label.into(),
            type_code,
        }
    }
}

/// One raw table row as reported by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTableRow {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub table_type: String,
    pub remarks: Option<String>,
}

/// One raw column row as reported by the driver
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumnRow {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: String,
    pub name: String,
    pub type_code: TypeCode,
    pub type_name: String,
    pub size: u32,
    pub nullable: bool,
    pub remarks: Option<String>,
    /// 1-based position within the table
    pub ordinal: u32,
}

/// One raw primary-key row (one per participating column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPrimaryKeyRow {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: String,
    pub column: String,
    /// 1-based position of the column within the key
    pub key_seq: u32,
    pub pk_name: Option<String>,
}

/// One raw foreign-key row (one per participating column pair)
///
/// Drivers report a multi-column key as several rows sharing the same key
/// identity; the metadata façade merges them back into one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawForeignKeyRow {
    pub pk_catalog: Option<String>,
    pub pk_schema: Option<String>,
    pub pk_table: String,
    pub pk_column: String,
    pub pk_name: Option<String>,
    pub fk_catalog: Option<String>,
    pub fk_schema: Option<String>,
    pub fk_table: String,
    pub fk_column: String,
    pub fk_name: Option<String>,
    /// 1-based position of the column pair within the key
    pub key_seq: u32,
    pub update_rule: u32,
    pub delete_rule: u32,
}

/// One raw index row (one per indexed column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIndexRow {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: String,
    pub index_name: String,
    pub column: String,
    pub unique: bool,
    /// 1-based position of the column within the index
    pub ordinal: u32,
}

/// One raw stored-procedure row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProcedureRow {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub remarks: Option<String>,
    /// Whether the procedure returns a result: 0 unknown, 1 no, 2 yes
    pub procedure_type: u32,
}

/// One raw type-descriptor row from the driver's type catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTypeInfoRow {
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
