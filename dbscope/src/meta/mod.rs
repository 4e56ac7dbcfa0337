// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Metadata façade
//!
//! Wraps the driver's introspection surface with a per-connection cache for
//! facts that cannot change during a session, and normalizes the vendor
//! inconsistencies the raw driver output carries.

mod cache;
mod types;

pub use cache::MetadataCache;
pub use types::{
    ColumnInfo, DataTypeInfo, ForeignKeyColumn, ForeignKeyInfo, IndexInfo, PrimaryKeyInfo,
    ProcedureInfo, ProcedureResultKind, TableInfo,
};
