// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Paginated query execution
//!
//! A [`QueryExecutor`] runs one statement, keeps the server-side cursor open,
//! and serves bounded windows of rows back to the client across requests.

mod error;
mod executor;

pub use error::{ExecError, ExecResult};
pub use executor::{Alignment, ColumnMeta, QueryExecutor, QueryPage};
