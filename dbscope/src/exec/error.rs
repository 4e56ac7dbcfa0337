// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Execution error types

use crate::driver::DriverError;
use thiserror::Error;

/// Query execution errors
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    #[error("Query failed: {0}")]
    Query(String),
}

impl From<DriverError> for ExecError {
    fn from(error: DriverError) -> Self {
        ExecError::Query(error.to_string())
    }
}

pub type ExecResult<T> = Result<T, ExecError>;
