// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Engine error types
//!
//! The taxonomy the dispatch layer sees: connection failures, query
//! failures, and the distinct "expired/not found" condition for identifiers
//! that no longer resolve - typically a client addressing a session that
//! already ended. None of these are fatal to the process.

use crate::exec::ExecError;
use thiserror::Error;

/// Errors surfaced by the browse coordinator
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Expired or unknown identifier: {0}")]
    Expired(String),

    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl EngineError {
    pub(crate) fn expired(id: &str) -> Self {
        EngineError::Expired(id.to_string())
    }

    /// True when the error only means a stale identifier, not a failure
    pub fn is_expired(&self) -> bool {
        matches!(self, EngineError::Expired(_))
    }
}

impl From<ExecError> for EngineError {
    fn from(error: ExecError) -> Self {
        EngineError::Query(error.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
