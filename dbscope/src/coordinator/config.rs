// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Engine configuration

use serde::{Deserialize, Serialize};

/// Tunables for one browsing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rows per page when a query request names no page size
    pub default_page_size: usize,
    /// Row bound for "fetch all" requests when none is given
    pub default_hard_row_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page_size: 100,
            default_hard_row_cap: 5_000,
        }
    }
}

impl EngineConfig {
    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size.max(1);
        self
    }

    pub fn with_default_hard_row_cap(mut self, cap: usize) -> Self {
        self.default_hard_row_cap = cap.max(1);
        self
    }
}
