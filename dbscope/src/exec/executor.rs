// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query executor with server-side paging

use super::error::ExecResult;
use crate::connection::ConnectionHandle;
use crate::driver::{ColumnDesc, RowCursor, StatementOutcome, Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Horizontal alignment hint for one result column
///
/// Presentation metadata only; numeric column types render right-aligned,
/// everything else left-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
}

/// Client-facing metadata for one result column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub label: String,
    pub align: Alignment,
}

impl ColumnMeta {
    fn from_desc(desc: &ColumnDesc) -> Self {
        let align = if desc.type_code.is_numeric() {
            Alignment::Right
        } else {
            Alignment::Left
        };
        Self {
            label: desc.label.clone(),
            align,
        }
    }

    /// Synthetic column for statements that produce no result set
    fn update_count() -> Self {
        Self {
            label: "Update Count".to_string(),
            align: Alignment::Right,
        }
    }
}

/// One page of a query result, as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryPage {
    pub executor_id: String,
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Vec<Value>>,
}

/// Runs one statement and serves its result set in bounded windows
///
/// Registered in the session registry under `id` so the client can fetch more
/// rows, rerun, or close it in later requests. Not safe for concurrent use;
/// the registry stores it behind a mutex.
pub struct QueryExecutor {
    id: String,
    statement: String,
    page_size: usize,
    hard_row_cap: usize,
    handle: Arc<ConnectionHandle>,
    cursor: Option<Box<dyn RowCursor>>,
    columns: Vec<ColumnMeta>,
    drained: bool,
}

impl QueryExecutor {
    pub fn new(
        id: String,
        handle: Arc<ConnectionHandle>,
        statement: String,
        page_size: usize,
        hard_row_cap: usize,
    ) -> Self {
        Self {
            id,
            statement,
            page_size: page_size.max(1),
            hard_row_cap: hard_row_cap.max(1),
            handle,
            cursor: None,
            columns: Vec::new(),
            drained: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// True once the cursor has been fully consumed or explicitly closed
    pub fn is_drained(&self) -> bool {
        self.drained
    }

    /// Execute the statement and read the first page
    ///
    /// For a result set, column metadata is captured and up to `page_size`
    /// rows are read; a short first page closes the cursor immediately. A
    /// statement with no result set yields one synthetic update-count row and
    /// drains at once.
    pub fn run(&mut self) -> ExecResult<QueryPage> {
        let outcome = self.handle.execute(&self.statement, &[])?;
        match outcome {
            StatementOutcome::Rows(cursor) => {
                self.columns = cursor.columns().iter().map(ColumnMeta::from_desc).collect();
                self.cursor = Some(cursor);
                self.drained = false;
                let rows = self.read_rows(self.page_size)?;
                if rows.len() < self.page_size {
                    self.finish();
                }
                Ok(self.page(rows))
            }
            StatementOutcome::Update(count) => {
                self.columns = vec![ColumnMeta::update_count()];
                self.finish();
                let rows = vec![vec![Value::Integer(count as i64)]];
                Ok(self.page(rows))
            }
        }
    }

    /// Read the next window of rows; a no-op once drained
    ///
    /// Reads up to `page_size` rows, or up to `hard_row_cap` when `want_all`
    /// is set. Drains when the cursor is exhausted or the cap is hit, closing
    /// the cursor in either case.
    pub fn fetch_more(&mut self, want_all: bool) -> ExecResult<Vec<Vec<Value>>> {
        if self.drained {
            return Ok(Vec::new());
        }
        let limit = if want_all {
            self.hard_row_cap
        } else {
            self.page_size
        };
        let rows = self.read_rows(limit)?;
        if want_all || rows.len() < limit {
            self.finish();
        }
        Ok(rows)
    }

    /// Release the cursor immediately; idempotent
    pub fn close(&mut self) {
        self.finish();
    }

    /// Close and execute again under the same identifier
    ///
    /// Replaces all paging state; the first page of the fresh run is
    /// returned.
    pub fn rerun(&mut self) -> ExecResult<QueryPage> {
        self.close();
        self.columns.clear();
        self.run()
    }

    fn page(&self, rows: Vec<Vec<Value>>) -> QueryPage {
        QueryPage {
            executor_id: self.id.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }

    fn finish(&mut self) {
        self.drained = true;
        // Dropping the cursor releases it
        self.cursor = None;
    }

    fn read_rows(&mut self, limit: usize) -> ExecResult<Vec<Vec<Value>>> {
        let mut rows = Vec::new();
        let mut failure = None;
        if let Some(cursor) = self.cursor.as_mut() {
            while rows.len() < limit {
                match cursor.next_row() {
                    Ok(Some(row)) => rows.push(row),
                    Ok(None) => break,
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }
        }
        // A failing cursor must not stay half-open
        if let Some(e) = failure {
            self.finish();
            return Err(e.into());
        }
        Ok(rows)
    }
}
