// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Connection handle
//!
//! One live driver connection per successful login, shared by every node and
//! executor created under it. All use of the underlying connection -
//! statements, introspection, commit, rollback, close - is serialized through
//! one exclusive lock held for the duration of a single call; driver
//! connections are not safe for concurrent use.

use crate::dialect::{Dialect, DialectRegistry};
use crate::driver::{DatabaseDriver, DriverConnection, DriverResult, StatementOutcome, Value};
use crate::meta::MetadataCache;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// One live database connection plus its resolved dialect
///
/// Exclusively owned by the browsing session that created it; nodes and
/// executors share it and must never close it.
pub struct ConnectionHandle {
    conn: Arc<Mutex<Box<dyn DriverConnection>>>,
    dialect: Dialect,
    auto_commit: bool,
    meta: MetadataCache,
    created_at: DateTime<Utc>,
}

impl ConnectionHandle {
    /// Connect through the given driver and resolve the product's dialect
    pub fn open(
        driver: &dyn DatabaseDriver,
        url: &str,
        user: &str,
        password: &str,
        auto_commit: bool,
        dialects: &DialectRegistry,
    ) -> DriverResult<Self> {
        let mut conn = driver.connect(url, user, password)?;
        conn.set_auto_commit(auto_commit)?;

        // Product identity may legitimately be unavailable; resolution falls
        // back to the generic dialect rather than failing the login.
        let product_name = conn.product_name().ok();
        let product_version = conn.product_version().ok();
        let dialect = dialects.resolve(product_name.as_deref(), product_version.as_deref());
        log::info!(
            "connected via driver '{}' to product {:?}, dialect {}",
            driver.name(),
            product_name,
            dialect.name()
        );

        let conn = Arc::new(Mutex::new(conn));
        let meta = MetadataCache::new(conn.clone(), dialect);
        Ok(Self {
            conn,
            dialect,
            auto_commit,
            meta,
            created_at: Utc::now(),
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The metadata façade for this connection
    pub fn meta(&self) -> &MetadataCache {
        &self.meta
    }

    /// Execute one statement under the connection lock
    pub fn execute(&self, statement: &str, params: &[Value]) -> DriverResult<StatementOutcome> {
        self.conn.lock().execute(statement, params)
    }

    pub fn commit(&self) -> DriverResult<()> {
        self.conn.lock().commit()
    }

    pub fn rollback(&self) -> DriverResult<()> {
        self.conn.lock().rollback()
    }

    /// Cheap liveness probe
    pub fn ping(&self) -> DriverResult<()> {
        let conn = self.conn.lock();
        if conn.is_closed() {
            return Err(crate::driver::DriverError::Closed);
        }
        conn.user_name().map(|_| ())
    }

    /// Close the underlying connection; idempotent
    pub fn close(&self) -> DriverResult<()> {
        let mut conn = self.conn.lock();
        if conn.is_closed() {
            return Ok(());
        }
        conn.close()
    }

    pub fn is_closed(&self) -> bool {
        self.conn.lock().is_closed()
    }
}
