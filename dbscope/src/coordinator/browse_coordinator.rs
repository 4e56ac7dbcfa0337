// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Browse Coordinator - orchestration for one browsing session
//!
//! This is the API the dispatch layer talks to. It owns the session's
//! identifier registry, its connection handles, the root of each connection's
//! structure tree, and every open query executor. All ids it accepts and
//! returns are registry ids, meaningful only within this session.

use super::config::EngineConfig;
use super::error::{EngineError, EngineResult};
use crate::connection::ConnectionHandle;
use crate::dialect::DialectRegistry;
use crate::driver::{DatabaseDriver, DriverError};
use crate::exec::{QueryExecutor, QueryPage};
use crate::plugin::PluginRegistry;
use crate::registry::{RegistryObject, SessionRegistry};
use crate::tree::{summarize, DatabaseNode, NodeContext, NodeSummary, StructureNode};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Static facts about one live connection
///
/// Facts a driver cannot report come back as `None` rather than failing the
/// whole call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub product_name: Option<String>,
    pub product_version: Option<String>,
    pub driver_name: Option<String>,
    pub user_name: Option<String>,
    pub url: Option<String>,
    pub dialect: String,
    pub auto_commit: bool,
    pub live: bool,
    pub connected_at: DateTime<Utc>,
    pub identifier_quote: Option<String>,
    pub catalog_term: Option<String>,
    pub schema_term: Option<String>,
    pub catalog_separator: Option<String>,
    pub supports_catalogs: Option<bool>,
    pub supports_schemas: Option<bool>,
    pub supports_stored_procedures: Option<bool>,
    pub supports_savepoints: Option<bool>,
}

/// Entry point for one browsing session
///
/// Each coordinator owns a disjoint registry; tearing the session down
/// (`close_session`, or drop) clears it and closes every connection, after
/// which all previously issued ids resolve to [`EngineError::Expired`].
pub struct BrowseCoordinator {
    session_id: String,
    created_at: DateTime<Utc>,
    config: EngineConfig,
    registry: Arc<SessionRegistry>,
    dialects: DialectRegistry,
    plugins: Arc<PluginRegistry>,
    /// Connection id -> root node id, for `get_root` and teardown
    roots: RwLock<HashMap<String, String>>,
}

impl Default for BrowseCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowseCoordinator {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        log::info!("browse session {} created", session_id);
        Self {
            session_id,
            created_at: Utc::now(),
            config,
            registry: Arc::new(SessionRegistry::new()),
            dialects: DialectRegistry::builtin(),
            plugins: Arc::new(PluginRegistry::builtin()),
            roots: RwLock::new(HashMap::new()),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Connections ===

    /// Open a connection and build the root of its structure tree
    ///
    /// Returns the registry id of the new connection handle. The driver
    /// reference and URL come from the caller's stored configuration records.
    pub fn login(
        &self,
        driver: &dyn DatabaseDriver,
        url: &str,
        user: &str,
        password: &str,
        auto_commit: bool,
    ) -> EngineResult<String> {
        let handle =
            ConnectionHandle::open(driver, url, user, password, auto_commit, &self.dialects)
                .map_err(connection_error)?;
        let handle = Arc::new(handle);

        let connection_id = self
            .registry
            .put(RegistryObject::Connection(handle.clone()));

        let name = handle
            .meta()
            .product_name()
            .unwrap_or_else(|_| "database".to_string());
        let ctx = NodeContext {
            registry: self.registry.clone(),
            handle,
            plugins: self.plugins.clone(),
        };
        let root = DatabaseNode::create(ctx, name);
        self.roots
            .write()
            .insert(connection_id.clone(), root.id().to_string());

        log::info!(
            "session {}: connection {} established (autocommit={})",
            self.session_id,
            connection_id,
            auto_commit
        );
        Ok(connection_id)
    }

    /// Static facts about a connection, served from the metadata façade
    pub fn connection_info(&self, connection_id: &str) -> EngineResult<ConnectionInfo> {
        let handle = self.connection(connection_id)?;
        let meta = handle.meta();
        Ok(ConnectionInfo {
            product_name: meta.product_name().ok(),
            product_version: meta.product_version().ok(),
            driver_name: meta.driver_name().ok(),
            user_name: meta.user_name().ok(),
            url: meta.url().ok(),
            dialect: handle.dialect().name().to_string(),
            auto_commit: handle.auto_commit(),
            live: !handle.is_closed(),
            connected_at: handle.created_at(),
            identifier_quote: meta.identifier_quote_string().ok(),
            catalog_term: meta.catalog_term().ok(),
            schema_term: meta.schema_term().ok(),
            catalog_separator: meta.catalog_separator().ok(),
            supports_catalogs: meta.supports_catalogs().ok(),
            supports_schemas: meta.supports_schemas().ok(),
            supports_stored_procedures: meta.supports_stored_procedures().ok(),
            supports_savepoints: meta.supports_savepoints().ok(),
        })
    }

    /// Drop every fact the metadata façade cached for a connection
    ///
    /// For when a session's underlying settings (e.g. active catalog) change
    /// out from under the cache.
    pub fn clear_metadata_cache(&self, connection_id: &str) -> EngineResult<()> {
        let handle = self.connection(connection_id)?;
        handle.meta().clear_cache();
        Ok(())
    }

    pub fn commit(&self, connection_id: &str) -> EngineResult<()> {
        self.connection(connection_id)?
            .commit()
            .map_err(connection_error)
    }

    pub fn rollback(&self, connection_id: &str) -> EngineResult<()> {
        self.connection(connection_id)?
            .rollback()
            .map_err(connection_error)
    }

    /// Cheap liveness probe for a connection
    pub fn ping(&self, connection_id: &str) -> EngineResult<()> {
        self.connection(connection_id)?
            .ping()
            .map_err(connection_error)
    }

    /// Close a connection and forget its tree root
    pub fn disconnect(&self, connection_id: &str) -> EngineResult<()> {
        let handle = match self.registry.remove(connection_id) {
            Some(RegistryObject::Connection(handle)) => handle,
            _ => return Err(EngineError::expired(connection_id)),
        };
        self.roots.write().remove(connection_id);
        log::info!(
            "session {}: connection {} disconnected",
            self.session_id,
            connection_id
        );
        handle.close().map_err(connection_error)
    }

    // === Structure tree ===

    /// Root node of one connection's structure tree
    pub fn get_root(&self, connection_id: &str) -> EngineResult<NodeSummary> {
        let root_id = self
            .roots
            .read()
            .get(connection_id)
            .cloned()
            .ok_or_else(|| EngineError::expired(connection_id))?;
        let node = self.node(&root_id)?;
        Ok(summarize(node.as_ref()))
    }

    /// Children of a node, loading them on first access
    pub fn get_children(&self, node_id: &str) -> EngineResult<Vec<NodeSummary>> {
        let node = self.node(node_id)?;
        Ok(node
            .children()
            .iter()
            .map(|child| summarize(child.as_ref()))
            .collect())
    }

    /// Drop a node's cached children; the next access loads fresh
    pub fn refresh(&self, node_id: &str) -> EngineResult<()> {
        let node = self.node(node_id)?;
        node.refresh();
        Ok(())
    }

    // === Queries ===

    /// Execute a statement and return its first page
    ///
    /// `page_size` and `hard_row_cap` default from the session config when
    /// not given. The executor stays registered for `fetch_more`, `rerun` and
    /// `close_executor` until closed or the session ends.
    pub fn run_query(
        &self,
        connection_id: &str,
        statement: &str,
        page_size: Option<usize>,
        hard_row_cap: Option<usize>,
    ) -> EngineResult<QueryPage> {
        let handle = self.connection(connection_id)?;
        let executor_id = self.registry.next_id();
        let mut executor = QueryExecutor::new(
            executor_id.clone(),
            handle,
            statement.to_string(),
            page_size.unwrap_or(self.config.default_page_size),
            hard_row_cap.unwrap_or(self.config.default_hard_row_cap),
        );
        // Register only after a successful run; a failed statement leaves no
        // half-open executor behind.
        let page = executor.run()?;
        self.registry.bind(
            &executor_id,
            RegistryObject::Executor(Arc::new(Mutex::new(executor))),
        );
        Ok(page)
    }

    /// Read the next page from an open executor
    pub fn fetch_more(
        &self,
        executor_id: &str,
        want_all: bool,
    ) -> EngineResult<Vec<Vec<crate::driver::Value>>> {
        let executor = self.executor(executor_id)?;
        let mut executor = executor.lock();
        let rows = executor.fetch_more(want_all)?;
        if executor.is_drained() {
            log::debug!("executor {} drained", executor_id);
        }
        Ok(rows)
    }

    /// Close an executor and expire its identifier
    pub fn close_executor(&self, executor_id: &str) -> EngineResult<()> {
        match self.registry.remove(executor_id) {
            Some(RegistryObject::Executor(executor)) => {
                executor.lock().close();
                Ok(())
            }
            _ => Err(EngineError::expired(executor_id)),
        }
    }

    /// Re-execute an executor's statement under the same identifier
    pub fn rerun(&self, executor_id: &str) -> EngineResult<QueryPage> {
        let executor = self.executor(executor_id)?;
        let mut executor = executor.lock();
        log::debug!("rerunning executor {}: {}", executor_id, executor.statement());
        Ok(executor.rerun()?)
    }

    // === Session lifecycle ===

    /// Tear the session down: close every connection, clear the registry
    ///
    /// Safe to call more than once. Afterwards every previously issued id
    /// resolves to [`EngineError::Expired`].
    pub fn close_session(&self) {
        let connection_ids: Vec<String> = self.roots.write().drain().map(|(id, _)| id).collect();
        for connection_id in connection_ids {
            if let Some(RegistryObject::Connection(handle)) = self.registry.get(&connection_id) {
                if let Err(e) = handle.close() {
                    log::warn!(
                        "session {}: closing connection {} failed: {}",
                        self.session_id,
                        connection_id,
                        e
                    );
                }
            }
        }
        let live = self.registry.len();
        self.registry.clear();
        log::info!(
            "browse session {} closed ({} objects released)",
            self.session_id,
            live
        );
    }

    // === Lookups ===

    fn connection(&self, id: &str) -> EngineResult<Arc<ConnectionHandle>> {
        match self.registry.get(id) {
            Some(RegistryObject::Connection(handle)) => Ok(handle),
            _ => Err(EngineError::expired(id)),
        }
    }

    fn node(&self, id: &str) -> EngineResult<Arc<dyn StructureNode>> {
        match self.registry.get(id) {
            Some(RegistryObject::Node(node)) => Ok(node),
            _ => Err(EngineError::expired(id)),
        }
    }

    fn executor(&self, id: &str) -> EngineResult<Arc<Mutex<QueryExecutor>>> {
        match self.registry.get(id) {
            Some(RegistryObject::Executor(executor)) => Ok(executor),
            _ => Err(EngineError::expired(id)),
        }
    }
}

impl Drop for BrowseCoordinator {
    fn drop(&mut self) {
        self.close_session();
    }
}

fn connection_error(error: DriverError) -> EngineError {
    EngineError::Connection(error.to_string())
}
