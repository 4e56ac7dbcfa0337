// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session-scoped identifier registry
//!
//! Every server-held object a stateless client may address across requests
//! (connection handles, structure tree nodes, open query executors) is
//! registered here under an opaque string id. Each browsing session owns a
//! disjoint registry instance; ids from one session mean nothing in another.

use crate::connection::ConnectionHandle;
use crate::exec::QueryExecutor;
use crate::tree::StructureNode;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A registrable object
///
/// Tagged variants instead of downcasting: the registry knows the three kinds
/// of object the engine hands out ids for, and callers match on the kind they
/// expect.
#[derive(Clone)]
pub enum RegistryObject {
    Connection(Arc<ConnectionHandle>),
    Node(Arc<dyn StructureNode>),
    Executor(Arc<Mutex<QueryExecutor>>),
}

/// Registry of all live objects for one browsing session
///
/// Ids are sequential decimal strings from a per-session counter; uniqueness
/// holds only within this registry. Concurrent `get`/`put`/`remove` from
/// independent requests is supported; locking of any single registered object
/// is that object's own concern.
pub struct SessionRegistry {
    sequence: AtomicU64,
    entries: RwLock<HashMap<String, RegistryObject>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sequence: AtomicU64::new(0),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Allocate a fresh identifier without binding it yet
    ///
    /// Objects that must know their own id (nodes, executors) allocate first,
    /// then bind once constructed.
    pub fn next_id(&self) -> String {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        n.to_string()
    }

    /// Bind an object under a previously allocated id
    pub fn bind(&self, id: &str, object: RegistryObject) {
        self.entries.write().insert(id.to_string(), object);
        log::debug!("registry: bound id {}", id);
    }

    /// Allocate a fresh id and store the object under it
    pub fn put(&self, object: RegistryObject) -> String {
        let id = self.next_id();
        self.bind(&id, object);
        id
    }

    /// Look up an object; `None` means the id expired or never existed
    pub fn get(&self, id: &str) -> Option<RegistryObject> {
        self.entries.read().get(id).cloned()
    }

    /// Remove and return an object
    pub fn remove(&self, id: &str) -> Option<RegistryObject> {
        let removed = self.entries.write().remove(id);
        if removed.is_some() {
            log::debug!("registry: removed id {}", id);
        }
        removed
    }

    /// Remove everything; called at session teardown
    ///
    /// Executors are explicitly closed so their cursors release immediately
    /// rather than whenever the last reference drops.
    pub fn clear(&self) {
        let drained: Vec<(String, RegistryObject)> = self.entries.write().drain().collect();
        let count = drained.len();
        for (id, object) in drained {
            if let RegistryObject::Executor(executor) = object {
                executor.lock().close();
                log::debug!("registry: closed executor {} during clear", id);
            }
        }
        if count > 0 {
            log::info!("registry: cleared {} entries", count);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
