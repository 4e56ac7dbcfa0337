// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lazy structure tree over database objects
//!
//! Each node loads its children on demand through the metadata façade (or a
//! direct statement, for vendor kinds) and caches them until explicitly
//! refreshed. Loading is best-effort: an introspection failure leaves the
//! node with an empty child list instead of propagating, so a permissions
//! error browsing one subtree never aborts browsing of its siblings.

mod catalog;
mod database;
mod procedure;
mod schema;
mod table;

pub use catalog::CatalogNode;
pub use database::DatabaseNode;
pub use procedure::ProcedureGroupNode;
pub use schema::SchemaNode;
pub use table::{TableNode, TableTypeNode};

use crate::connection::ConnectionHandle;
use crate::driver::DriverResult;
use crate::plugin::PluginRegistry;
use crate::registry::{RegistryObject, SessionRegistry};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A node of the structure tree
///
/// Concrete kinds implement loading for their level of the containment
/// hierarchy; vendor-specific kinds come from plugin factories. Nodes are
/// shared through the session registry, so all state is interior.
pub trait StructureNode: Send + Sync {
    /// Registry identifier
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    /// Taxonomy tag, e.g. `"catalog"`, `"table"`, `"mysql_triggers"`
    fn kind(&self) -> &str;

    /// Presentation hint for the client
    fn display_class(&self) -> &str;

    fn is_leaf(&self) -> bool;

    fn qualified_name(&self) -> Option<String> {
        None
    }

    /// Children in load order; triggers a lazy load on first call
    fn children(&self) -> Vec<Arc<dyn StructureNode>>;

    /// Drop cached children; the next `children` call loads again
    fn refresh(&self);

    fn is_loaded(&self) -> bool;
}

/// Client-facing representation of one node
///
/// Serialization never exposes the live object, only these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub name: String,
    pub id: String,
    pub leaf: bool,
    pub kind: String,
    pub cls: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qname: Option<String>,
}

/// Serialize one node for the client
pub(crate) fn summarize(node: &dyn StructureNode) -> NodeSummary {
    NodeSummary {
        name: node.name().to_string(),
        id: node.id().to_string(),
        leaf: node.is_leaf(),
        kind: node.kind().to_string(),
        cls: node.display_class().to_string(),
        qname: node.qualified_name(),
    }
}

/// Shared context threaded through every node
///
/// The connection handle is shared, never owned; nodes must not close it.
#[derive(Clone)]
pub(crate) struct NodeContext {
    pub registry: Arc<SessionRegistry>,
    pub handle: Arc<ConnectionHandle>,
    pub plugins: Arc<PluginRegistry>,
}

struct NodeState {
    loaded: bool,
    children: Vec<Arc<dyn StructureNode>>,
}

/// Common identity and load state for non-leaf nodes
///
/// Rust composition in place of a base class: concrete kinds embed this and
/// delegate the Unloaded -> Loaded state machine to `ensure_loaded`.
pub(crate) struct NodeBase {
    id: String,
    ctx: NodeContext,
    state: RwLock<NodeState>,
}

impl NodeBase {
    /// Allocate a registry id for a node under construction
    pub fn new(ctx: NodeContext) -> Self {
        let id = ctx.registry.next_id();
        Self {
            id,
            ctx,
            state: RwLock::new(NodeState {
                loaded: false,
                children: Vec::new(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ctx(&self) -> &NodeContext {
        &self.ctx
    }

    /// Run the loader once and cache its children
    ///
    /// Idempotent until `refresh`. A loader error is logged and yields an
    /// empty (not absent) child list; the node still counts as loaded so the
    /// tree stays navigable without hammering a failing introspection call.
    pub fn ensure_loaded<F>(&self, kind: &str, loader: F) -> Vec<Arc<dyn StructureNode>>
    where
        F: FnOnce(&NodeContext) -> DriverResult<Vec<Arc<dyn StructureNode>>>,
    {
        {
            let state = self.state.read();
            if state.loaded {
                return state.children.clone();
            }
        }
        let mut state = self.state.write();
        if state.loaded {
            return state.children.clone();
        }
        match loader(&self.ctx) {
            Ok(children) => {
                state.children = children;
            }
            Err(e) => {
                log::warn!("load failed for {} node {}: {}", kind, self.id, e);
                state.children.clear();
            }
        }
        state.loaded = true;
        state.children.clone()
    }

    pub fn refresh(&self) {
        let mut state = self.state.write();
        state.loaded = false;
        state.children.clear();
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }
}

/// A leaf object (column, key, index, procedure, vendor object)
///
/// Leaves differ only in their tags, so one type covers them all; deep
/// subclassing for tag-only variation is exactly what the tree avoids.
pub(crate) struct LeafNode {
    id: String,
    name: String,
    kind: String,
    display_class: String,
    qualified_name: Option<String>,
}

impl LeafNode {
    /// Construct and register a leaf
    pub fn create(
        registry: &SessionRegistry,
        name: impl Into<String>,
        kind: impl Into<String>,
        display_class: impl Into<String>,
        qualified_name: Option<String>,
    ) -> Arc<dyn StructureNode> {
        let node: Arc<dyn StructureNode> = Arc::new(Self {
            id: registry.next_id(),
            name: name.into(),
            kind: kind.into(),
            display_class: display_class.into(),
            qualified_name,
        });
        registry.bind(node.id(), RegistryObject::Node(node.clone()));
        node
    }
}

impl StructureNode for LeafNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn display_class(&self) -> &str {
        &self.display_class
    }

    fn is_leaf(&self) -> bool {
        true
    }

    fn qualified_name(&self) -> Option<String> {
        self.qualified_name.clone()
    }

    fn children(&self) -> Vec<Arc<dyn StructureNode>> {
        Vec::new()
    }

    fn refresh(&self) {}

    fn is_loaded(&self) -> bool {
        true
    }
}

/// Unregistered leaf for registry unit tests
#[cfg(test)]
pub(crate) fn test_leaf(name: &str) -> Arc<dyn StructureNode> {
    Arc::new(LeafNode {
        id: format!("test-{}", name),
        name: name.to_string(),
        kind: "test".to_string(),
        display_class: "test".to_string(),
        qualified_name: None,
    })
}
