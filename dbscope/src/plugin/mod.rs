// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Dialect plugins
//!
//! A plugin contributes vendor-specific node kinds to the generic structure
//! tree at two fixed extension points: catalog level and schema level. The
//! generic loaders consult the [`PluginRegistry`] keyed by the connection's
//! resolved dialect; a dialect with no registered plugin contributes nothing,
//! and that is not an error.

mod mysql;
mod oracle;

pub use mysql::MySqlPlugin;
pub use oracle::OraclePlugin;

use crate::dialect::Dialect;
use crate::driver::{StatementOutcome, Value};
use crate::registry::RegistryObject;
use crate::tree::{LeafNode, NodeBase, NodeContext, StructureNode};
use std::sync::Arc;

/// Factory for vendor-specific tree nodes
pub trait DialectPlugin: Send + Sync {
    /// The dialect this plugin applies to
    fn dialect(&self) -> Dialect;

    /// Extra children for a catalog node
    fn catalog_children(&self, catalog: &str, ctx: &NodeContext) -> Vec<Arc<dyn StructureNode>> {
        let _ = (catalog, ctx);
        Vec::new()
    }

    /// Extra children for a schema node
    fn schema_children(
        &self,
        catalog: Option<&str>,
        schema: &str,
        ctx: &NodeContext,
    ) -> Vec<Arc<dyn StructureNode>> {
        let _ = (catalog, schema, ctx);
        Vec::new()
    }
}

/// Registered plugins, consulted by dialect
pub struct PluginRegistry {
    plugins: Vec<Box<dyn DialectPlugin>>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PluginRegistry {
    /// Registry with every built-in vendor plugin
    pub fn builtin() -> Self {
        Self {
            plugins: vec![Box::new(MySqlPlugin), Box::new(OraclePlugin)],
        }
    }

    pub(crate) fn catalog_children(
        &self,
        dialect: Dialect,
        catalog: &str,
        ctx: &NodeContext,
    ) -> Vec<Arc<dyn StructureNode>> {
        self.plugins
            .iter()
            .filter(|p| p.dialect() == dialect)
            .flat_map(|p| p.catalog_children(catalog, ctx))
            .collect()
    }

    pub(crate) fn schema_children(
        &self,
        dialect: Dialect,
        catalog: Option<&str>,
        schema: &str,
        ctx: &NodeContext,
    ) -> Vec<Arc<dyn StructureNode>> {
        self.plugins
            .iter()
            .filter(|p| p.dialect() == dialect)
            .flat_map(|p| p.schema_children(catalog, schema, ctx))
            .collect()
    }
}

/// Group node whose children come from one direct vendor query
///
/// Covers every built-in vendor group: the statement yields one object name
/// per row (first column), each becoming a leaf child. Ordering is whatever
/// the statement imposes - the built-in vendor queries sort alphabetically.
pub(crate) struct SqlObjectGroupNode {
    base: NodeBase,
    label: String,
    kind_tag: String,
    child_kind: String,
    child_class: String,
    statement: String,
    params: Vec<Value>,
}

impl SqlObjectGroupNode {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        ctx: NodeContext,
        label: &str,
        kind_tag: &str,
        child_kind: &str,
        child_class: &str,
        statement: &str,
        params: Vec<Value>,
    ) -> Arc<dyn StructureNode> {
        let node = Arc::new(Self {
            base: NodeBase::new(ctx),
            label: label.to_string(),
            kind_tag: kind_tag.to_string(),
            child_kind: child_kind.to_string(),
            child_class: child_class.to_string(),
            statement: statement.to_string(),
            params,
        });
        let registry = &node.base.ctx().registry;
        registry.bind(node.base.id(), RegistryObject::Node(node.clone()));
        node
    }
}

impl StructureNode for SqlObjectGroupNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn name(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> &str {
        &self.kind_tag
    }

    fn display_class(&self) -> &str {
        "objs"
    }

    fn is_leaf(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<Arc<dyn StructureNode>> {
        self.base.ensure_loaded(&self.kind_tag, |ctx| {
            let outcome = ctx.handle.execute(&self.statement, &self.params)?;
            let mut children: Vec<Arc<dyn StructureNode>> = Vec::new();
            if let StatementOutcome::Rows(mut cursor) = outcome {
                while let Some(row) = cursor.next_row()? {
                    if let Some(name) = row.first().and_then(|v| v.as_text()) {
                        children.push(LeafNode::create(
                            &ctx.registry,
                            name,
                            self.child_kind.clone(),
                            self.child_class.clone(),
                            None,
                        ));
                    }
                }
            }
            Ok(children)
        })
    }

    fn refresh(&self) {
        self.base.refresh();
    }

    fn is_loaded(&self) -> bool {
        self.base.is_loaded()
    }
}
