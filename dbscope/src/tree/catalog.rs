// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog node

use super::{NodeBase, NodeContext, SchemaNode, StructureNode, TableTypeNode};
use crate::registry::RegistryObject;
use std::sync::Arc;

/// One catalog of the connected database
///
/// Children are schemas (or table-type groups when the product has no schema
/// level), followed by whatever the dialect's plugin contributes at the
/// catalog extension point.
pub struct CatalogNode {
    base: NodeBase,
    name: String,
}

impl CatalogNode {
    pub(crate) fn create(ctx: NodeContext, name: String) -> Arc<Self> {
        let node = Arc::new(Self {
            base: NodeBase::new(ctx),
            name,
        });
        let registry = &node.base.ctx().registry;
        registry.bind(node.base.id(), RegistryObject::Node(node.clone()));
        node
    }
}

impl StructureNode for CatalogNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "catalog"
    }

    fn display_class(&self) -> &str {
        "catalog"
    }

    fn is_leaf(&self) -> bool {
        false
    }

    fn qualified_name(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn children(&self) -> Vec<Arc<dyn StructureNode>> {
        self.base.ensure_loaded("catalog", |ctx| {
            let meta = ctx.handle.meta();
            let mut children: Vec<Arc<dyn StructureNode>> = Vec::new();

            if meta.supports_schemas()? {
                for schema in meta.schemas()? {
                    children.push(SchemaNode::create(
                        ctx.clone(),
                        Some(self.name.clone()),
                        schema,
                    ));
                }
            } else {
                for table_type in meta.table_types()? {
                    children.push(TableTypeNode::create(
                        ctx.clone(),
                        Some(self.name.clone()),
                        None,
                        table_type,
                    ));
                }
            }

            // Vendor kinds are appended after the generic children; a dialect
            // with no registered plugin contributes nothing.
            children.extend(
                ctx.plugins
                    .catalog_children(ctx.handle.dialect(), &self.name, ctx),
            );
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
