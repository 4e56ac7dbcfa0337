// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Root node of one connection's structure tree

use super::{CatalogNode, NodeBase, NodeContext, SchemaNode, StructureNode, TableTypeNode};
use crate::registry::RegistryObject;
use std::sync::Arc;

/// Root of the tree for one connection
///
/// Depending on what the product supports, the first level is catalogs,
/// schemas, or table-type groups directly.
pub struct DatabaseNode {
    base: NodeBase,
    name: String,
}

impl DatabaseNode {
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

impl StructureNode for DatabaseNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "database"
    }

    fn display_class(&self) -> &str {
        "database"
    }

    fn is_leaf(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<Arc<dyn StructureNode>> {
        self.base.ensure_loaded("database", |ctx| {
            let meta = ctx.handle.meta();
            let mut children: Vec<Arc<dyn StructureNode>> = Vec::new();

            if meta.supports_catalogs()? {
                let catalogs = meta.catalogs()?;
                if !catalogs.is_empty() {
                    for catalog in catalogs {
                        children.push(CatalogNode::create(ctx.clone(), catalog));
                    }
                    return Ok(children);
                }
            }

            if meta.supports_schemas()? {
                for schema in meta.schemas()? {
                    children.push(SchemaNode::create(ctx.clone(), None, schema));
                }
                return Ok(children);
            }

            // Products with neither catalogs nor schemas expose their
            // table-type groups at the root.
            for table_type in meta.table_types()? {
                children.push(TableTypeNode::create(ctx.clone(), None, None, table_type));
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
