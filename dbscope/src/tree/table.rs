// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Table-type group and table nodes

use super::{LeafNode, NodeBase, NodeContext, StructureNode};
use crate::meta::TableInfo;
use crate::registry::RegistryObject;
use std::sync::Arc;

/// Group of all tables of one type ("TABLE", "VIEW", "SYSTEM TABLE", ...)
pub struct TableTypeNode {
    base: NodeBase,
    catalog: Option<String>,
    schema: Option<String>,
    table_type: String,
    kind_tag: String,
}

impl TableTypeNode {
    pub(crate) fn create(
        ctx: NodeContext,
        catalog: Option<String>,
        schema: Option<String>,
        table_type: String,
    ) -> Arc<Self> {
        let kind_tag = format!("{}_group", tag_for(&table_type));
        let node = Arc::new(Self {
            base: NodeBase::new(ctx),
            catalog,
            schema,
            table_type,
            kind_tag,
        });
        let registry = &node.base.ctx().registry;
        registry.bind(node.base.id(), RegistryObject::Node(node.clone()));
        node
    }
}

impl StructureNode for TableTypeNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn name(&self) -> &str {
        &self.table_type
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
        self.base.ensure_loaded("table_type", |ctx| {
            let meta = ctx.handle.meta();
            let types = vec![self.table_type.clone()];
            let mut children: Vec<Arc<dyn StructureNode>> = Vec::new();
            // Driver order is kept; the tree imposes no ordering of its own.
            for table in meta.tables(self.catalog.as_deref(), self.schema.as_deref(), &types)? {
                let qname = meta.qualified_table_name(&table).ok();
                children.push(TableNode::create(ctx.clone(), table, qname));
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

/// One table or view; children are its columns, keys and indexes
pub struct TableNode {
    base: NodeBase,
    info: TableInfo,
    kind_tag: String,
    qualified_name: Option<String>,
}

impl TableNode {
    pub(crate) fn create(
        ctx: NodeContext,
        info: TableInfo,
        qualified_name: Option<String>,
    ) -> Arc<Self> {
        let kind_tag = tag_for(&info.table_type);
        let node = Arc::new(Self {
            base: NodeBase::new(ctx),
            info,
            kind_tag,
            qualified_name,
        });
        let registry = &node.base.ctx().registry;
        registry.bind(node.base.id(), RegistryObject::Node(node.clone()));
        node
    }
}

impl StructureNode for TableNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn name(&self) -> &str {
        &self.info.name
    }

    fn kind(&self) -> &str {
        &self.kind_tag
    }

    fn display_class(&self) -> &str {
        "table"
    }

    fn is_leaf(&self) -> bool {
        false
    }

    fn qualified_name(&self) -> Option<String> {
        self.qualified_name.clone()
    }

    fn children(&self) -> Vec<Arc<dyn StructureNode>> {
        self.base.ensure_loaded("table", |ctx| {
            let meta = ctx.handle.meta();
            let mut children: Vec<Arc<dyn StructureNode>> = Vec::new();

            for column in meta.columns(&self.info)? {
                let qname = self
                    .qualified_name
                    .as_ref()
                    .map(|q| format!("{}.{}", q, column.name));
                children.push(LeafNode::create(
                    &ctx.registry,
                    column.name.clone(),
                    "column",
                    "column",
                    qname,
                ));
            }

            let mut pk_names: Vec<String> = Vec::new();
            for pk in meta.primary_keys(&self.info)? {
                let name = pk.pk_name.unwrap_or_else(|| "PRIMARY".to_string());
                if !pk_names.contains(&name) {
                    pk_names.push(name.clone());
                    children.push(LeafNode::create(
                        &ctx.registry,
                        name,
                        "primary_key",
                        "key",
                        None,
                    ));
                }
            }

            for fk in meta.imported_keys(&self.info)? {
                let name = fk.fk_name.unwrap_or_else(|| "(unnamed)".to_string());
                children.push(LeafNode::create(
                    &ctx.registry,
                    name,
                    "foreign_key",
                    "key",
                    None,
                ));
            }

            let mut index_names: Vec<String> = Vec::new();
            for index in meta.indexes(&self.info)? {
                if !index_names.contains(&index.index_name) {
                    index_names.push(index.index_name.clone());
                    children.push(LeafNode::create(
                        &ctx.registry,
                        index.index_name,
                        "index",
                        "index",
                        None,
                    ));
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

/// Lowercase, underscore-joined taxonomy tag for a driver table type
fn tag_for(table_type: &str) -> String {
    table_type.trim().to_lowercase().replace(' ', "_")
}
