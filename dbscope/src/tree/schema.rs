// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema node

use super::{NodeBase, NodeContext, ProcedureGroupNode, StructureNode, TableTypeNode};
use crate::registry::RegistryObject;
use std::sync::Arc;

/// One schema, optionally scoped to a catalog
pub struct SchemaNode {
    base: NodeBase,
    catalog: Option<String>,
    name: String,
}

impl SchemaNode {
    pub(crate) fn create(ctx: NodeContext, catalog: Option<String>, name: String) -> Arc<Self> {
        let node = Arc::new(Self {
            base: NodeBase::new(ctx),
            catalog,
            name,
        });
        let registry = &node.base.ctx().registry;
        registry.bind(node.base.id(), RegistryObject::Node(node.clone()));
        node
    }
}

impl StructureNode for SchemaNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "schema"
    }

    fn display_class(&self) -> &str {
        "schema"
    }

    fn is_leaf(&self) -> bool {
        false
    }

    fn qualified_name(&self) -> Option<String> {
        match &self.catalog {
            Some(catalog) => Some(format!("{}.{}", catalog, self.name)),
            None => Some(self.name.clone()),
        }
    }

    fn children(&self) -> Vec<Arc<dyn StructureNode>> {
        self.base.ensure_loaded("schema", |ctx| {
            let meta = ctx.handle.meta();
            let mut children: Vec<Arc<dyn StructureNode>> = Vec::new();

            for table_type in meta.table_types()? {
                children.push(TableTypeNode::create(
                    ctx.clone(),
                    self.catalog.clone(),
                    Some(self.name.clone()),
                    table_type,
                ));
            }

            if meta.supports_stored_procedures()? {
                let label = match meta.procedure_term() {
                    Ok(term) if !term.is_empty() => term,
                    _ => "procedure".to_string(),
                };
                children.push(ProcedureGroupNode::create(
                    ctx.clone(),
                    self.catalog.clone(),
                    Some(self.name.clone()),
                    label,
                ));
            }

            children.extend(ctx.plugins.schema_children(
                ctx.handle.dialect(),
                self.catalog.as_deref(),
                &self.name,
                ctx,
            ));
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
