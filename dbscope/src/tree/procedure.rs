// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Stored-procedure group node

use super::{LeafNode, NodeBase, NodeContext, StructureNode};
use crate::registry::RegistryObject;
use std::sync::Arc;

/// Group of the stored procedures visible in one schema
///
/// Labeled with the vendor's own term for "procedure" as reported by the
/// metadata façade.
pub struct ProcedureGroupNode {
    base: NodeBase,
    catalog: Option<String>,
    schema: Option<String>,
    label: String,
}

impl ProcedureGroupNode {
    pub(crate) fn create(
        ctx: NodeContext,
        catalog: Option<String>,
        schema: Option<String>,
        label: String,
    ) -> Arc<Self> {
        let node = Arc::new(Self {
            base: NodeBase::new(ctx),
            catalog,
            schema,
            label,
        });
        let registry = &node.base.ctx().registry;
        registry.bind(node.base.id(), RegistryObject::Node(node.clone()));
        node
    }
}

impl StructureNode for ProcedureGroupNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn name(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> &str {
        "procedures"
    }

    fn display_class(&self) -> &str {
        "objs"
    }

    fn is_leaf(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<Arc<dyn StructureNode>> {
        self.base.ensure_loaded("procedures", |ctx| {
            let meta = ctx.handle.meta();
            let mut children: Vec<Arc<dyn StructureNode>> = Vec::new();
            for procedure in meta.procedures(self.catalog.as_deref(), self.schema.as_deref())? {
                children.push(LeafNode::create(
                    &ctx.registry,
                    procedure.name,
                    "procedure",
                    "procedure",
                    None,
                ));
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
