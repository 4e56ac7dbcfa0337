// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Oracle plugin
//!
//! Oracle owners map onto schemas, so packages and Java classes attach at the
//! schema extension point, listed alphabetically from the `all_objects` view.

use super::{DialectPlugin, SqlObjectGroupNode};
use crate::dialect::Dialect;
use crate::driver::Value;
use crate::tree::{NodeContext, StructureNode};
use std::sync::Arc;

pub(crate) const PACKAGES_SQL: &str = "select object_name from sys.all_objects \
     where object_type = 'PACKAGE' and owner = ? order by object_name asc";

pub(crate) const JAVA_CLASSES_SQL: &str = "select object_name from sys.all_objects \
     where object_type = 'JAVA CLASS' and owner = ? order by object_name asc";

pub struct OraclePlugin;

impl DialectPlugin for OraclePlugin {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn schema_children(
        &self,
        _catalog: Option<&str>,
        schema: &str,
        ctx: &NodeContext,
    ) -> Vec<Arc<dyn StructureNode>> {
        let owner = Value::Text(schema.to_string());
        vec![
            SqlObjectGroupNode::create(
                ctx.clone(),
                "Package",
                "ora_pkgs",
                "ora_pkg",
                "package",
                PACKAGES_SQL,
                vec![owner.clone()],
            ),
            SqlObjectGroupNode::create(
                ctx.clone(),
                "Java Class",
                "ora_javaclasses",
                "ora_javaclass",
                "javaclass",
                JAVA_CLASSES_SQL,
                vec![owner],
            ),
        ]
    }
}
