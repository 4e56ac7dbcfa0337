// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! MySQL plugin
//!
//! MySQL models its databases as catalogs, so all vendor groups hang off the
//! catalog extension point: triggers and functions scoped to the catalog via
//! `information_schema`, and the server-wide account list from `mysql.user`.

use super::{DialectPlugin, SqlObjectGroupNode};
use crate::dialect::Dialect;
use crate::driver::Value;
use crate::tree::{NodeContext, StructureNode};
use std::sync::Arc;

pub(crate) const TRIGGERS_SQL: &str =
    "select trigger_name from information_schema.triggers where trigger_schema = ? order by 1 asc";

pub(crate) const FUNCTIONS_SQL: &str = "select routine_name from information_schema.routines \
     where routine_schema = ? and routine_type = 'FUNCTION' order by 1 asc";

pub(crate) const USERS_SQL: &str =
    "select concat('''', user, '''', '@', '''', host, '''') from mysql.user";

pub struct MySqlPlugin;

impl DialectPlugin for MySqlPlugin {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn catalog_children(&self, catalog: &str, ctx: &NodeContext) -> Vec<Arc<dyn StructureNode>> {
        let owner = Value::Text(catalog.to_string());
        vec![
            SqlObjectGroupNode::create(
                ctx.clone(),
                "Trigger",
                "mysql_triggers",
                "mysql_trigger",
                "trigger",
                TRIGGERS_SQL,
                vec![owner.clone()],
            ),
            SqlObjectGroupNode::create(
                ctx.clone(),
                "Function",
                "mysql_functs",
                "mysql_funct",
                "funct",
                FUNCTIONS_SQL,
                vec![owner],
            ),
            SqlObjectGroupNode::create(
                ctx.clone(),
                "User",
                "mysql_users",
                "mysql_user",
                "user",
                USERS_SQL,
                Vec::new(),
            ),
        ]
    }
}
