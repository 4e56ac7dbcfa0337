// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Dialect resolution
//!
//! A dialect is a named behavioral variant of a database product; it selects
//! which vendor quirks the metadata façade applies and which plugin node
//! kinds appear in the structure tree. Resolution is a pure function over the
//! connection's reported product name and version: first matching descriptor
//! in registration order wins, and anything unrecognized is `Generic`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Known database dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    MySql,
    PostgreSql,
    Oracle,
    MsSql,
    Sybase,
    Db2,
    Informix,
    InstantDb,
    Ingres,
    Progress,
    /// No vendor-specific quirks or node kinds apply
    Generic,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgresql",
            Dialect::Oracle => "oracle",
            Dialect::MsSql => "mssql",
            Dialect::Sybase => "sybase",
            Dialect::Db2 => "db2",
            Dialect::Informix => "informix",
            Dialect::InstantDb => "instantdb",
            Dialect::Ingres => "ingres",
            Dialect::Progress => "progress",
            Dialect::Generic => "generic",
        }
    }
}

/// One dialect matcher
///
/// `supports` receives the trimmed, lowercased product name plus the raw
/// version string. Version is unused by every built-in descriptor so far but
/// stays in the signature for descriptors that need to discriminate.
#[derive(Clone)]
pub struct DialectDescriptor {
    pub dialect: Dialect,
    supports: fn(product_name: &str, product_version: &str) -> bool,
}

impl DialectDescriptor {
    pub fn new(dialect: Dialect, supports: fn(&str, &str) -> bool) -> Self {
        Self { dialect, supports }
    }

    pub fn supports(&self, product_name: &str, product_version: &str) -> bool {
        (self.supports)(product_name, product_version)
    }
}

static BUILTIN_DESCRIPTORS: Lazy<Vec<DialectDescriptor>> = Lazy::new(|| {
    vec![
        DialectDescriptor::new(Dialect::MySql, |name, _| name.contains("mysql")),
        DialectDescriptor::new(Dialect::PostgreSql, |name, _| {
            name.starts_with("postgresql")
        }),
        DialectDescriptor::new(Dialect::Oracle, |name, _| name.starts_with("oracle")),
        DialectDescriptor::new(Dialect::MsSql, |name, _| {
            name.starts_with("microsoft") || name.contains("sql server")
        }),
        DialectDescriptor::new(Dialect::Sybase, |name, _| {
            name.contains("sybase") || name.contains("adaptive server")
        }),
        DialectDescriptor::new(Dialect::Db2, |name, _| name.starts_with("db2")),
        DialectDescriptor::new(Dialect::Informix, |name, _| name.contains("informix")),
        DialectDescriptor::new(Dialect::InstantDb, |name, _| name.contains("instantdb")),
        DialectDescriptor::new(Dialect::Ingres, |name, _| name.starts_with("ingres")),
        DialectDescriptor::new(Dialect::Progress, |name, _| {
            name.starts_with("progress") || name.starts_with("openedge")
        }),
    ]
});

/// Ordered list of dialect descriptors
pub struct DialectRegistry {
    descriptors: Vec<DialectDescriptor>,
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DialectRegistry {
    /// Registry with every built-in descriptor, in canonical order
    pub fn builtin() -> Self {
        Self {
            descriptors: BUILTIN_DESCRIPTORS.clone(),
        }
    }

    /// Empty registry; every resolution yields `Generic`
    pub fn empty() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    /// Append a descriptor; later registrations lose ties to earlier ones
    pub fn register(&mut self, descriptor: DialectDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// Resolve the dialect for a connection's reported product identity
    ///
    /// A missing product name resolves to `Generic` without consulting any
    /// descriptor.
    pub fn resolve(&self, product_name: Option<&str>, product_version: Option<&str>) -> Dialect {
        let name = match product_name {
            Some(n) => n.trim().to_lowercase(),
            None => return Dialect::Generic,
        };
        let version = product_version.unwrap_or("");
        for descriptor in &self.descriptors {
            if descriptor.supports(&name, version) {
                return descriptor.dialect;
            }
        }
        Dialect::Generic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_community_server_resolves_to_mysql() {
        let registry = DialectRegistry::builtin();
        assert_eq!(
            registry.resolve(Some("MySQL Community Server"), Some("8.0.36")),
            Dialect::MySql
        );
    }

    #[test]
    fn test_null_product_name_resolves_to_generic() {
        let registry = DialectRegistry::builtin();
        assert_eq!(registry.resolve(None, None), Dialect::Generic);
    }

    #[test]
    fn test_unknown_product_resolves_to_generic() {
        let registry = DialectRegistry::builtin();
        assert_eq!(registry.resolve(Some("FoxPro"), None), Dialect::Generic);
    }

    #[test]
    fn test_first_matching_descriptor_wins() {
        let mut registry = DialectRegistry::empty();
        registry.register(DialectDescriptor::new(Dialect::Sybase, |name, _| {
            name.contains("server")
        }));
        registry.register(DialectDescriptor::new(Dialect::MsSql, |name, _| {
            name.contains("server")
        }));
        assert_eq!(
            registry.resolve(Some("Some Server"), None),
            Dialect::Sybase
        );
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let registry = DialectRegistry::builtin();
        assert_eq!(
            registry.resolve(Some("  Oracle Database 19c  "), None),
            Dialect::Oracle
        );
        assert_eq!(registry.resolve(Some("INGRES II"), None), Dialect::Ingres);
    }
}
