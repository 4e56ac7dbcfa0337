// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! dbscope - A server-side engine for interactive relational database browsing
//!
//! dbscope lets a stateless client incrementally explore the structure of an
//! arbitrary relational database and run ad-hoc queries against it, one page
//! of rows at a time, across many independent, long-lived browsing sessions.
//!
//! # Features
//!
//! - **Session-Scoped Registry**: server-held objects (tree nodes, open query
//!   cursors, connections) addressable by opaque identifiers across requests
//! - **Lazy Structure Tree**: catalogs, schemas, tables, columns, keys and
//!   procedures loaded on demand and cached until explicitly refreshed
//! - **Paginated Query Executor**: a server-side cursor served back to the
//!   client in bounded windows
//! - **Caching Metadata Façade**: normalizes and caches vendor inconsistencies
//!   in the driver's introspection surface
//! - **Dialect Plugins**: vendor-specific object kinds (MySQL triggers and
//!   users, Oracle packages and Java classes) spliced into the generic tree
//!
//! # Usage
//!
//! The [`BrowseCoordinator`] is the entry point; a driver implementing
//! [`driver::DatabaseDriver`] supplies the actual connectivity:
//!
//! ```ignore
//! use dbscope::BrowseCoordinator;
//!
//! let coordinator = BrowseCoordinator::new();
//! let conn = coordinator.login(&my_driver, "db://host/app", "scott", "tiger", true)?;
//! let root = coordinator.get_root(&conn)?;
//! for child in coordinator.get_children(&root.id)? {
//!     println!("{} ({})", child.name, child.kind);
//! }
//! ```

// Public modules - exposed to external users
pub mod coordinator;
pub mod dialect;
pub mod driver;
pub mod meta;

// Internal modules - only visible within dbscope crate
pub(crate) mod connection;
pub(crate) mod exec;
pub(crate) mod plugin;
pub(crate) mod registry;
pub(crate) mod tree;

// Re-export the public API - BrowseCoordinator is the main entry point
pub use coordinator::{BrowseCoordinator, ConnectionInfo, EngineConfig, EngineError, EngineResult};
pub use exec::{Alignment, ColumnMeta, QueryPage};
pub use tree::NodeSummary;

// Re-export Value type (needed for inspecting query result rows)
pub use driver::Value;

/// dbscope version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// dbscope crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
