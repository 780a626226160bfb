//! Graph-to-code compiler.
//!
//! ## Pipeline
//! - `graph.rs` — dependency graph over layer declarations and emission order.
//! - `literal.rs` — parameter values to target literals.
//! - `module.rs` — one layer statement per ordered module.
//! - `config.rs` — compile/callback/fit statements from the training config.
//! - `project.rs` — assembles the model and training artifacts.
//! - `dialect.rs` — namespace catalog of the target runtime.
//! - `error.rs` — bind/graph/unsupported-type errors.
//!
//! Everything here is pure: no filesystem, network or process access.

pub mod config;
pub mod dialect;
pub mod error;
pub mod graph;
pub mod literal;
pub mod module;
pub mod project;
