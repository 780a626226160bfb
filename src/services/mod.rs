//! Service layer: binding, persistence, process and remote plumbing.
//!
//! ## Service map
//! - `binder.rs` — payload reading, request binding, namespace rules.
//! - `storage.rs` — settings, artifact persistence, audit log.
//! - `trainer.rs` — local training subprocess and remote submission.
//! - `output.rs` — JSON/text output helpers and error codes.
//!
//! ## Conventions
//! - Side effects stay here; `compiler::*` is pure.
//! - Keep command handlers thin; delegate to services.

pub mod binder;
pub mod output;
pub mod storage;
pub mod trainer;
