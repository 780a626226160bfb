//! Shared data model layer.
//!
//! ## Files
//! - `models.rs` — project payload, settings, report/output structs.
//! - `params.rs` — per-layer parameter schemas and the tagged `Layer` union.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Report structs are the `--json` output; keep them in sync with
//! `docs/contracts/*`.

pub mod models;
pub mod params;
