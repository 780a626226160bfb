//! Command handler layer.
//!
//! Handlers read the payload, delegate to `compiler::*` and `services::*`,
//! then render the result as text or the `--json` envelope.
//!
//! ## Files
//! - `inspect.rs` — order/train-body/layers (read-only, nothing written).
//! - `runtime.rs` — compile/train/emit/submit.

pub mod inspect;
pub mod runtime;

pub use inspect::handle_inspect_commands;
pub use runtime::handle_runtime_commands;
