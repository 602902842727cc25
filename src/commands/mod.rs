// src/commands/mod.rs
//! Command handlers for the aptsweep CLI

mod completions;
mod status;
mod sweep;

// Re-export all command handlers
pub use completions::cmd_completions;
pub use status::cmd_status;
pub use sweep::{cmd_apply, cmd_check, cmd_diff};
