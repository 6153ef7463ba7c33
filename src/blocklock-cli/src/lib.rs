//! Blocklock CLI library module.
//!
//! - `cli/` - argument parsing and command dispatch
//! - `settings` - `blocklock.toml` and storage path resolution

pub mod cli;
pub mod settings;
