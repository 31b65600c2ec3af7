//! # evacuate
//!
//! Library half of the `evacuate` binary: argument types and command
//! handlers, kept out of `main.rs` so integration tests can drive them.

pub mod cli;
pub mod commands;

pub use cli::Cli;
pub use commands::{Outcome, run};
