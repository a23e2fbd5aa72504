//! Tooling
//!
//! Command-line entry points for running and inspecting the edge handlers.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, ConfigCommands};
