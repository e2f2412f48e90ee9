//! CLI module
//!
//! Command-line interface for generating and checking activity logs.
//!
//! # Commands
//!
//! - `generate` - Write synthetic events to a file, optionally upload it
//! - `validate` - Check a file against the strict event schema
//! - `schema` - Print the strict schema, or one inferred from a file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
