//! CLI module
//!
//! Command-line interface for generating schemas from type graph documents.
//!
//! # Commands
//!
//! - `generate` - Write the schema of the root type to stdout or a file
//! - `validate` - Check a type graph document (and its root, if declared)
//! - `keywords` - List the keyword names of a draft

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{effective_settings, Runner};
