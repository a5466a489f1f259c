//! CLI commands and argument parsing

use crate::config::GeneratorOption;
use crate::keyword::SchemaVersion;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy Schemagen CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-schemagen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the JSON Schema of a type from a type graph
    Generate {
        /// Type graph file (YAML)
        graph: PathBuf,

        /// Root type, overriding the document's `root`
        #[arg(short, long)]
        root: Option<String>,

        /// Target draft, overriding the document's settings
        #[arg(long)]
        schema_version: Option<SchemaVersion>,

        /// Additional option to enable (repeatable)
        #[arg(long = "option")]
        options: Vec<GeneratorOption>,

        /// Write the schema to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Validate a type graph document
    Validate {
        /// Type graph file (YAML)
        graph: PathBuf,
    },

    /// List the keyword names used for a draft
    Keywords {
        /// Draft to list keywords for
        #[arg(long, default_value = "draft2020-12")]
        schema_version: SchemaVersion,
    },
}
