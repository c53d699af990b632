//! CLI argument definitions using clap
//!
//! Commands:
//! - figs schema <schema.json>
//! - figs columns <schema.json> <data.csv>
//! - figs preflight <data.csv> [--media-type <type>]
//! - figs ingest <data.csv> --schema <schema.json>
//! - figs trees <dump.txt> [--schema <schema.json>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// figs - validate schemas, claim CSVs and FIGS tree dumps
#[derive(Parser, Debug)]
#[command(name = "figs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to an ingest configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Minimum log severity written to stderr (trace, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a schema document
    Schema {
        /// Path to the schema JSON
        schema: PathBuf,
    },

    /// Check a CSV header row against a schema
    Columns {
        /// Path to the schema JSON
        schema: PathBuf,
        /// Path to the CSV file
        data: PathBuf,
    },

    /// Run pre-flight format checks on a CSV file
    Preflight {
        /// Path to the CSV file
        data: PathBuf,
        /// Declared media type, e.g. text/csv
        #[arg(long)]
        media_type: Option<String>,
    },

    /// Parse a CSV file into typed records
    Ingest {
        /// Path to the CSV file
        data: PathBuf,
        /// Path to the schema JSON
        #[arg(long)]
        schema: PathBuf,
    },

    /// Parse and validate a tree dump
    Trees {
        /// Path to the tree dump
        dump: PathBuf,
        /// Schema to check tree features against
        #[arg(long)]
        schema: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
