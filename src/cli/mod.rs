//! CLI module for figs
//!
//! Provides command-line access to:
//! - schema: validate a schema document
//! - columns: check CSV headers against a schema
//! - preflight: cheap CSV format checks
//! - ingest: full CSV parse into typed records
//! - trees: parse and validate a tree dump

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute, run, run_command, Outcome};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
