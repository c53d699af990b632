//! JSON output for the CLI
//!
//! - Output: single JSON object per invocation via stdout
//! - Logs go to stderr and never mix with responses
//! - UTF-8 only

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    emit(&mut io::stdout(), &json!({"status": "ok", "data": data}))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    emit(
        &mut io::stdout(),
        &json!({"status": "error", "code": code, "message": message}),
    )
}

fn emit<W: Write>(out: &mut W, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
