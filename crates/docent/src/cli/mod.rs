//! Command-line interface module.
//!
//! Each handler prints its result to stdout and returns whether the
//! command passed; the binary maps `false` to exit status 1.

mod analyze;
mod commands;
mod extract;
mod generate;
mod report;

pub use analyze::analyze_text;
pub use commands::{Cli, Commands};
pub use extract::extract_object;
pub use generate::generate_script;
pub use report::report_batch;

use docent::{DocentResult, JsonError};
use std::path::Path;

/// Read a UTF-8 input file, or stdin when the path is `-`.
pub(crate) fn read_input(path: &Path) -> DocentResult<String> {
    let result = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    };
    Ok(result.map_err(|e| JsonError::for_path(path.display().to_string(), e))?)
}

/// Pretty-print a serializable value as JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> DocentResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| JsonError::new(format!("Failed to serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}
