//! `docent extract` handler.

use super::{print_json, read_input};
use docent::{DocentResult, extract_json_with_strategy};
use std::path::Path;
use tracing::{info, warn};

/// Print the object recovered from `path`; fails when there is none.
pub fn extract_object(path: &Path) -> DocentResult<bool> {
    let raw = read_input(path)?;

    match extract_json_with_strategy(&raw) {
        Some((object, strategy)) => {
            info!(strategy = %strategy, keys = object.len(), "Recovered JSON object");
            print_json(&object)?;
            Ok(true)
        }
        None => {
            warn!(chars = raw.chars().count(), "No JSON object found");
            eprintln!("No JSON object found in {}", path.display());
            Ok(false)
        }
    }
}
