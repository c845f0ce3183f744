//! `docent report` handler.

use super::print_json;
use docent::{BatchInput, DocentResult, NarrationConfig, evaluate_batch};
use std::path::Path;
use tracing::warn;

/// Print the batch report; fails when any issue was found.
pub fn report_batch(path: &Path, config: &NarrationConfig) -> DocentResult<bool> {
    let batch = BatchInput::from_path(path)?;
    let report = evaluate_batch(&batch, &config.report);

    for issue in report.issues() {
        warn!(issue, "Batch QA issue");
    }
    print_json(&report)?;
    Ok(*report.overall_passed())
}
