//! Batch files consumed by `docent report`.

use docent_core::{SectionBatchReport, SlideDescriptor, StructuredContent};
use docent_error::{DocentResult, JsonError};
use docent_narration::{ReportThresholds, build_report};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Every script and slide produced for one paper.
///
/// # Examples
///
/// ```
/// use docent::BatchInput;
///
/// let batch = BatchInput::from_json(r#"{"scripts": [], "slides": []}"#).unwrap();
/// assert!(batch.scripts.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchInput {
    /// Generated scripts, in section order
    #[serde(default)]
    pub scripts: Vec<StructuredContent>,
    /// Rendered slides, in section order
    #[serde(default)]
    pub slides: Vec<SlideDescriptor>,
}

impl BatchInput {
    /// Parse a batch from JSON text.
    pub fn from_json(text: &str) -> DocentResult<Self> {
        Ok(serde_json::from_str(text)
            .map_err(|e| JsonError::new(format!("Invalid batch: {}", e)))?)
    }

    /// Read and parse a batch file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> DocentResult<Self> {
        let display = path.as_ref().display().to_string();
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| JsonError::for_path(display.as_str(), e))?;
        let batch: Self =
            serde_json::from_str(&text).map_err(|e| JsonError::for_path(display.as_str(), e))?;
        debug!(
            scripts = batch.scripts.len(),
            slides = batch.slides.len(),
            "Loaded batch"
        );
        Ok(batch)
    }
}

/// Run batch QA over a parsed batch.
pub fn evaluate_batch(batch: &BatchInput, thresholds: &ReportThresholds) -> SectionBatchReport {
    build_report(&batch.scripts, &batch.slides, thresholds)
}
