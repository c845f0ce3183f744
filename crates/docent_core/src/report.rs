//! Batch-level quality report types.

use serde::{Deserialize, Serialize};

/// The slide-side view the batch report inspects.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Default,
    derive_getters::Getters,
    Serialize,
    Deserialize,
    derive_builder::Builder,
)]
pub struct SlideDescriptor {
    /// Slide title.
    #[builder(default, setter(into))]
    #[serde(default)]
    title: String,

    /// Bullet phrases shown on the slide.
    #[builder(default)]
    #[serde(default)]
    bullets: Vec<String>,

    /// Path or URL of the generated slide image.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    image_path: Option<String>,
}

impl SlideDescriptor {
    /// Whether a non-empty image reference is present.
    pub fn has_image(&self) -> bool {
        self.image_path
            .as_deref()
            .is_some_and(|path| !path.trim().is_empty())
    }
}

/// Aggregate counts reported for observability; never used for gating.
#[derive(Debug, Clone, PartialEq, Default, derive_getters::Getters, Serialize, Deserialize)]
pub struct BatchStats {
    /// Number of scripts inspected
    num_scripts: usize,
    /// Number of slides inspected
    num_slides: usize,
    /// Characters across every narration part of every script
    total_narration_chars: usize,
    /// Integer average of narration characters per script
    avg_narration_chars: usize,
    /// Bullets across every script
    total_bullets: usize,
    /// Slides carrying an image reference
    images_generated: usize,
    /// Cross-section sentence repetition rate
    repetition_rate: f64,
}

impl BatchStats {
    /// Assemble statistics; the per-script average is derived here.
    pub fn new(
        num_scripts: usize,
        num_slides: usize,
        total_narration_chars: usize,
        total_bullets: usize,
        images_generated: usize,
        repetition_rate: f64,
    ) -> Self {
        let avg_narration_chars = if num_scripts > 0 {
            total_narration_chars / num_scripts
        } else {
            0
        };
        Self {
            num_scripts,
            num_slides,
            total_narration_chars,
            avg_narration_chars,
            total_bullets,
            images_generated,
            repetition_rate,
        }
    }
}

/// Result of one QA pass over a whole generated batch. Immutable once built.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, Serialize, Deserialize)]
pub struct SectionBatchReport {
    /// Script issues in script order, repetition issue last
    script_issues: Vec<String>,
    /// Slide issues in slide order
    slide_issues: Vec<String>,
    /// Cross-section sentence repetition rate
    repetition_rate: f64,
    /// No issue of any kind was found
    overall_passed: bool,
    /// Informational aggregate counts
    stats: BatchStats,
}

impl SectionBatchReport {
    /// Build a report; `overall_passed` follows from the issue lists.
    pub fn new(
        script_issues: Vec<String>,
        slide_issues: Vec<String>,
        repetition_rate: f64,
        stats: BatchStats,
    ) -> Self {
        let overall_passed = script_issues.is_empty() && slide_issues.is_empty();
        Self {
            script_issues,
            slide_issues,
            repetition_rate,
            overall_passed,
            stats,
        }
    }

    /// Whether the script checks (including repetition) passed.
    pub fn scripts_passed(&self) -> bool {
        self.script_issues.is_empty()
    }

    /// Whether the slide checks passed.
    pub fn slides_passed(&self) -> bool {
        self.slide_issues.is_empty()
    }

    /// Every issue, scripts first.
    pub fn issues(&self) -> impl Iterator<Item = &str> {
        self.script_issues
            .iter()
            .chain(self.slide_issues.iter())
            .map(String::as_str)
    }
}
