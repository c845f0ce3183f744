//! Structured outcome of a generation call.

use crate::{Strictness, StructuredContent};
use serde::{Deserialize, Serialize};

/// Bookkeeping returned alongside generated content.
#[derive(Debug, Clone, PartialEq, Default, derive_getters::Getters, Serialize, Deserialize)]
pub struct GenerationMeta {
    /// 1-based attempt that produced the content (0 for heuristic content)
    attempt: usize,
    /// Whether the quality-strict rung produced the content
    quality_retry: bool,
    /// Whether the content is deterministic heuristic output
    fallback: bool,
    /// Combined Chinese ratio of the accepted narration
    chinese_ratio: f64,
    /// Every rung issued, in order, across all attempts
    strategies_tried: Vec<Strictness>,
    /// One reason per failed rung, in order
    failures: Vec<String>,
    /// Largest sentence overlap left between narration parts after repair
    #[serde(default)]
    residual_overlap: f64,
    /// Indices of narration parts rewritten to reduce overlap
    #[serde(default)]
    rewritten_parts: Vec<usize>,
}

impl GenerationMeta {
    /// Assemble metadata for accepted content.
    pub fn new(
        attempt: usize,
        quality_retry: bool,
        fallback: bool,
        chinese_ratio: f64,
        strategies_tried: Vec<Strictness>,
        failures: Vec<String>,
    ) -> Self {
        Self {
            attempt,
            quality_retry,
            fallback,
            chinese_ratio,
            strategies_tried,
            failures,
            residual_overlap: 0.0,
            rewritten_parts: Vec::new(),
        }
    }

    /// Attach what the repair pass left behind.
    pub fn with_repair(mut self, residual_overlap: f64, rewritten_parts: Vec<usize>) -> Self {
        self.residual_overlap = residual_overlap;
        self.rewritten_parts = rewritten_parts;
        self
    }
}

/// Validated content plus how it was obtained.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// The accepted content
    content: StructuredContent,
    /// How the content was obtained
    meta: GenerationMeta,
}

impl GenerationOutcome {
    /// Pair content with its metadata.
    pub fn new(content: StructuredContent, meta: GenerationMeta) -> Self {
        Self { content, meta }
    }

    /// Take the content, dropping the metadata.
    pub fn into_content(self) -> StructuredContent {
        self.content
    }
}
