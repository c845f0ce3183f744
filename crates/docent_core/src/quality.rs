//! Quality metrics for narration text.

use serde::{Deserialize, Serialize};

/// Metrics computed for a set of narration parts.
///
/// A verdict is a pure function of the text it was computed from; it is
/// recomputed after every rewrite rather than updated.
#[derive(Debug, Clone, PartialEq, Default, derive_getters::Getters, Serialize, Deserialize)]
pub struct QualityVerdict {
    /// CJK share of (CJK + ASCII letter) characters, over all parts combined
    chinese_ratio: f64,
    /// ASCII letter share of (CJK + ASCII letter) characters
    ascii_letter_ratio: f64,
    /// 3-gram Jaccard similarity of the first two parts (0.0 with fewer parts)
    pair_similarity: f64,
    /// Character length of each part
    lengths: Vec<usize>,
    /// Template opener phrases found in the text
    template_phrases: Vec<String>,
}

impl QualityVerdict {
    /// Assemble a verdict from precomputed metrics.
    pub fn new(
        chinese_ratio: f64,
        ascii_letter_ratio: f64,
        pair_similarity: f64,
        lengths: Vec<usize>,
        template_phrases: Vec<String>,
    ) -> Self {
        Self {
            chinese_ratio,
            ascii_letter_ratio,
            pair_similarity,
            lengths,
            template_phrases,
        }
    }

    /// Whether every part has at least `min_chars` characters.
    pub fn all_parts_at_least(&self, min_chars: usize) -> bool {
        self.lengths.iter().all(|len| *len >= min_chars)
    }

    /// Shortest part length, or 0 when there are no parts.
    pub fn shortest_part(&self) -> usize {
        self.lengths.iter().copied().min().unwrap_or(0)
    }
}
