//! Quality gates, JSON repair and bounded-retry generation for Docent.
//!
//! This crate sits between a text-generation provider and the downstream
//! slide and speech stages. It turns unreliable model output into
//! structured narration that satisfies hard constraints:
//!
//! - [`extract_json`] recovers a JSON object from fenced, prose-wrapped
//!   or trailing-comma output.
//! - [`verdict`] and the other analysis functions measure Chinese purity,
//!   part similarity and template phrasing.
//! - [`NarrationRepairEngine`] deduplicates, expands and de-overlaps
//!   narration parts.
//! - [`ScriptGenerator`] runs the bounded retry ladder and applies the
//!   exhaustion policy.
//! - [`build_report`] checks a whole batch of scripts and slides.
//!
//! # Example
//!
//! ```
//! use docent_narration::{NarrationConfig, ScriptGenerator};
//! use docent_core::SectionRequestBuilder;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = ScriptGenerator::offline(NarrationConfig::default());
//! let request = SectionRequestBuilder::default()
//!     .section_title("Method")
//!     .section_summary("本文提出一种基于稀疏注意力的长文本建模方法。")
//!     .build()?;
//!
//! let outcome = generator.generate(&request).await?;
//! for part in outcome.content().narration_parts() {
//!     assert!(part.chars().count() >= 600);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analysis;
mod config;
mod extraction;
mod generation;
mod prompts;
mod repair;
mod report;
mod shape;

pub use analysis::{
    TEMPLATE_PHRASES, ascii_letter_ratio, char_len, chinese_ratio, combined_chinese_ratio,
    dedup_sentences, is_cjk, pair_similarity, segment_overlap, split_sentences,
    strip_control_chars, template_phrases, truncate_chars, verdict,
};
pub use config::{GenerationSettings, NarrationConfig, QualityThresholds, ReportThresholds};
pub use extraction::{ExtractionStrategy, extract_as, extract_json, extract_json_with_strategy};
pub use generation::{Attempt, RungFailure, ScriptGenerator, next_rung};
pub use prompts::{
    expand_prompt, rung_max_tokens, rung_prompt, rung_temperature, section_user_prompt,
    similarity_prompt,
};
pub use repair::{NarrationRepairEngine, RepairOutcome, heuristic_expand, normalize_topic};
pub use report::{build_report, cross_section_repetition};
pub use shape::{ParseOutcome, ShapeField, parse_structured, validate_shape};
