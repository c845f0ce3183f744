//! Docent - quality gates for LLM-written Chinese narration
//!
//! Docent sits between a text-generation provider and the slide and
//! speech stages of a paper-to-video pipeline. It turns unreliable model
//! output into structured narration that is long enough, Chinese enough
//! and distinct enough to be spoken aloud.
//!
//! # Features
//!
//! - **JSON recovery**: pull an object out of fenced, prose-wrapped or
//!   trailing-comma model output
//! - **Quality analysis**: Chinese ratio, part similarity, template phrasing
//! - **Narration repair**: deduplicate, expand short parts, rewrite
//!   overlapping parts
//! - **Bounded retry**: escalate from normal to JSON-only to quality-strict
//!   prompts, then fail loudly or fall back to heuristic content
//! - **Batch QA**: flag short, mixed-language or repetitive scripts
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use docent::{NarrationConfig, ProviderCascade, ScriptGenerator, SectionRequestBuilder};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cascade = ProviderCascade::from_env()?;
//!     let generator = ScriptGenerator::new(Arc::new(cascade), NarrationConfig::load()?);
//!
//!     let request = SectionRequestBuilder::default()
//!         .section_title("Method")
//!         .section_summary("本文提出一种基于稀疏注意力的长文本建模方法。")
//!         .build()?;
//!
//!     let outcome = generator.generate(&request).await?;
//!     println!("{}", outcome.content().narration());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `docent_error` - Error types
//! - `docent_core` - Value types and logging setup
//! - `docent_interface` - `TextGenerator` trait definition
//! - `docent_narration` - Extraction, analysis, repair, retry loop, batch report
//! - `docent_models` - OpenAI-compatible client and provider cascade
//!
//! This crate (`docent`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;

pub use batch::{BatchInput, evaluate_batch};

pub use docent_core::*;
pub use docent_error::*;
pub use docent_interface::*;
pub use docent_models::*;
pub use docent_narration::*;
