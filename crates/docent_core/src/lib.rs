//! Core data types for the Docent narration quality pipeline.
//!
//! This crate provides the value types exchanged between the quality-gate
//! core and the orchestration layer that renders slides and synthesizes
//! speech. None of them own connections, files or threads.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod content;
mod logging;
mod outcome;
mod policy;
mod prompt;
mod quality;
mod report;
mod request;

pub use content::{NARRATION_SEPARATOR, StructuredContent};
pub use logging::init_logging;
pub use outcome::{GenerationMeta, GenerationOutcome};
pub use policy::{GenerationPolicy, Strictness};
pub use prompt::Prompt;
pub use quality::QualityVerdict;
pub use report::{BatchStats, SectionBatchReport, SlideDescriptor, SlideDescriptorBuilder};
pub use request::{SectionRequest, SectionRequestBuilder};
