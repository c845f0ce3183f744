//! Trait definitions for the Docent narration quality pipeline.
//!
//! This crate defines the seam between the quality-gate core and the
//! provider adapters that perform network calls.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::TextGenerator;
