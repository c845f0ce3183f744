//! Error types for the Docent library.
//!
//! This crate provides the foundation error types used throughout the Docent workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use docent_error::{DocentResult, GenerationError, GenerationErrorKind};
//!
//! fn generate() -> DocentResult<String> {
//!     Err(GenerationError::new(GenerationErrorKind::ParseFailure))?
//! }
//!
//! assert!(generate().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod generation;
mod json;
mod models;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{DocentError, DocentErrorKind, DocentResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::JsonError;
pub use models::{ModelsError, ModelsErrorKind, ModelsResult, RetryableError};
