//! Generation and quality-gate error types.

/// Failure conditions of structured generation and narration repair.
///
/// Only `GenerationExhausted`, `ExpansionRejected` and `ProviderUnavailable`
/// normally escape the retry loop; the remaining kinds are recovered
/// inside an attempt and surface only in attempt diagnostics.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum GenerationErrorKind {
    /// No JSON object could be extracted from the response
    #[display("No JSON object found in response")]
    ParseFailure,
    /// Parsed object is missing a field that cannot be defaulted
    #[display("Invalid structure: {}", _0)]
    ShapeInvalid(String),
    /// Well-shaped content failed the length/purity/similarity gates
    #[display("Quality gate failed: {:?}", _0)]
    QualityGateFailure(Vec<String>),
    /// Every attempt failed and heuristic fallback is not permitted
    #[display("Generation exhausted after {} attempts (last failure: {})", attempts, last_failure)]
    GenerationExhausted {
        /// Number of outer attempts made
        attempts: usize,
        /// Description of the final failure
        last_failure: String,
    },
    /// The generation capability raised instead of returning text
    #[display("Generation provider unavailable: {}", _0)]
    ProviderUnavailable(String),
    /// A configured generator produced an expansion that failed the gates
    #[display(
        "Expansion for '{}' rejected ({} chars, chinese ratio {:.2})",
        topic,
        length,
        chinese_ratio
    )]
    ExpansionRejected {
        /// Topic label of the expanded narration
        topic: String,
        /// Character length of the rejected text
        length: usize,
        /// Chinese ratio of the rejected text
        chinese_ratio: f64,
    },
}

impl GenerationErrorKind {
    /// Whether this failure is terminal for the caller of the retry loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GenerationErrorKind::GenerationExhausted { .. })
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use docent_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::GenerationExhausted {
///     attempts: 3,
///     last_failure: "quality gate".to_string(),
/// });
/// assert!(err.kind.is_fatal());
/// assert!(format!("{}", err).contains("3 attempts"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
