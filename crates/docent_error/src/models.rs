//! Provider adapter errors and transport retry classification.

/// Provider adapter error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModelsErrorKind {
    /// API key or endpoint missing from the provider settings
    #[display("Provider not configured: {}", _0)]
    NotConfigured(String),
    /// Transport failure before a status was received
    #[display("Request failed: {}", _0)]
    Request(String),
    /// Provider answered with a non-success status
    #[display("HTTP {} error: {}", status_code, message)]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Response body excerpt
        message: String,
    },
    /// Response body did not match the expected schema
    #[display("Failed to parse response: {}", _0)]
    ResponseParsing(String),
}

impl ModelsErrorKind {
    /// Check if this error type should be retried at the transport level.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelsErrorKind::HttpStatus { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            ModelsErrorKind::Request(_) => true,
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            ModelsErrorKind::HttpStatus { status_code, .. } => match *status_code {
                429 => (5000, 3, 40),
                503 => (2000, 4, 30),
                500 | 502 | 504 => (1000, 3, 8),
                _ => (2000, 3, 30),
            },
            ModelsErrorKind::Request(_) => (1000, 2, 10),
            _ => (2000, 3, 30),
        }
    }
}

/// Provider adapter error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Models Error: {} at {}:{}", kind, file, line)]
pub struct ModelsError {
    /// The specific error kind
    pub kind: ModelsErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl ModelsError {
    /// Create a new models error.
    #[track_caller]
    pub fn new(kind: ModelsErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Result type for provider adapter operations.
pub type ModelsResult<T> = Result<T, ModelsError>;

/// Trait for errors that support transport retry logic.
///
/// # Examples
///
/// ```
/// use docent_error::{ModelsError, ModelsErrorKind, RetryableError};
///
/// let err = ModelsError::new(ModelsErrorKind::HttpStatus {
///     status_code: 429,
///     message: "slow down".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// let (backoff, retries, _) = err.retry_strategy_params();
/// assert_eq!(backoff, 5000);
/// assert_eq!(retries, 3);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (2000, 3, 30)
    }
}

impl RetryableError for ModelsError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}
