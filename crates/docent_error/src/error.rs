//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, GenerationError, JsonError, ModelsError};

/// Every error condition a Docent operation can report.
///
/// # Examples
///
/// ```
/// use docent_error::{DocentError, JsonError};
///
/// let json_err = JsonError::new("Unexpected end of input");
/// let err: DocentError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum DocentErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Generation or quality-gate error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Provider adapter error
    #[from(ModelsError)]
    Models(ModelsError),
}

/// Docent error with kind discrimination.
///
/// # Examples
///
/// ```
/// use docent_error::{ConfigError, DocentErrorKind, DocentResult};
///
/// fn might_fail() -> DocentResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), DocentErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Docent Error: {}", _0)]
pub struct DocentError(Box<DocentErrorKind>);

impl DocentError {
    /// Create a new error from a kind.
    pub fn new(kind: DocentErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DocentErrorKind {
        &self.0
    }

    /// The generation error kind, if this is a generation failure.
    pub fn generation_kind(&self) -> Option<&crate::GenerationErrorKind> {
        match self.kind() {
            DocentErrorKind::Generation(e) => Some(&e.kind),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to DocentErrorKind
impl<T> From<T> for DocentError
where
    T: Into<DocentErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Docent operations.
pub type DocentResult<T> = std::result::Result<T, DocentError>;
