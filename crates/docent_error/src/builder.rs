//! Errors from assembling request and slide values.

/// Why a value could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderErrorKind {
    /// A field without a default was never set
    #[display("field `{}` was not set", _0)]
    MissingField(String),

    /// Any other validation message from the builder
    #[display("{}", _0)]
    ValidationFailed(String),
}

impl BuilderErrorKind {
    /// Classify a message produced by a generated builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use docent_error::BuilderErrorKind;
    ///
    /// assert_eq!(
    ///     BuilderErrorKind::from_message("`section_title` must be initialized"),
    ///     BuilderErrorKind::MissingField("section_title".to_string())
    /// );
    /// ```
    pub fn from_message(message: &str) -> Self {
        match message.strip_suffix(" must be initialized") {
            Some(field) => Self::MissingField(field.trim_matches('`').to_string()),
            None => Self::ValidationFailed(message.to_string()),
        }
    }
}

/// Builder error naming the type being built, with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Builder Error: cannot build {}: {} at line {} in {}", target, kind, line, file)]
pub struct BuilderError {
    /// Type that was being built (e.g., "SectionRequest")
    pub target: &'static str,
    /// The specific condition
    pub kind: BuilderErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl BuilderError {
    /// Create a builder error for `target`.
    #[track_caller]
    pub fn new(target: &'static str, kind: BuilderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            target,
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Wrap a generated builder's error for `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use docent_error::{BuilderError, BuilderErrorKind};
    ///
    /// let err = BuilderError::from_builder("SectionRequest", "`section_title` must be initialized");
    /// assert!(matches!(err.kind, BuilderErrorKind::MissingField(_)));
    /// assert!(err.to_string().contains("cannot build SectionRequest"));
    /// ```
    #[track_caller]
    pub fn from_builder(target: &'static str, error: impl std::fmt::Display) -> Self {
        Self::new(target, BuilderErrorKind::from_message(&error.to_string()))
    }
}
