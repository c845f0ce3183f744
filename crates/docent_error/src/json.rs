//! Errors reading or writing JSON documents.

/// A JSON document (batch file, command output) that could not be read,
/// parsed or rendered.
///
/// Recovering an object from model output never raises this error; the
/// extractor reports "not found" instead.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// What went wrong
    pub message: String,
    /// Path of the document involved, if it came from a file
    pub path: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// An error not tied to a file.
    ///
    /// # Examples
    ///
    /// ```
    /// use docent_error::JsonError;
    ///
    /// let err = JsonError::new("Failed to serialize output");
    /// assert!(err.path.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            path: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// An error reading or parsing the document at `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use docent_error::JsonError;
    ///
    /// let err = JsonError::for_path("batch.json", "expected value at line 1 column 1");
    /// assert_eq!(err.path.as_deref(), Some("batch.json"));
    /// assert!(err.message.starts_with("batch.json: "));
    /// ```
    #[track_caller]
    pub fn for_path(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        let path = path.into();
        let location = std::panic::Location::caller();
        Self {
            message: format!("{}: {}", path, message),
            path: Some(path),
            line: location.line(),
            file: location.file(),
        }
    }
}
