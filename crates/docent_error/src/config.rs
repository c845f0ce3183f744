//! Threshold configuration errors.

/// A configuration file that could not be loaded, or a threshold outside
/// its valid range.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What went wrong
    pub message: String,
    /// Dotted threshold key, when a single key is at fault
    pub key: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// A loading or parsing failure not tied to one key.
    ///
    /// # Examples
    ///
    /// ```
    /// use docent_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to read ./docent.toml");
    /// assert!(err.key.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// An invalid value for the threshold `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use docent_error::ConfigError;
    ///
    /// let err = ConfigError::for_key("quality.min_chinese_ratio", "must be within [0, 1], got 1.5");
    /// assert_eq!(err.key.as_deref(), Some("quality.min_chinese_ratio"));
    /// assert!(err.to_string().contains("quality.min_chinese_ratio must be within"));
    /// ```
    #[track_caller]
    pub fn for_key(key: impl Into<String>, message: impl std::fmt::Display) -> Self {
        let key = key.into();
        let location = std::panic::Location::caller();
        Self {
            message: format!("{} {}", key, message),
            key: Some(key),
            line: location.line(),
            file: location.file(),
        }
    }
}
