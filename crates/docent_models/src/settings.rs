//! Connection settings for OpenAI-compatible chat-completions endpoints.

use docent_error::{ModelsError, ModelsErrorKind, ModelsResult};

/// Default base URL for the OpenAI API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model when `OPENAI_MODEL` is not set.
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for one chat-completions provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderSettings {
    /// Provider label used in logs (e.g., "generic", "openai")
    pub name: String,
    /// Base URL; `/chat/completions` is appended unless already present
    pub base_url: String,
    /// Model identifier to use for inference
    pub model: String,
    /// Optional bearer token
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retry transport failures with exponential backoff
    pub retry: bool,
}

impl ProviderSettings {
    /// Create settings for a provider without an API key.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: true,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Disable transport retries.
    pub fn without_retry(mut self) -> Self {
        self.retry = false;
        self
    }

    /// Full chat-completions URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use docent_models::ProviderSettings;
    ///
    /// let settings = ProviderSettings::new("local", "http://localhost:8080/v1/", "qwen");
    /// assert_eq!(settings.endpoint(), "http://localhost:8080/v1/chat/completions");
    /// ```
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{}/chat/completions", base)
        }
    }

    /// Every provider configured in the process environment, in cascade order.
    ///
    /// Reads:
    /// - `LLM_API_URL`, `LLM_API_KEY`, `LLM_MODEL` (generic endpoint, URL and model required)
    /// - `OPENAI_API_KEY` (required), `OPENAI_BASE_URL`, `OPENAI_MODEL`
    pub fn all_from_env() -> Vec<Self> {
        Self::all_from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`all_from_env`](Self::all_from_env), reading variables through `lookup`.
    ///
    /// Blank values count as unset.
    pub fn all_from_lookup<F>(lookup: F) -> Vec<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut providers = Vec::new();

        if let (Some(url), Some(model)) = (var("LLM_API_URL"), var("LLM_MODEL")) {
            let mut settings = Self::new("generic", url, model);
            settings.api_key = var("LLM_API_KEY");
            providers.push(settings);
        }

        if let Some(key) = var("OPENAI_API_KEY") {
            let base_url = var("OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_BASE_URL.to_string());
            let model = var("OPENAI_MODEL").unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string());
            providers.push(Self::new("openai", base_url, model).with_api_key(key));
        }

        providers
    }

    /// The first provider configured in the environment.
    pub fn from_env() -> ModelsResult<Self> {
        Self::all_from_env().into_iter().next().ok_or_else(|| {
            ModelsError::new(ModelsErrorKind::NotConfigured(
                "set LLM_API_URL and LLM_MODEL, or OPENAI_API_KEY".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_no_variables_means_no_providers() {
        assert!(ProviderSettings::all_from_lookup(lookup(&[])).is_empty());
    }

    #[test]
    fn test_generic_provider_comes_first() {
        let providers = ProviderSettings::all_from_lookup(lookup(&[
            ("LLM_API_URL", "http://localhost:8000/v1"),
            ("LLM_MODEL", "qwen2.5"),
            ("OPENAI_API_KEY", "sk-test"),
        ]));

        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].name, "generic");
        assert_eq!(providers[0].api_key, None);
        assert_eq!(providers[1].name, "openai");
        assert_eq!(providers[1].model, OPENAI_DEFAULT_MODEL);
        assert_eq!(providers[1].endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_generic_provider_needs_a_model() {
        let providers = ProviderSettings::all_from_lookup(lookup(&[
            ("LLM_API_URL", "http://localhost:8000/v1"),
            ("LLM_API_KEY", "secret"),
        ]));
        assert!(providers.is_empty());
    }

    #[test]
    fn test_blank_key_is_unset() {
        let providers = ProviderSettings::all_from_lookup(lookup(&[("OPENAI_API_KEY", "  ")]));
        assert!(providers.is_empty());
    }

    #[test]
    fn test_full_endpoint_is_kept() {
        let settings =
            ProviderSettings::new("x", "https://example.com/v1/chat/completions", "m");
        assert_eq!(settings.endpoint(), "https://example.com/v1/chat/completions");
    }
}
