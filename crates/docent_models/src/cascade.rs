use crate::{OpenAiCompatibleClient, ProviderSettings};
use async_trait::async_trait;
use docent_core::Prompt;
use docent_error::{DocentError, DocentResult, ModelsError, ModelsErrorKind, ModelsResult};
use docent_interface::TextGenerator;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Tries generators in order until one returns non-empty text.
///
/// A provider that errors or returns an empty string hands over to the
/// next one. When no provider produced text, the cascade returns `""` if
/// any of them answered empty, and the last error only if every provider
/// failed outright.
///
/// # Examples
///
/// ```
/// use docent_models::ProviderCascade;
///
/// let cascade = ProviderCascade::new(vec![]);
/// assert!(cascade.is_empty());
/// ```
#[derive(Clone)]
pub struct ProviderCascade {
    providers: Vec<Arc<dyn TextGenerator>>,
}

impl std::fmt::Debug for ProviderCascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.provider_name()).collect();
        f.debug_struct("ProviderCascade")
            .field("providers", &names)
            .finish()
    }
}

impl ProviderCascade {
    /// Create a cascade over the given generators, tried in order.
    pub fn new(providers: Vec<Arc<dyn TextGenerator>>) -> Self {
        Self { providers }
    }

    /// Build chat-completions clients for every settings entry.
    pub fn from_settings(settings: Vec<ProviderSettings>) -> ModelsResult<Self> {
        let providers = settings
            .into_iter()
            .map(|s| OpenAiCompatibleClient::new(s).map(|c| Arc::new(c) as Arc<dyn TextGenerator>))
            .collect::<ModelsResult<Vec<_>>>()?;
        Ok(Self::new(providers))
    }

    /// Cascade over every provider configured in the environment.
    ///
    /// Fails with [`ModelsErrorKind::NotConfigured`] when none is.
    pub fn from_env() -> ModelsResult<Self> {
        let settings = ProviderSettings::all_from_env();
        if settings.is_empty() {
            return Err(ModelsError::new(ModelsErrorKind::NotConfigured(
                "set LLM_API_URL and LLM_MODEL, or OPENAI_API_KEY".to_string(),
            )));
        }
        Self::from_settings(settings)
    }

    /// Number of providers in the cascade.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the cascade has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl TextGenerator for ProviderCascade {
    #[instrument(skip(self, prompt), fields(providers = self.providers.len()))]
    async fn complete(
        &self,
        prompt: &Prompt,
        temperature: f32,
        max_tokens: u32,
    ) -> DocentResult<String> {
        let mut last_error: Option<DocentError> = None;
        let mut answered_empty = false;

        for provider in &self.providers {
            match provider.complete(prompt, temperature, max_tokens).await {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(provider = provider.provider_name(), "Provider answered");
                    return Ok(text);
                }
                Ok(_) => {
                    warn!(provider = provider.provider_name(), "Provider returned empty, trying next");
                    answered_empty = true;
                }
                Err(e) => {
                    warn!(provider = provider.provider_name(), error = %e, "Provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        error!("All providers failed or returned an empty response");
        match last_error {
            Some(e) if !answered_empty => Err(e),
            _ => Ok(String::new()),
        }
    }

    fn provider_name(&self) -> &str {
        "cascade"
    }

    fn model_name(&self) -> &str {
        self.providers
            .first()
            .map(|p| p.model_name())
            .unwrap_or("none")
    }
}
