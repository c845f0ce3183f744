//! The injected generation capability.

use async_trait::async_trait;
use docent_core::Prompt;
use docent_error::DocentResult;
use std::sync::Arc;

/// A text-generation backend the core can call.
///
/// Implementations must be safe to share across tasks; any internal state
/// (connection pools, rate limiters) is the implementation's to synchronize.
///
/// Returning `Ok(String::new())` means "the provider returned nothing" and is
/// treated by callers exactly like a parse failure. Returning `Err` signals
/// that the provider itself failed (network, auth, rate limit).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete a prompt at the given sampling temperature.
    async fn complete(
        &self,
        prompt: &Prompt,
        temperature: f32,
        max_tokens: u32,
    ) -> DocentResult<String>;

    /// Provider name (e.g., "openai", "cascade").
    fn provider_name(&self) -> &str;

    /// Model identifier used for requests.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn complete(
        &self,
        prompt: &Prompt,
        temperature: f32,
        max_tokens: u32,
    ) -> DocentResult<String> {
        (**self).complete(prompt, temperature, max_tokens).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
