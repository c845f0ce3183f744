use crate::{ChatCompletionRequest, ChatCompletionResponse, ProviderSettings};
use async_trait::async_trait;
use docent_core::Prompt;
use docent_error::{DocentResult, ModelsError, ModelsErrorKind, ModelsResult};
use docent_interface::TextGenerator;
use std::time::Duration;
use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{debug, error, instrument, warn};

/// Characters of an error body kept in [`ModelsErrorKind::HttpStatus`].
const ERROR_BODY_CHARS: usize = 300;

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    /// Create a client for the given provider.
    #[instrument(skip(settings), fields(provider = %settings.name, model = %settings.model))]
    pub fn new(settings: ProviderSettings) -> ModelsResult<Self> {
        debug!("Creating chat-completions client");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                error!("Failed to build HTTP client: {}", e);
                ModelsError::new(ModelsErrorKind::Request(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;
        Ok(Self { settings, client })
    }

    /// Get the provider settings
    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Send one chat completion request without retrying.
    #[instrument(skip(self, request), fields(provider = %self.settings.name, model = %request.model))]
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> ModelsResult<ChatCompletionResponse> {
        let url = self.settings.endpoint();
        debug!("Sending chat completion request to {}", url);

        let mut req = self
            .client
            .post(&url)
            .json(request)
            .header("Content-Type", "application/json");

        if let Some(api_key) = &self.settings.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await.map_err(|e| {
            error!("Request failed: {}", e);
            ModelsError::new(ModelsErrorKind::Request(format!("Request failed: {}", e)))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Provider returned error");
            return Err(ModelsError::new(ModelsErrorKind::HttpStatus {
                status_code: status.as_u16(),
                message: body.chars().take(ERROR_BODY_CHARS).collect(),
            }));
        }

        let result = response.json().await.map_err(|e| {
            error!("Failed to parse response: {}", e);
            ModelsError::new(ModelsErrorKind::ResponseParsing(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        debug!("Chat completion successful");
        Ok(result)
    }

    /// Send a request, retrying transport failures with exponential backoff.
    ///
    /// The first failure decides the backoff schedule. Errors that are not
    /// retryable (auth, bad request, malformed body) fail immediately.
    #[instrument(skip(self, request), fields(provider = %self.settings.name))]
    pub async fn chat_completion_with_retry(
        &self,
        request: &ChatCompletionRequest,
    ) -> ModelsResult<ChatCompletionResponse> {
        let first_error = match self.chat_completion(request).await {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };
        if !self.settings.retry {
            return Err(first_error);
        }
        if !first_error.kind.is_retryable() {
            warn!(error = %first_error, "Permanent provider error, failing immediately");
            return Err(first_error);
        }

        let (initial_ms, max_retries, max_delay_secs) = first_error.kind.retry_strategy_params();
        warn!(
            error = %first_error,
            initial_backoff_ms = initial_ms,
            max_retries,
            max_delay_secs,
            "Provider request failed, will retry with configured strategy"
        );

        let retry_strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(max_retries);

        let response = Retry::spawn(retry_strategy, || async move {
            match self.chat_completion(request).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    if e.kind.is_retryable() {
                        warn!(error = %e, "Provider request failed, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    } else {
                        warn!(error = %e, "Permanent provider error, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await?;

        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleClient {
    #[instrument(skip(self, prompt), fields(provider = %self.settings.name))]
    async fn complete(
        &self,
        prompt: &Prompt,
        temperature: f32,
        max_tokens: u32,
    ) -> DocentResult<String> {
        let request =
            ChatCompletionRequest::from_prompt(&self.settings.model, prompt, temperature, max_tokens);
        let response = self.chat_completion_with_retry(&request).await?;
        Ok(response.first_text())
    }

    fn provider_name(&self) -> &str {
        &self.settings.name
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}
