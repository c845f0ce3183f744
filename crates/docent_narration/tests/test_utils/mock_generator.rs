//! Scripted text generator for testing.

use async_trait::async_trait;
use docent_core::Prompt;
use docent_error::{DocentError, DocentResult, ModelsError, ModelsErrorKind};
use docent_interface::TextGenerator;
use std::sync::{Arc, Mutex};

/// A single scripted response (text or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(ModelsErrorKind),
}

/// Behavior configuration for mock responses.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always return the given response
    Always(MockResponse),
    /// Return responses in order, then empty text
    Sequence(Vec<MockResponse>),
}

/// One call observed by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: Prompt,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Mock generator that replays scripted responses and records every call.
pub struct MockGenerator {
    behavior: MockBehavior,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockGenerator {
    /// Always return `text`.
    pub fn new_text(text: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Always(MockResponse::Text(text.into())))
    }

    /// Always fail with `error`.
    pub fn new_error(error: ModelsErrorKind) -> Self {
        Self::new_with_behavior(MockBehavior::Always(MockResponse::Error(error)))
    }

    /// Replay `responses` in order.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::new_with_behavior(MockBehavior::Sequence(responses))
    }

    /// Mock with custom behavior.
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of calls to `complete`.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn complete(
        &self,
        prompt: &Prompt,
        temperature: f32,
        max_tokens: u32,
    ) -> DocentResult<String> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                prompt: prompt.clone(),
                temperature,
                max_tokens,
            });
            calls.len() - 1
        };

        let response = match &self.behavior {
            MockBehavior::Always(response) => Some(response.clone()),
            MockBehavior::Sequence(responses) => responses.get(index).cloned(),
        };

        match response {
            Some(MockResponse::Text(text)) => Ok(text),
            Some(MockResponse::Error(kind)) => Err(DocentError::from(ModelsError::new(kind))),
            None => Ok(String::new()),
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
