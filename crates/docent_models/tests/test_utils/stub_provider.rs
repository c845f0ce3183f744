//! Named generator with a fixed reply, for cascade tests.

use async_trait::async_trait;
use docent_core::Prompt;
use docent_error::{DocentError, DocentResult, ModelsError, ModelsErrorKind};
use docent_interface::TextGenerator;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What a stub provider answers with.
#[derive(Debug, Clone)]
pub enum StubReply {
    Text(String),
    Error(ModelsErrorKind),
}

/// A provider that always gives the same reply and counts calls.
pub struct StubProvider {
    name: String,
    reply: StubReply,
    calls: AtomicUsize,
}

impl StubProvider {
    /// Provider answering with `text`.
    pub fn text(name: &str, text: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            reply: StubReply::Text(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Provider failing with `kind`.
    pub fn error(name: &str, kind: ModelsErrorKind) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            reply: StubReply::Error(kind),
            calls: AtomicUsize::new(0),
        })
    }

    /// Number of calls to `complete`.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubProvider {
    async fn complete(
        &self,
        _prompt: &Prompt,
        _temperature: f32,
        _max_tokens: u32,
    ) -> DocentResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            StubReply::Text(text) => Ok(text.clone()),
            StubReply::Error(kind) => Err(DocentError::from(ModelsError::new(kind.clone()))),
        }
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}
