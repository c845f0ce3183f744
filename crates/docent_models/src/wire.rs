//! OpenAI-compatible chat-completions wire types.

use docent_core::Prompt;
use serde::{Deserialize, Serialize};

/// Body POSTed to `/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// System instruction (when present) followed by the user message
    pub messages: Vec<Message>,
    /// Output token budget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature chosen by the retry ladder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatCompletionRequest {
    /// Build a request from a prompt pair.
    ///
    /// A blank system instruction is left out of the message list.
    pub fn from_prompt(
        model: impl Into<String>,
        prompt: &Prompt,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        let mut messages = Vec::with_capacity(2);
        if !prompt.system().trim().is_empty() {
            messages.push(Message::system(prompt.system()));
        }
        messages.push(Message::user(prompt.user()));

        Self {
            model: model.into(),
            messages,
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        }
    }
}

/// One chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Message {
    /// "system" or "user"
    pub role: String,
    /// Message text
    pub content: String,
}

impl Message {
    /// Message with an arbitrary role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// System instruction message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// User message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Body returned by `/chat/completions`.
///
/// Only `choices` is required; self-hosted servers often omit the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    /// Completion id, if the server sends one
    #[serde(default)]
    pub id: Option<String>,
    /// Model that answered, if reported
    #[serde(default)]
    pub model: Option<String>,
    /// Candidate answers; only the first is used
    pub choices: Vec<Choice>,
    /// Token accounting, if reported
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, trimmed. Empty when there is none.
    pub fn first_text(&self) -> String {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }
}

/// One candidate answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Choice {
    /// Position among the candidates
    #[serde(default)]
    pub index: u32,
    /// Assistant message
    pub message: ChoiceMessage,
    /// Why generation stopped ("stop", "length", ...)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message inside a choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChoiceMessage {
    /// Usually "assistant"
    #[serde(default)]
    pub role: Option<String>,
    /// Generated content; null when the model refused or only called tools
    #[serde(default)]
    pub content: Option<String>,
}

/// Token accounting for one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Usage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Sum of both
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_system_is_omitted() {
        let request = ChatCompletionRequest::from_prompt("m", &Prompt::new(" ", "你好"), 0.2, 64);
        assert_eq!(request.messages, vec![Message::user("你好")]);
    }

    #[test]
    fn test_null_content_reads_as_empty() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_text(), "");
    }
}
