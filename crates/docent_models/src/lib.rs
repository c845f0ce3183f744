//! LLM provider adapters for Docent.
//!
//! This crate provides concrete [`TextGenerator`](docent_interface::TextGenerator)
//! implementations:
//! - [`OpenAiCompatibleClient`] talks to any OpenAI-compatible
//!   `/chat/completions` endpoint, retrying transport failures
//! - [`ProviderCascade`] falls through a list of generators until one answers
//!
//! # Example
//!
//! ```no_run
//! use docent_core::Prompt;
//! use docent_interface::TextGenerator;
//! use docent_models::ProviderCascade;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cascade = ProviderCascade::from_env()?;
//! let text = cascade
//!     .complete(&Prompt::new("只输出 JSON", "请生成脚本"), 0.2, 1024)
//!     .await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cascade;
mod client;
mod settings;
mod wire;

pub use cascade::ProviderCascade;
pub use client::OpenAiCompatibleClient;
pub use settings::{DEFAULT_TIMEOUT_SECS, OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL, ProviderSettings};
pub use wire::{ChatCompletionRequest, ChatCompletionResponse, Choice, ChoiceMessage, Message, Usage};
