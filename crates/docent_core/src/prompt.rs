//! Provider-agnostic prompt pair.

use serde::{Deserialize, Serialize};

/// A system instruction and a user message, handed to a generation capability.
///
/// # Examples
///
/// ```
/// use docent_core::Prompt;
///
/// let prompt = Prompt::new("只输出 JSON", "请生成脚本");
/// assert_eq!(prompt.system(), "只输出 JSON");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prompt {
    system: String,
    user: String,
}

impl Prompt {
    /// Create a prompt from a system instruction and a user message.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// The system instruction.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// The user message.
    pub fn user(&self) -> &str {
        &self.user
    }
}
