//! Request assembly: directive + role-mapped transcript.
//!
//! The directive never becomes a `Turn`; it exists only inside the
//! `CompletionRequest` built for a single call.

mod builder;
pub mod directive;

pub use builder::PromptBuilder;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// Provider-facing payload for one call. Built fresh per turn, never stored.
///
/// `history[0]` is always the directive with role `System`, followed by the
/// transcript in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub directive: String,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("missing problem context: {0}")]
    MissingContext(String),
}
