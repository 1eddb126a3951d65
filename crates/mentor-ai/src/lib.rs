//! Conversation core for Mentor.
//!
//! Provides the pieces of one tutoring chat:
//! - `MessageStore`: the ordered, append-only transcript
//! - `PromptBuilder`: turns a transcript + problem URL into a provider request
//! - `CompletionGateway`: one outbound completion call, classified failures
//! - `SessionController`: the Idle / AwaitingReply turn cycle with epoch-based
//!   reset protection
//! - Token usage tracking

pub mod openai;
pub mod prompt;
pub mod session;
pub mod store;
pub mod token_tracker;
pub mod turn;

use async_trait::async_trait;

pub use openai::{OpenAiClient, OpenAiConfig};
pub use prompt::{ChatMessage, ChatRole, CompletionRequest, PromptBuilder, PromptError};
pub use session::{
    PendingTurn, SessionController, SessionStatus, SubmitError, TurnOutcome, FAILURE_NOTICE,
};
pub use store::{MessageStore, StoreError};
pub use token_tracker::TokenTracker;
pub use turn::{Author, Turn};

/// Boundary to an external completion provider.
///
/// Implementations make exactly one outbound call per `complete` and never
/// retry, cache or partially apply a response.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError>;
}

/// A successful completion: the provider's single top choice, unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    /// Model that served the request, as reported by the provider.
    pub model: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Classification of a failed completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    AuthFailure,
    RateLimited,
    ProviderUnavailable,
    MalformedResponse,
    /// The request violated the gateway's input constraints and was never sent.
    InvalidRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("credentials rejected: {0}")]
    AuthFailure(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GatewayError::AuthFailure(_) => FailureKind::AuthFailure,
            GatewayError::RateLimited(_) => FailureKind::RateLimited,
            GatewayError::ProviderUnavailable(_) => FailureKind::ProviderUnavailable,
            GatewayError::MalformedResponse(_) => FailureKind::MalformedResponse,
            GatewayError::InvalidRequest(_) => FailureKind::InvalidRequest,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            GatewayError::AuthFailure(d)
            | GatewayError::RateLimited(d)
            | GatewayError::ProviderUnavailable(d)
            | GatewayError::MalformedResponse(d)
            | GatewayError::InvalidRequest(d) => d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_kind_and_detail() {
        let err = GatewayError::RateLimited("slow down".into());
        assert_eq!(err.kind(), FailureKind::RateLimited);
        assert_eq!(err.detail(), "slow down");
        assert_eq!(err.to_string(), "rate limited: slow down");
    }

    #[test]
    fn failure_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::ProviderUnavailable).unwrap();
        assert_eq!(json, "\"provider_unavailable\"");
    }

    #[test]
    fn token_usage_total_saturates() {
        let usage = TokenUsage {
            input_tokens: u64::MAX,
            output_tokens: 5,
        };
        assert_eq!(usage.total_tokens(), u64::MAX);
    }
}
