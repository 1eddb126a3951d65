use reqwest::Url;

use crate::turn::{Author, Turn};

use super::{directive, ChatMessage, ChatRole, CompletionRequest, PromptError};

/// Builds `CompletionRequest`s from a transcript snapshot and a problem URL.
///
/// Pure: the same snapshot and problem URL always give the same request.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    /// Keep only the most recent N turns. `None` sends the whole transcript.
    history_limit: Option<usize>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` recent turns. Clamped to one so the newest turn
    /// is always sent.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit.max(1));
        self
    }

    /// Check that `problem_ref` is a plausible absolute http(s) URL.
    /// Returns the trimmed reference on success.
    pub fn validate_problem_ref(problem_ref: &str) -> Result<&str, PromptError> {
        let trimmed = problem_ref.trim();
        if trimmed.is_empty() {
            return Err(PromptError::MissingContext("problem URL is empty".into()));
        }

        let url = Url::parse(trimmed).map_err(|e| {
            PromptError::MissingContext(format!("problem URL {trimmed:?} is not a URL: {e}"))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(PromptError::MissingContext(format!(
                "problem URL {trimmed:?} must use http or https"
            )));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(PromptError::MissingContext(format!(
                "problem URL {trimmed:?} has no host"
            )));
        }

        Ok(trimmed)
    }

    pub fn build(&self, turns: &[Turn], problem_ref: &str) -> Result<CompletionRequest, PromptError> {
        let problem_ref = Self::validate_problem_ref(problem_ref)?;
        let directive = directive::render(problem_ref);

        let window = match self.history_limit {
            Some(limit) => &turns[turns.len().saturating_sub(limit)..],
            None => turns,
        };

        let mut history = Vec::with_capacity(window.len() + 1);
        history.push(ChatMessage {
            role: ChatRole::System,
            text: directive.clone(),
        });
        history.extend(window.iter().map(|turn| ChatMessage {
            role: match turn.author {
                Author::Assistant => ChatRole::Assistant,
                Author::User => ChatRole::User,
            },
            text: turn.text.clone(),
        }));

        Ok(CompletionRequest { directive, history })
    }
}
