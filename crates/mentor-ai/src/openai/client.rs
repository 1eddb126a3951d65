//! OpenAI client struct, request building, and response parsing.

use reqwest::StatusCode;

use crate::prompt::{ChatRole, CompletionRequest};
use crate::{Completion, GatewayError, TokenUsage};

use super::config::OpenAiConfig;

/// Longest slice of a provider error body kept in error details.
const ERROR_BODY_LIMIT: usize = 200;

/// OpenAI Chat Completions client.
pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                GatewayError::ProviderUnavailable(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Check the gateway's input constraints before anything goes on the wire.
    pub(crate) fn check_request(request: &CompletionRequest) -> Result<(), GatewayError> {
        match request.history.first() {
            Some(first) if first.role == ChatRole::System => {}
            _ => {
                return Err(GatewayError::InvalidRequest(
                    "history must start with the system directive".into(),
                ))
            }
        }
        if request.history.len() < 2 {
            return Err(GatewayError::InvalidRequest(
                "history holds no conversation turns".into(),
            ));
        }
        Ok(())
    }

    /// Build the JSON request body for the Chat Completions API.
    pub(crate) fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let messages: Vec<_> = request
            .history
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role.as_str(),
                    "content": msg.text,
                })
            })
            .collect();

        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "n": 1,
        })
    }

    /// Parse a successful response body, consuming the first choice only.
    pub(crate) fn parse_response(&self, json: &serde_json::Value) -> Result<Completion, GatewayError> {
        let choices = json["choices"].as_array().ok_or_else(|| {
            GatewayError::MalformedResponse("response has no choices array".into())
        })?;

        let first = choices
            .first()
            .ok_or_else(|| GatewayError::MalformedResponse("response has no choices".into()))?;

        let text = first["message"]["content"]
            .as_str()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                let reason = first["finish_reason"].as_str().unwrap_or("unknown");
                GatewayError::MalformedResponse(format!(
                    "first choice has no text content (finish_reason: {reason})"
                ))
            })?;

        let usage = TokenUsage {
            input_tokens: json["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
            output_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0),
        };

        let model = json["model"]
            .as_str()
            .unwrap_or(&self.config.model)
            .to_string();

        Ok(Completion {
            text: text.to_string(),
            model,
            usage,
        })
    }
}

/// Map a non-success HTTP status to a failure kind.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> GatewayError {
    let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    let detail = format!("HTTP {status}: {snippet}");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::AuthFailure(detail),
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(detail),
        // 5xx, 408 and anything unexpected: the provider could not serve us.
        _ => GatewayError::ProviderUnavailable(detail),
    }
}

/// Map a transport-level failure (connect, timeout, body read) to a failure kind.
pub(crate) fn classify_transport(err: &reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::ProviderUnavailable(format!("request timed out: {err}"))
    } else if err.is_connect() {
        GatewayError::ProviderUnavailable(format!("connection failed: {err}"))
    } else {
        GatewayError::ProviderUnavailable(err.to_string())
    }
}
