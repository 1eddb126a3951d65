use serde::{Deserialize, Serialize};

/// Completion provider settings.
///
/// Generation parameters are fixed per deployment; they are never
/// negotiated per request. The API key is deliberately absent: it is read
/// from `OPENAI_API_KEY` at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the Chat Completions API (without `/v1/...`).
    pub api_base: String,
    pub model: String,
    /// Upper bound on output tokens (valid range: 1-16384).
    pub max_tokens: u32,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Whole-request timeout in seconds (valid range: 5-600).
    pub request_timeout_secs: u32,
    /// TCP connect timeout in seconds (valid range: 1-60).
    pub connect_timeout_secs: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com".into(),
            model: "gpt-4o-mini".into(),
            max_tokens: 1500,
            temperature: 0.7,
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
        }
    }
}
