//! OpenAI client configuration.

use std::fmt;
use std::time::Duration;

use mentor_common::ConfigError;
use mentor_config::ProviderConfig;

/// OpenAI client configuration.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_settings(&ProviderConfig::default(), api_key)
    }

    /// Build from the `[provider]` config section plus a credential.
    pub fn from_settings(settings: &ProviderConfig, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: settings.api_base.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            request_timeout: Duration::from_secs(settings.request_timeout_secs.into()),
            connect_timeout: Duration::from_secs(settings.connect_timeout_secs.into()),
        }
    }

    /// Default settings with the credential taken from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(mentor_config::provider_api_key()?))
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let config = OpenAiConfig::new("sk-very-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn defaults_follow_provider_settings() {
        let config = OpenAiConfig::new("sk-test");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 1500);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let config = OpenAiConfig::new("k").with_api_base("http://localhost:8089/");
        assert_eq!(
            config.completions_url(),
            "http://localhost:8089/v1/chat/completions"
        );
    }

    #[test]
    fn builders_override_fields() {
        let config = OpenAiConfig::new("k")
            .with_model("gpt-4o")
            .with_max_tokens(256)
            .with_temperature(0.1);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 256);
        assert!((config.temperature - 0.1).abs() < f64::EPSILON);
    }
}
