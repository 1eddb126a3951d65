//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator runs them all and
//! collects errors into a single `ConfigError`.

mod helpers;


use crate::schema::MentorConfig;
use mentor_common::ConfigError;

use helpers::{validate_non_empty, validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &MentorConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_provider(&mut errors, config);
    validate_server(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_provider(errors: &mut Vec<String>, config: &MentorConfig) {
    let provider = &config.provider;
    validate_non_empty(errors, "provider.model", &provider.model);
    validate_range(errors, "provider.max_tokens", provider.max_tokens, 1, 16384);
    validate_range_f64(errors, "provider.temperature", provider.temperature, 0.0, 2.0);
    validate_range(
        errors,
        "provider.request_timeout_secs",
        provider.request_timeout_secs,
        5,
        600,
    );
    validate_range(
        errors,
        "provider.connect_timeout_secs",
        provider.connect_timeout_secs,
        1,
        60,
    );

    if !(provider.api_base.starts_with("http://") || provider.api_base.starts_with("https://")) {
        errors.push(format!(
            "provider.api_base = {:?} must be an http(s) URL",
            provider.api_base
        ));
    }
}

fn validate_server(errors: &mut Vec<String>, config: &MentorConfig) {
    let server = &config.server;
    validate_non_empty(errors, "server.host", &server.host);
    if server.port == 0 {
        errors.push("server.port must be non-zero".into());
    }
    if server.allowed_origins.is_empty() {
        errors.push("server.allowed_origins must list at least one origin (use \"*\" for any)".into());
    }
}
