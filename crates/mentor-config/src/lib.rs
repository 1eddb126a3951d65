//! Mentor configuration system.
//!
//! TOML-based configuration for the completion provider, the HTTP server
//! and logging. Every section uses serde defaults so a partial (or empty)
//! config file works out of the box. Environment variables override the
//! file for the values a deployment usually injects (`PORT`,
//! `MENTOR_ALLOWED_ORIGINS`); the provider credential only ever comes from
//! the environment.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mentor_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("listening on port {}", config.server.port);
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::{apply_env_overrides, dotenv_candidates, load_dotenv, provider_api_key};
pub use schema::{LogLevel, LoggingConfig, MentorConfig, ProviderConfig, ServerConfig};

use std::path::Path;

use mentor_common::ConfigError;

/// Load config from the platform default path, apply env overrides, validate.
pub fn load_config() -> Result<MentorConfig, ConfigError> {
    let mut config = toml_loader::load_default()?;
    apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Same as [`load_config`] but reading an explicit file.
pub fn load_config_from(path: &Path) -> Result<MentorConfig, ConfigError> {
    let mut config = toml_loader::load_from_path(path)?;
    apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}
