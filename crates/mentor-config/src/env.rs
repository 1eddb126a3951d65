//! Environment overrides and `.env` loading.

use std::path::{Path, PathBuf};

use mentor_common::ConfigError;
use tracing::{debug, warn};

use crate::schema::MentorConfig;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const PORT_VAR: &str = "PORT";
pub const ALLOWED_ORIGINS_VAR: &str = "MENTOR_ALLOWED_ORIGINS";

/// Load environment variables from the first `.env` file found (KEY=VALUE
/// lines). Variables already present in the environment win.
///
/// Mutates the process environment, so call it from `main` before any
/// runtime or other thread is started.
pub fn load_dotenv(candidates: &[PathBuf]) -> Option<PathBuf> {
    for path in candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for (key, value) in parse_dotenv(&contents) {
                if std::env::var(&key).is_err() {
                    std::env::set_var(key, value);
                }
            }
            debug!("loaded environment from {}", path.display());
            return Some(path.clone());
        }
    }
    None
}

pub(crate) fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let key = key.trim().trim_start_matches("export ").trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.to_string(), value.to_string())
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Apply `PORT` and `MENTOR_ALLOWED_ORIGINS` from the process environment.
pub fn apply_env_overrides(config: &mut MentorConfig) {
    apply_overrides_from(config, |name| std::env::var(name).ok());
}

pub(crate) fn apply_overrides_from(
    config: &mut MentorConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(raw) = lookup(PORT_VAR) {
        match raw.trim().parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(e) => warn!("ignoring {PORT_VAR}={raw:?}: {e}"),
        }
    }

    if let Some(raw) = lookup(ALLOWED_ORIGINS_VAR) {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
        if origins.is_empty() {
            warn!("ignoring empty {ALLOWED_ORIGINS_VAR}");
        } else {
            config.server.allowed_origins = origins;
        }
    }
}

/// Read the provider credential from the environment.
pub fn provider_api_key() -> Result<String, ConfigError> {
    match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(ConfigError::MissingCredential(format!(
            "{API_KEY_VAR} is not set"
        ))),
    }
}

/// Default `.env` search locations relative to a working directory.
pub fn dotenv_candidates(cwd: &Path) -> Vec<PathBuf> {
    vec![cwd.join(".env"), cwd.join("..").join(".env")]
}
