//! Where the config file lives.

use std::path::{Path, PathBuf};

use mentor_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

pub const APP_DIR: &str = "mentor";
pub const CONFIG_FILE: &str = "config.toml";

/// `<platform config dir>/mentor/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or_else(|| {
        ConfigError::ParseError("no platform config directory (is $HOME set?)".into())
    })?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}

/// Write the commented template to `path`, creating parent directories.
/// An existing file is left untouched.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default_config_toml())
    };
    write().map_err(|e| ConfigError::ParseError(format!("cannot write {}: {e}", path.display())))?;

    info!(path = %path.display(), "Wrote default config");
    Ok(())
}
