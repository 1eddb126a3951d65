//! Configuration schema types for Mentor.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod provider;
mod server;
mod system;

pub use provider::*;
pub use server::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Mentor.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MentorConfig {
    pub provider: ProviderConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}
