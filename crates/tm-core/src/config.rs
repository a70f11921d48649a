//! Configuration types and loading
//!
//! Configuration lives at `<home>/.config/taskmate/config.toml`; every
//! section and field is optional and defaulted, so a missing file is a
//! fully valid configuration.

use crate::home::get_home_dir;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Core configuration
    #[serde(default)]
    pub core: CoreConfig,
    /// Messaging configuration
    #[serde(default)]
    pub messaging: MessagingConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Team used when a tool call names none
    pub default_team: String,
    /// Sender identity for outgoing messages
    pub identity: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_team: "default".to_string(),
            identity: "team-lead".to_string(),
        }
    }
}

/// Messaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Messages longer than this are truncated before delivery
    pub max_message_len: usize,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            max_message_len: 4096,
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn config_path() -> Result<PathBuf> {
        Ok(get_home_dir()?.join(".config").join("taskmate").join("config.toml"))
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }
}
