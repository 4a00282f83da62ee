//! Configuration management for Showcast

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Default pause between posts and after a failed post, in seconds (90 minutes).
pub const DEFAULT_INTERVAL_SECS: u64 = 5400;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub twitter: TwitterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Root directory of the script archive.
    pub root: String,
    /// Path of the cursor state file.
    pub state_file: String,
    /// Episode count per season, in season order.
    pub seasons: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds to wait after a successful post.
    #[serde(default = "default_interval")]
    pub tweet_interval: u64,
    /// Seconds to wait before retrying a failed post.
    #[serde(default = "default_interval")]
    pub recovery_interval: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tweet_interval: DEFAULT_INTERVAL_SECS,
            recovery_interval: DEFAULT_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Insert an invisible character at a random position of each post so
    /// recurring lines do not trip duplicate-content rejection.
    #[serde(default = "default_true")]
    pub dedup_space: bool,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self { dedup_space: true }
    }
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.archive.seasons.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "archive.seasons",
                reason: "at least one season is required".to_string(),
            }
            .into());
        }
        if let Some(position) = self.archive.seasons.iter().position(|&count| count == 0) {
            return Err(ConfigError::InvalidValue {
                field: "archive.seasons",
                reason: format!("season {} has an episode count of 0", position + 1),
            }
            .into());
        }
        Ok(())
    }

    /// Archive root with tilde expansion applied.
    pub fn archive_root(&self) -> PathBuf {
        expand_path(&self.archive.root)
    }

    /// State file path with tilde expansion applied.
    pub fn state_file(&self) -> PathBuf {
        expand_path(&self.archive.state_file)
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("SHOWCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("showcast").join("config.toml"))
}
