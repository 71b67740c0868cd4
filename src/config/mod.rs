//! Configuration storage

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::store::{Layout, DEFAULT_TYPING_PROBABILITY};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Layout used by `tui` when none is given on the command line
    pub layout: Layout,
    /// Start in dark mode
    pub dark_mode: bool,
    /// Seconds between simulated typing ticks
    pub typing_interval_secs: u64,
    /// Chance per tick that a peer flips its typing flag
    pub typing_probability: f64,
    /// chrono format for new message timestamps
    pub time_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            dark_mode: false,
            typing_interval_secs: 3,
            typing_probability: DEFAULT_TYPING_PROBABILITY,
            time_format: "%H:%M".to_string(),
        }
    }
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "chat-mock", "chat-mock")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk, falling back to defaults if absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        Self::parse(&content)
    }

    /// Parse and validate TOML config text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.typing_interval_secs == 0 {
            bail!("typing_interval_secs must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.typing_probability) {
            bail!(
                "typing_probability must be between 0 and 1, got {}",
                self.typing_probability
            );
        }
        if StrftimeItems::new(&self.time_format).any(|item| matches!(item, Item::Error)) {
            bail!("Invalid time_format: {}", self.time_format);
        }
        Ok(())
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<PathBuf> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir).context("Failed to create config directory")?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;

        Ok(path)
    }

    pub fn typing_interval(&self) -> Duration {
        Duration::from_secs(self.typing_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.typing_interval(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse("layout = \"whatsapp\"\ndark_mode = true\n").unwrap();
        assert_eq!(config.layout, Layout::Whatsapp);
        assert!(config.dark_mode);
        assert_eq!(config.typing_probability, DEFAULT_TYPING_PROBABILITY);
    }

    #[test]
    fn test_layout_aliases_match_cli() {
        assert_eq!(Config::parse("layout = \"group\"").unwrap().layout, Layout::Messenger);
        assert_eq!(Config::parse("layout = \"chats\"").unwrap().layout, Layout::Whatsapp);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::parse("typing_interval_secs = 0").is_err());
        assert!(Config::parse("typing_probability = 1.5").is_err());
        assert!(Config::parse("time_format = \"%Q\"").is_err());
        assert!(Config::parse("layout = \"irc\"").is_err());
    }

    #[test]
    fn test_roundtrip_toml() {
        let config = Config {
            layout: Layout::Whatsapp,
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }
}
