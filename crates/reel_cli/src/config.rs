//! Reel configuration file handling

use anyhow::{Context, Result};
use reel_animation::SchedulerConfig;
use reel_core::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = "reel.toml";

/// Top-level Reel configuration (reel.toml)
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReelConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl ReelConfig {
    /// Load configuration from a file or a directory containing reel.toml
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        let config: ReelConfig = toml::from_str(content)?;
        config.scheduler.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Write the default configuration to `path`
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            anyhow::bail!(
                "{} already exists. Pass --force to overwrite it.",
                path.display()
            );
        }
        fs::write(path, Self::default().to_toml()?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ReelConfig::parse("").unwrap();
        assert_eq!(config, ReelConfig::default());
        assert_eq!(config.playback.fps, 30.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config = ReelConfig::parse(
            r#"
            [playback]
            fps = 60.0

            [scheduler]
            strict = true

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.playback.fps, 60.0);
        assert_eq!(config.playback.start_frame, 0);
        assert!(config.scheduler.strict);
        assert!(config.scheduler.warn_non_threadable);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_scheduler_section() {
        let result = ReelConfig::parse("[scheduler]\nmax_resumptions_per_tick = 0");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = ReelConfig::default().to_toml().unwrap();
        assert!(text.contains("[playback]"));
        assert_eq!(ReelConfig::parse(&text).unwrap(), ReelConfig::default());
    }

    #[test]
    fn test_write_default_and_load() {
        let dir = std::env::temp_dir().join(format!("reel-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        let _ = fs::remove_file(&path);

        assert_eq!(ReelConfig::load(&dir).unwrap(), ReelConfig::default());

        ReelConfig::write_default(&path, false).unwrap();
        assert!(ReelConfig::write_default(&path, false).is_err());
        ReelConfig::write_default(&path, true).unwrap();
        assert_eq!(ReelConfig::load(&dir).unwrap(), ReelConfig::default());

        fs::remove_dir_all(&dir).unwrap();
    }
}
