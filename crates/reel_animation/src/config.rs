//! Scheduler configuration

use crate::error::{Result, ThreadError};
use serde::{Deserialize, Serialize};

/// Scheduler behaviour switches
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Report joins and cancels of unknown tasks as errors
    #[serde(default)]
    pub strict: bool,
    /// Maximum task resumptions within one tick
    #[serde(default = "default_max_resumptions")]
    pub max_resumptions_per_tick: usize,
    /// Maximum frames `run_until_idle` may advance
    #[serde(default)]
    pub max_frames: Option<u64>,
    /// Warn when a spawned future was not marked threadable
    #[serde(default = "default_true")]
    pub warn_non_threadable: bool,
    /// Number of finished tasks whose final state stays queryable
    #[serde(default = "default_outcome_history")]
    pub outcome_history: usize,
}

fn default_max_resumptions() -> usize {
    100_000
}

fn default_outcome_history() -> usize {
    4096
}

fn default_true() -> bool {
    true
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_resumptions_per_tick: default_max_resumptions(),
            max_frames: None,
            warn_non_threadable: true,
            outcome_history: default_outcome_history(),
        }
    }
}

impl SchedulerConfig {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_resumptions_per_tick == 0 {
            return Err(ThreadError::InvalidConfig(
                "max_resumptions_per_tick must be greater than 0".to_string(),
            ));
        }
        if self.max_frames == Some(0) {
            return Err(ThreadError::InvalidConfig(
                "max_frames must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: SchedulerConfig = toml::from_str("").unwrap();
        assert_eq!(config, SchedulerConfig::default());
        assert!(!config.strict);
        assert!(config.warn_non_threadable);
    }

    #[test]
    fn test_partial_toml() {
        let config: SchedulerConfig = toml::from_str("strict = true\nmax_frames = 600").unwrap();
        assert!(config.strict);
        assert_eq!(config.max_frames, Some(600));
        assert_eq!(config.max_resumptions_per_tick, 100_000);
        assert_eq!(config.outcome_history, 4096);
    }

    #[test]
    fn test_validate() {
        assert!(SchedulerConfig::default().validate().is_ok());

        let bad = SchedulerConfig {
            max_resumptions_per_tick: 0,
            ..SchedulerConfig::default()
        };
        assert!(matches!(bad.validate(), Err(ThreadError::InvalidConfig(_))));
    }
}
