//! Scheduler configuration
//!
//! Values can be loaded from a TOML file; anything left out falls back to
//! the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SchedulerError};
use crate::core::types::Priority;
use crate::plugin::{NPC_PLUGIN_PRIORITY, SCHEDULER_PLUGIN_PRIORITY};

/// Configuration for a scheduler instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seed for the scheduler's random source
    ///
    /// `None` draws a seed from the OS. Fix this for regression tests and
    /// replayable sessions.
    pub seed: Option<u64>,

    /// Execution priority of the scheduler in the turn pipeline
    ///
    /// Must stay below the NPC plugin priority so timers observe the world
    /// after NPCs have acted.
    pub plugin_priority: Priority,

    /// Catch panics raised inside daemon and fuse callbacks
    ///
    /// When enabled a panicking callback is reported like one returning
    /// `Err`. When disabled the panic unwinds out of `tick`.
    pub isolate_panics: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            plugin_priority: SCHEDULER_PLUGIN_PRIORITY,
            isolate_panics: true,
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with a fixed seed and defaults for everything else
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SchedulerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.plugin_priority >= NPC_PLUGIN_PRIORITY {
            return Err(SchedulerError::InvalidConfig(format!(
                "plugin_priority ({}) must be below the NPC plugin priority ({})",
                self.plugin_priority, NPC_PLUGIN_PRIORITY
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SchedulerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.plugin_priority, SCHEDULER_PLUGIN_PRIORITY);
        assert!(config.isolate_panics);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SchedulerConfig::from_toml_str("seed = 12345").unwrap();
        assert_eq!(config.seed, Some(12345));
        assert_eq!(config.plugin_priority, SCHEDULER_PLUGIN_PRIORITY);
        assert!(config.isolate_panics);
    }

    #[test]
    fn test_priority_above_npcs_rejected() {
        let result = SchedulerConfig::from_toml_str("plugin_priority = 150");
        assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let result = SchedulerConfig::from_toml_str("seed = \"not a number\"");
        assert!(matches!(result, Err(SchedulerError::TomlError(_))));
    }
}
