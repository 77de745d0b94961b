//! Console configuration.

use super::{positive, ConfigError};
use serde::{Deserialize, Serialize};

/// Configuration for one security console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Console name, used in logs only.
    pub name: String,
    /// Display names of the linked cameras, in cycling order.
    pub cameras: Vec<String>,
    /// Automatic feed cycling.
    pub autoswitch: AutoswitchConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            name: "Console".to_string(),
            cameras: Vec::new(),
            autoswitch: AutoswitchConfig::default(),
        }
    }
}

impl ConsoleConfig {
    /// Validates the console on its own. Camera names are resolved by the scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cameras.is_empty() {
            return Err(ConfigError::NoLinkedCameras(self.name.clone()));
        }
        if self.autoswitch.enabled {
            if !positive(self.autoswitch.interval) {
                return Err(ConfigError::InvalidAutoswitch {
                    console: self.name.clone(),
                    which: "interval",
                    value: self.autoswitch.interval,
                });
            }
            if !positive(self.autoswitch.start_time) {
                return Err(ConfigError::InvalidAutoswitch {
                    console: self.name.clone(),
                    which: "start time",
                    value: self.autoswitch.start_time,
                });
            }
        }
        Ok(())
    }
}

/// Automatic feed cycling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoswitchConfig {
    /// Cycle cameras on a timer.
    pub enabled: bool,
    /// Delay before the next automatic switch after a manual click (seconds).
    pub start_time: f32,
    /// Steady interval between automatic switches (seconds).
    pub interval: f32,
}

impl Default for AutoswitchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            start_time: 10.0,
            interval: 15.0,
        }
    }
}
