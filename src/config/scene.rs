//! Full configuration file format.

use super::{
    positive, AutoswitchConfig, CameraConfig, ConfigError, ConsoleConfig, OccluderConfig,
    OccluderShape, SandboxConfig, TargetConfig,
};
use crate::geometry::LayerMask;
use crate::ids::TargetId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Top-level configuration: cameras, consoles, sandbox world and run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub cameras: Vec<CameraConfig>,
    pub consoles: Vec<ConsoleConfig>,
    pub sandbox: SandboxConfig,
    pub simulation: SimulationConfig,
}

/// Simulation run settings used by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks to run if not continuous.
    pub ticks: u32,
    /// Fixed time step in seconds.
    pub dt: f32,
    /// Seed for sandbox target movement.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            dt: 1.0 / 30.0,
            seed: 7,
        }
    }
}

impl SceneConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates cameras, consoles, cross references and the sandbox.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for camera in &self.cameras {
            camera.validate()?;
            if !names.insert(camera.name.as_str()) {
                return Err(ConfigError::DuplicateCamera(camera.name.clone()));
            }
        }

        for console in &self.consoles {
            console.validate()?;
            if let Some(unknown) = console
                .cameras
                .iter()
                .find(|name| !names.contains(name.as_str()))
            {
                return Err(ConfigError::UnknownCamera {
                    console: console.name.clone(),
                    camera: unknown.clone(),
                });
            }
        }

        if !positive(self.simulation.dt) {
            return Err(ConfigError::InvalidTimeStep(self.simulation.dt));
        }

        self.sandbox.validate()
    }

    /// A small two-camera scene with one console and a wandering intruder.
    pub fn demo() -> Self {
        let mut lobby = CameraConfig::named("Lobby", Vec3::new(-8.0, 3.0, 0.0));
        lobby.mount_yaw = 0.0;
        lobby.patrol.angle_swept = 90.0;
        lobby.patrol.sweep_speed = 15.0;

        let mut vault = CameraConfig::named("Vault", Vec3::new(8.0, 3.0, 0.0));
        vault.mount_yaw = 180.0;
        vault.detection.build_rate = 1.0;

        let console = ConsoleConfig {
            name: "Guard Desk".to_string(),
            cameras: vec!["Lobby".to_string(), "Vault".to_string()],
            autoswitch: AutoswitchConfig {
                enabled: true,
                start_time: 5.0,
                interval: 4.0,
            },
        };

        let sandbox = SandboxConfig {
            arena_half_extent: 12.0,
            targets: vec![
                TargetConfig {
                    id: TargetId(1),
                    tags: vec!["Player".to_string()],
                    position: Vec3::new(0.0, 0.0, 1.0),
                    radius: 0.5,
                    height: 1.8,
                    wander_speed: 2.5,
                },
                TargetConfig {
                    id: TargetId(2),
                    tags: vec!["Crate".to_string()],
                    position: Vec3::new(2.0, 0.0, -3.0),
                    radius: 0.5,
                    height: 1.0,
                    wander_speed: 0.0,
                },
            ],
            occluders: vec![OccluderConfig {
                shape: OccluderShape::Box {
                    min: Vec3::new(-1.0, 0.0, 4.0),
                    max: Vec3::new(1.0, 4.0, 6.0),
                },
                layers: LayerMask::DEFAULT,
            }],
        };

        Self {
            cameras: vec![lobby, vault],
            consoles: vec![console],
            sandbox,
            simulation: SimulationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_config_valid() {
        assert!(SceneConfig::demo().validate().is_ok());
    }

    #[test]
    fn test_console_unknown_camera_rejected() {
        let mut config = SceneConfig::demo();
        config.consoles[0].cameras.push("Roof".to_string());
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownCamera {
                console: "Guard Desk".to_string(),
                camera: "Roof".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_camera_rejected() {
        let mut config = SceneConfig::demo();
        config.cameras[1].name = "Lobby".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateCamera(_))
        ));
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
            [[cameras]]
            name = "Hall"
            position = [0.0, 3.0, 0.0]

            [cameras.patrol]
            angle_swept = 120.0

            [cameras.detection]
            allowed_tags = ["Player", "Guard"]

            [[consoles]]
            name = "Desk"
            cameras = ["Hall"]

            [[sandbox.targets]]
            id = 4
            tags = ["Player"]
            position = [5.0, 0.0, 0.0]

            [[sandbox.occluders]]
            shape = "sphere"
            center = [2.0, 1.0, 0.0]
            radius = 1.0
        "#;

        let config = SceneConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.cameras.len(), 1);
        assert_eq!(config.cameras[0].patrol.angle_swept, 120.0);
        assert_eq!(config.cameras[0].patrol.sweep_speed, 6.0);
        assert_eq!(config.cameras[0].detection.allowed_tags.len(), 2);
        assert_eq!(config.sandbox.targets[0].id, TargetId(4));
        assert_eq!(config.sandbox.targets[0].radius, 0.5);
        assert!(matches!(
            config.sandbox.occluders[0].shape,
            OccluderShape::Sphere { .. }
        ));
    }

    #[test]
    fn test_nan_in_toml_rejected() {
        let toml = r#"
            [[cameras]]
            name = "Hall"
            mount_yaw = nan

            [cameras.patrol]
            default_pitch = nan
        "#;
        assert!(matches!(
            SceneConfig::from_toml_str(toml),
            Err(ConfigError::NonFinite { which: "mount yaw", .. })
        ));
    }

    #[test]
    fn test_parse_error_reported() {
        assert!(matches!(
            SceneConfig::from_toml_str("cameras = 3"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
