//! Per-camera configuration.
//!
//! All angles are in degrees and all rates are per second. Conversion to
//! radians happens once when the camera is built.

use super::{positive, ConfigError};
use crate::geometry::LayerMask;
use crate::tracking::Color;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Configuration for one security camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Display name shown on consoles. Must be unique within a scene.
    pub name: String,
    /// World-space position of the lens.
    pub position: Vec3,
    /// Base facing of the mount (yaw about the up axis, degrees).
    pub mount_yaw: f32,
    /// Side length of the square feed render target in pixels.
    pub output_texture_size: u32,
    /// Patrol sweep and rotation limits.
    pub patrol: PatrolConfig,
    /// Detection cone, rates and thresholds.
    pub detection: DetectionConfig,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            name: "Camera".to_string(),
            position: Vec3::new(0.0, 3.0, 0.0),
            mount_yaw: 0.0,
            output_texture_size: 256,
            patrol: PatrolConfig::default(),
            detection: DetectionConfig::default(),
        }
    }
}

impl CameraConfig {
    /// Creates a default camera with the given name and position.
    pub fn named(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            ..Default::default()
        }
    }

    /// Validates every parameter of the camera.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = || self.name.clone();
        let patrol = &self.patrol;
        let detection = &self.detection;

        let placement = [
            ("position", self.position.is_finite()),
            ("mount yaw", self.mount_yaw.is_finite()),
            ("default pitch", patrol.default_pitch.is_finite()),
            ("vertical offset", detection.vertical_offset.is_finite()),
        ];
        if let Some((which, _)) = placement.into_iter().find(|(_, finite)| !finite) {
            return Err(ConfigError::NonFinite {
                camera: camera(),
                which,
            });
        }

        if !positive(patrol.angle_swept) {
            return Err(ConfigError::InvalidSweepArc {
                camera: camera(),
                value: patrol.angle_swept,
            });
        }
        if !positive(patrol.sweep_speed) {
            return Err(ConfigError::InvalidSweepSpeed {
                camera: camera(),
                value: patrol.sweep_speed,
            });
        }
        if !positive(patrol.max_rotation_speed) {
            return Err(ConfigError::InvalidRotationSpeed {
                camera: camera(),
                value: patrol.max_rotation_speed,
            });
        }
        if !positive(detection.half_angle) || detection.half_angle > 180.0 {
            return Err(ConfigError::InvalidHalfAngle {
                camera: camera(),
                value: detection.half_angle,
            });
        }
        if !positive(detection.range) {
            return Err(ConfigError::InvalidRange {
                camera: camera(),
                value: detection.range,
            });
        }
        if !positive(detection.build_rate) {
            return Err(ConfigError::InvalidRate {
                camera: camera(),
                which: "build",
                value: detection.build_rate,
            });
        }
        if !positive(detection.decay_rate) {
            return Err(ConfigError::InvalidRate {
                camera: camera(),
                which: "decay",
                value: detection.decay_rate,
            });
        }
        if !(0.0..=1.0).contains(&detection.suspicion_threshold) {
            return Err(ConfigError::InvalidThreshold {
                camera: camera(),
                value: detection.suspicion_threshold,
            });
        }
        if self.output_texture_size == 0 {
            return Err(ConfigError::InvalidTextureSize { camera: camera() });
        }
        Ok(())
    }
}

/// Patrol sweep and rotation limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    /// Fixed downward tilt of the lens while patrolling (degrees).
    pub default_pitch: f32,
    /// Total sweep arc (degrees); the yaw oscillates within half of it each side.
    pub angle_swept: f32,
    /// Sweep angular speed (degrees per second).
    pub sweep_speed: f32,
    /// Maximum physical rotation rate (degrees per second).
    pub max_rotation_speed: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            default_pitch: 20.0,
            angle_swept: 60.0,
            sweep_speed: 6.0,
            max_rotation_speed: 45.0,
        }
    }
}

/// Detection cone, accumulation rates and suspicion threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Half-angle of the field-of-view cone (degrees).
    pub half_angle: f32,
    /// Maximum detection distance; also the radius of the detection volume.
    pub range: f32,
    /// Height added to target positions to approximate eye level.
    pub vertical_offset: f32,
    /// Detection level gained per second while visible.
    pub build_rate: f32,
    /// Detection level lost per second while not visible.
    pub decay_rate: f32,
    /// Level at which the camera stops patrolling and gazes at the target.
    pub suspicion_threshold: f32,
    /// Tags that make an object trackable.
    pub allowed_tags: Vec<String>,
    /// Layers considered by line-of-sight raycasts.
    pub layer_mask: LayerMask,
    /// Indicator color with nothing detected.
    pub nothing_color: Color,
    /// Indicator color at full detection.
    pub detected_color: Color,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            half_angle: 30.0,
            range: 15.0,
            vertical_offset: 1.0,
            build_rate: 0.5,
            decay_rate: 0.25,
            suspicion_threshold: 0.5,
            allowed_tags: vec!["Player".to_string()],
            layer_mask: LayerMask::ALL,
            nothing_color: Color::GREEN,
            detected_color: Color::RED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_valid() {
        assert!(CameraConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_sweep_arc_rejected() {
        let mut config = CameraConfig::default();
        config.patrol.angle_swept = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSweepArc { .. })
        ));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let mut config = CameraConfig::default();
        config.detection.suspicion_threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_nan_rate_rejected() {
        let mut config = CameraConfig::default();
        config.detection.decay_rate = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRate { which: "decay", .. })
        ));
    }

    #[test]
    fn test_non_finite_placement_rejected() {
        let mut config = CameraConfig::default();
        config.mount_yaw = f32::NAN;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFinite {
                camera: "Camera".into(),
                which: "mount yaw",
            })
        );

        let mut config = CameraConfig::default();
        config.position.y = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { which: "position", .. })
        ));

        let mut config = CameraConfig::default();
        config.patrol.default_pitch = f32::NEG_INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { which: "default pitch", .. })
        ));

        let mut config = CameraConfig::default();
        config.detection.vertical_offset = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { which: "vertical offset", .. })
        ));
    }
}
