//! Scene configuration.
//!
//! Angles, rates, thresholds and tag lists are loaded once (usually from a
//! TOML file) and validated before any camera or console is built. Ticking
//! code never re-checks them.

mod camera;
mod console;
mod scene;
mod world;

pub use camera::{CameraConfig, DetectionConfig, PatrolConfig};
pub use console::{AutoswitchConfig, ConsoleConfig};
pub use scene::{SceneConfig, SimulationConfig};
pub use world::{OccluderConfig, OccluderShape, SandboxConfig, TargetConfig};

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("camera {camera:?}: {which} must be finite")]
    NonFinite { camera: String, which: &'static str },
    #[error("camera {camera:?}: sweep arc must be positive (got {value})")]
    InvalidSweepArc { camera: String, value: f32 },
    #[error("camera {camera:?}: sweep speed must be positive (got {value})")]
    InvalidSweepSpeed { camera: String, value: f32 },
    #[error("camera {camera:?}: max rotation speed must be positive (got {value})")]
    InvalidRotationSpeed { camera: String, value: f32 },
    #[error("camera {camera:?}: detection half-angle must be in (0, 180] degrees (got {value})")]
    InvalidHalfAngle { camera: String, value: f32 },
    #[error("camera {camera:?}: detection range must be positive (got {value})")]
    InvalidRange { camera: String, value: f32 },
    #[error("camera {camera:?}: {which} rate must be positive (got {value})")]
    InvalidRate {
        camera: String,
        which: &'static str,
        value: f32,
    },
    #[error("camera {camera:?}: suspicion threshold must be within [0, 1] (got {value})")]
    InvalidThreshold { camera: String, value: f32 },
    #[error("camera {camera:?}: output texture size must be non-zero")]
    InvalidTextureSize { camera: String },
    #[error("duplicate camera name {0:?}")]
    DuplicateCamera(String),
    #[error("console {0:?} has no linked cameras")]
    NoLinkedCameras(String),
    #[error("console {console:?} links unknown camera {camera:?}")]
    UnknownCamera { console: String, camera: String },
    #[error("console {console:?}: autoswitch {which} must be positive (got {value})")]
    InvalidAutoswitch {
        console: String,
        which: &'static str,
        value: f32,
    },
    #[error("simulation time step must be positive (got {0})")]
    InvalidTimeStep(f32),
    #[error("sandbox target {0} declared twice")]
    DuplicateTarget(u64),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Rejects zero, negative and non-finite values.
pub(crate) fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
