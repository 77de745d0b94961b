//! Sandbox world configuration: targets and occluders used by the CLI and tests.

use super::{positive, ConfigError};
use crate::geometry::LayerMask;
use crate::ids::TargetId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The stand-in world that drives cameras outside a game engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Half extents of the walkable arena on the ground plane (x, z).
    pub arena_half_extent: f32,
    /// Targets placed in the world.
    pub targets: Vec<TargetConfig>,
    /// Static line-of-sight blockers.
    pub occluders: Vec<OccluderConfig>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            arena_half_extent: 20.0,
            targets: Vec::new(),
            occluders: Vec::new(),
        }
    }
}

impl SandboxConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.id) {
                return Err(ConfigError::DuplicateTarget(target.id.0));
            }
        }
        Ok(())
    }
}

/// A target body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub id: TargetId,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Feet position.
    pub position: Vec3,
    /// Horizontal half extent of the body used for raycasts.
    #[serde(default = "default_target_radius")]
    pub radius: f32,
    /// Body height above the feet.
    #[serde(default = "default_target_height")]
    pub height: f32,
    /// Random-walk speed in units per second; zero keeps the target still.
    #[serde(default)]
    pub wander_speed: f32,
}

fn default_target_radius() -> f32 {
    0.5
}

fn default_target_height() -> f32 {
    1.8
}

impl TargetConfig {
    /// A still target with default body dimensions.
    pub fn new(id: u64, tags: &[&str], position: Vec3) -> Self {
        Self {
            id: TargetId(id),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            position,
            radius: default_target_radius(),
            height: default_target_height(),
            wander_speed: 0.0,
        }
    }

    /// Returns true if the target moves.
    pub fn wanders(&self) -> bool {
        positive(self.wander_speed)
    }
}

/// A static occluder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccluderConfig {
    #[serde(flatten)]
    pub shape: OccluderShape,
    #[serde(default)]
    pub layers: LayerMask,
}

/// Occluder geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum OccluderShape {
    /// Axis-aligned box.
    Box { min: Vec3, max: Vec3 },
    /// Sphere.
    Sphere { center: Vec3, radius: f32 },
}
