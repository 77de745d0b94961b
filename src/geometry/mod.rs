//! Field-of-view and line-of-sight tests.
//!
//! The engine's raycasting is consumed through [`ObstructionQuery`] and
//! target positions through [`TargetLocator`]; the probe itself is a pure,
//! stateless function of its inputs.

mod layers;
mod probe;

pub use layers::LayerMask;
pub use probe::{is_visible, Observer, VisibilityProbe};

use crate::ids::TargetId;
use glam::Vec3;

/// World up axis.
pub const UP: Vec3 = Vec3::Y;

/// Directions shorter than this are treated as degenerate.
pub const MIN_DIRECTION_LENGTH: f32 = 1e-4;

/// First blocking surface along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// The target that was hit, or `None` for static geometry.
    pub target: Option<TargetId>,
}

/// Straight-line obstruction query (engine raycast).
pub trait ObstructionQuery {
    /// Returns the first surface hit along `direction` (normalized) from
    /// `origin`, no further than `max_distance`, on the given layers.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<RayHit>;
}

/// Lookup of current target positions.
pub trait TargetLocator {
    /// Current feet position of the target, if it still exists.
    fn position(&self, target: TargetId) -> Option<Vec3>;
}
