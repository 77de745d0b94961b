//! Visibility probe: field-of-view cone plus unobstructed line of sight.

use super::{LayerMask, ObstructionQuery, MIN_DIRECTION_LENGTH, UP};
use crate::config::DetectionConfig;
use crate::ids::TargetId;
use glam::Vec3;

/// Observer pose used for a visibility test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub position: Vec3,
    /// Lens forward direction. Need not be normalized.
    pub forward: Vec3,
}

impl Observer {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

/// Per-camera visibility constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityProbe {
    /// Cosine of the field-of-view half-angle.
    pub half_angle_cos: f32,
    /// Maximum line-of-sight distance.
    pub range: f32,
    /// Height added to target positions (eye level).
    pub vertical_offset: f32,
    /// Layers the line-of-sight ray collides with.
    pub layers: LayerMask,
}

impl VisibilityProbe {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            half_angle_cos: config.half_angle.to_radians().cos(),
            range: config.range,
            vertical_offset: config.vertical_offset,
            layers: config.layer_mask,
        }
    }

    /// Point on the target the camera aims at.
    #[inline]
    pub fn aim_point(&self, target_position: Vec3) -> Vec3 {
        target_position + UP * self.vertical_offset
    }

    /// Tests whether `target`, standing at `target_position`, is visible.
    pub fn is_visible(
        &self,
        observer: &Observer,
        target: TargetId,
        target_position: Vec3,
        obstruction: &dyn ObstructionQuery,
    ) -> bool {
        is_visible(
            observer,
            self.half_angle_cos,
            target,
            self.aim_point(target_position),
            self.range,
            self.layers,
            obstruction,
        )
    }
}

/// Returns true if `aim_point` lies inside the observer's cone and the first
/// thing a ray toward it hits (within `range`) is `target` itself.
///
/// Coincident positions and a zero forward vector are never visible.
pub fn is_visible(
    observer: &Observer,
    half_angle_cos: f32,
    target: TargetId,
    aim_point: Vec3,
    range: f32,
    layers: LayerMask,
    obstruction: &dyn ObstructionQuery,
) -> bool {
    let offset = aim_point - observer.position;
    let distance = offset.length();
    if !distance.is_finite() || distance < MIN_DIRECTION_LENGTH {
        return false;
    }
    let direction = offset / distance;

    let forward = observer.forward.normalize_or_zero();
    if forward == Vec3::ZERO {
        return false;
    }

    if forward.dot(direction) < half_angle_cos {
        return false;
    }

    match obstruction.raycast(observer.position, direction, range, layers) {
        Some(hit) => hit.target == Some(target),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RayHit;

    /// Reports a single target body at a fixed distance, optionally behind a wall.
    struct Corridor {
        target: TargetId,
        target_distance: f32,
        wall_distance: Option<f32>,
    }

    impl ObstructionQuery for Corridor {
        fn raycast(
            &self,
            origin: Vec3,
            direction: Vec3,
            max_distance: f32,
            _layers: LayerMask,
        ) -> Option<RayHit> {
            let (distance, target) = match self.wall_distance {
                Some(wall) if wall < self.target_distance => (wall, None),
                _ => (self.target_distance, Some(self.target)),
            };
            (distance <= max_distance).then(|| RayHit {
                distance,
                point: origin + direction * distance,
                target,
            })
        }
    }

    fn probe() -> VisibilityProbe {
        VisibilityProbe {
            half_angle_cos: 30f32.to_radians().cos(),
            range: 10.0,
            vertical_offset: 0.0,
            layers: LayerMask::ALL,
        }
    }

    fn corridor(target_distance: f32, wall_distance: Option<f32>) -> Corridor {
        Corridor {
            target: TargetId(1),
            target_distance,
            wall_distance,
        }
    }

    #[test]
    fn test_target_straight_ahead_visible() {
        let observer = Observer::new(Vec3::ZERO, Vec3::X);
        let world = corridor(5.0, None);
        assert!(probe().is_visible(&observer, TargetId(1), Vec3::new(5.0, 0.0, 0.0), &world));
    }

    #[test]
    fn test_target_outside_cone_not_visible() {
        let observer = Observer::new(Vec3::ZERO, Vec3::X);
        let world = corridor(5.0, None);
        // 45 degrees off axis with a 30 degree half-angle
        let position = Vec3::new(5.0, 0.0, 5.0);
        assert!(!probe().is_visible(&observer, TargetId(1), position, &world));
    }

    #[test]
    fn test_wall_blocks_line_of_sight() {
        let observer = Observer::new(Vec3::ZERO, Vec3::X);
        let world = corridor(5.0, Some(3.0));
        assert!(!probe().is_visible(&observer, TargetId(1), Vec3::new(5.0, 0.0, 0.0), &world));
    }

    #[test]
    fn test_other_target_in_front_blocks() {
        let observer = Observer::new(Vec3::ZERO, Vec3::X);
        let world = corridor(5.0, None);
        assert!(!probe().is_visible(&observer, TargetId(2), Vec3::new(5.0, 0.0, 0.0), &world));
    }

    #[test]
    fn test_out_of_range_not_visible() {
        let observer = Observer::new(Vec3::ZERO, Vec3::X);
        let world = corridor(12.0, None);
        assert!(!probe().is_visible(&observer, TargetId(1), Vec3::new(12.0, 0.0, 0.0), &world));
    }

    #[test]
    fn test_coincident_position_not_visible() {
        let observer = Observer::new(Vec3::ONE, Vec3::X);
        let world = corridor(0.0, None);
        assert!(!probe().is_visible(&observer, TargetId(1), Vec3::ONE, &world));
    }

    #[test]
    fn test_zero_forward_not_visible() {
        let observer = Observer::new(Vec3::ZERO, Vec3::ZERO);
        let world = corridor(5.0, None);
        assert!(!probe().is_visible(&observer, TargetId(1), Vec3::new(5.0, 0.0, 0.0), &world));
    }

    #[test]
    fn test_vertical_offset_raises_aim_point() {
        let mut probe = probe();
        probe.vertical_offset = 1.5;
        assert_eq!(probe.aim_point(Vec3::ZERO), Vec3::new(0.0, 1.5, 0.0));
    }
}
