//! Orientation controller.
//!
//! Each tick picks a desired orientation (patrol sweep or gaze at a
//! suspicious target) and moves the physical pivot toward it at a bounded
//! angular rate. The pivot never jumps, so switching between modes is smooth.

use super::{look_rotation, rotate_towards, PatrolSweep, RIG_FORWARD};
use crate::config::{DetectionConfig, PatrolConfig};
use crate::geometry::{TargetLocator, UP};
use crate::ids::TargetId;
use crate::tracking::TrackedTarget;
use glam::{Quat, Vec3};

/// What the camera is currently aiming at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationMode {
    /// Oscillating sweep around the mount's base facing.
    Patrol,
    /// Gazing at a target above the suspicion threshold.
    Tracking(TargetId),
}

/// Drives the physical pivot orientation of one camera.
pub struct OrientationController {
    sweep: PatrolSweep,
    /// Orientation of the pivot's parent (the mount).
    mount: Quat,
    /// Physical pivot orientation in world space.
    rotation: Quat,
    /// Radians per second.
    max_rotation_speed: f32,
    suspicion_threshold: f32,
    vertical_offset: f32,
    mode: OrientationMode,
}

impl OrientationController {
    /// Creates a controller resting at the start of its sweep.
    pub fn new(patrol: &PatrolConfig, detection: &DetectionConfig, mount: Quat) -> Self {
        let sweep = PatrolSweep::new(patrol);
        let rotation = (mount * sweep.local_rotation()).normalize();
        Self {
            sweep,
            mount,
            rotation,
            max_rotation_speed: patrol.max_rotation_speed.to_radians(),
            suspicion_threshold: detection.suspicion_threshold,
            vertical_offset: detection.vertical_offset,
            mode: OrientationMode::Patrol,
        }
    }

    /// Advances one tick and returns the new physical orientation.
    ///
    /// The camera gazes at `current` only when its level is at or above the
    /// suspicion threshold, it was visible this tick and it can be located;
    /// otherwise it patrols.
    pub fn update(
        &mut self,
        dt: f32,
        eye: Vec3,
        current: Option<TrackedTarget>,
        locator: &dyn TargetLocator,
    ) -> Quat {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let gaze = current
            .filter(|t| t.detection_level >= self.suspicion_threshold && t.in_fov)
            .and_then(|t| {
                let aim = locator.position(t.id)? + UP * self.vertical_offset;
                look_rotation(aim - eye).map(|rotation| (t.id, rotation))
            });

        let (mode, desired) = match gaze {
            Some((id, rotation)) => (OrientationMode::Tracking(id), rotation),
            None => {
                self.sweep.advance(dt);
                (OrientationMode::Patrol, self.patrol_rotation())
            }
        };

        if mode != self.mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "Orientation mode changed");
            self.mode = mode;
        }

        self.rotation = rotate_towards(self.rotation, desired, self.max_rotation_speed * dt);
        self.rotation
    }

    /// Desired orientation while patrolling.
    pub fn patrol_rotation(&self) -> Quat {
        (self.mount * self.sweep.local_rotation()).normalize()
    }

    /// Physical pivot orientation.
    #[inline]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Direction the lens is pointing.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * RIG_FORWARD
    }

    #[inline]
    pub fn mode(&self) -> OrientationMode {
        self.mode
    }

    #[inline]
    pub fn sweep(&self) -> &PatrolSweep {
        &self.sweep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::angle_between;
    use std::collections::HashMap;

    struct Positions(HashMap<TargetId, Vec3>);

    impl TargetLocator for Positions {
        fn position(&self, target: TargetId) -> Option<Vec3> {
            self.0.get(&target).copied()
        }
    }

    fn positions(entries: &[(u64, Vec3)]) -> Positions {
        Positions(entries.iter().map(|(id, p)| (TargetId(*id), *p)).collect())
    }

    fn controller(max_rotation_speed: f32) -> OrientationController {
        let patrol = PatrolConfig {
            default_pitch: 0.0,
            angle_swept: 60.0,
            sweep_speed: 10.0,
            max_rotation_speed,
        };
        let detection = DetectionConfig {
            vertical_offset: 0.0,
            suspicion_threshold: 0.5,
            ..Default::default()
        };
        OrientationController::new(&patrol, &detection, Quat::IDENTITY)
    }

    fn suspicious(id: u64, level: f32, in_fov: bool) -> Option<TrackedTarget> {
        Some(TrackedTarget {
            id: TargetId(id),
            detection_level: level,
            in_fov,
        })
    }

    #[test]
    fn test_patrol_without_target() {
        let mut controller = controller(1000.0);
        let world = positions(&[]);
        controller.update(1.0, Vec3::ZERO, None, &world);
        assert_eq!(controller.mode(), OrientationMode::Patrol);
        assert_eq!(controller.sweep().angle(), 10.0);
        let expected = Quat::from_rotation_y(10f32.to_radians());
        assert!(angle_between(controller.rotation(), expected) < 1e-3);
    }

    #[test]
    fn test_tracks_suspicious_visible_target() {
        let mut controller = controller(1000.0);
        let target = Vec3::new(0.0, 0.0, 5.0);
        let world = positions(&[(1, target)]);

        controller.update(1.0, Vec3::ZERO, suspicious(1, 0.6, true), &world);

        assert_eq!(controller.mode(), OrientationMode::Tracking(TargetId(1)));
        assert!((controller.forward() - Vec3::Z).length() < 1e-3);
        // Sweep is paused while tracking.
        assert_eq!(controller.sweep().angle(), 0.0);
    }

    #[test]
    fn test_below_threshold_or_occluded_patrols() {
        let mut controller = controller(1000.0);
        let world = positions(&[(1, Vec3::new(0.0, 0.0, 5.0))]);

        controller.update(0.1, Vec3::ZERO, suspicious(1, 0.4, true), &world);
        assert_eq!(controller.mode(), OrientationMode::Patrol);

        controller.update(0.1, Vec3::ZERO, suspicious(1, 1.0, false), &world);
        assert_eq!(controller.mode(), OrientationMode::Patrol);

        // Unknown position falls back to patrol as well.
        controller.update(0.1, Vec3::ZERO, suspicious(2, 1.0, true), &world);
        assert_eq!(controller.mode(), OrientationMode::Patrol);
    }

    #[test]
    fn test_rotation_rate_limited() {
        let mut controller = controller(90.0);
        let world = positions(&[(1, Vec3::new(-5.0, 0.0, 0.0))]);
        let dt = 0.1;

        let mut previous = controller.rotation();
        for _ in 0..30 {
            let next = controller.update(dt, Vec3::ZERO, suspicious(1, 1.0, true), &world);
            assert!(angle_between(previous, next) <= 9f32.to_radians() + 1e-3);
            previous = next;
        }
        // 180 degrees at 90 deg/s needs two seconds; three have passed.
        assert!((controller.forward() - Vec3::NEG_X).length() < 1e-3);
    }

    #[test]
    fn test_mount_yaw_rotates_patrol_frame() {
        let patrol = PatrolConfig {
            default_pitch: 0.0,
            ..Default::default()
        };
        let mount = Quat::from_rotation_y(std::f32::consts::PI);
        let controller = OrientationController::new(&patrol, &DetectionConfig::default(), mount);
        assert!((controller.forward() - Vec3::NEG_X).length() < 1e-4);
    }
}
