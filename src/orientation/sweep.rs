//! Oscillating patrol yaw.

use crate::config::PatrolConfig;
use glam::{EulerRot, Quat};

/// Yaw oscillation between `-angle_swept / 2` and `+angle_swept / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolSweep {
    /// Current yaw in degrees.
    angle: f32,
    /// Direction of travel; clockwise means increasing yaw.
    clockwise: bool,
    half_arc: f32,
    speed: f32,
    default_pitch: f32,
}

impl PatrolSweep {
    pub fn new(config: &PatrolConfig) -> Self {
        Self {
            angle: 0.0,
            clockwise: true,
            half_arc: config.angle_swept * 0.5,
            speed: config.sweep_speed,
            default_pitch: config.default_pitch,
        }
    }

    /// Advances the sweep by `dt` seconds and returns the new yaw in degrees.
    ///
    /// On reaching either end the yaw is held at the bound and the direction
    /// reverses for the next step.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let sign = if self.clockwise { 1.0 } else { -1.0 };
        self.angle += self.speed * dt * sign;

        if self.angle.abs() >= self.half_arc {
            self.angle = self.angle.clamp(-self.half_arc, self.half_arc);
            self.clockwise = !self.clockwise;
        }
        self.angle
    }

    /// Current yaw in degrees.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.clockwise
    }

    /// Half of the total sweep arc in degrees.
    #[inline]
    pub fn half_arc(&self) -> f32 {
        self.half_arc
    }

    /// Pivot rotation relative to the mount: yaw about up, then the lens
    /// tilted down by the default pitch.
    pub fn local_rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.angle.to_radians(),
            0.0,
            -self.default_pitch.to_radians(),
        )
    }
}
