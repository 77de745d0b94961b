//! A candidate target inside a camera's detection volume.

use super::LEVEL_SNAP;
use crate::ids::TargetId;

/// Per-target detection record.
///
/// Created at level 0 when the object enters the volume and dropped when it
/// leaves; progress is never carried across an exit.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialTarget {
    id: TargetId,
    in_fov: bool,
    detection_level: f32,
    detected_event_sent: bool,
}

impl PotentialTarget {
    pub fn new(id: TargetId) -> Self {
        Self {
            id,
            in_fov: false,
            detection_level: 0.0,
            detected_event_sent: false,
        }
    }

    #[inline]
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Whether the target passed the visibility probe on the last tick.
    #[inline]
    pub fn in_fov(&self) -> bool {
        self.in_fov
    }

    /// Detection level in [0, 1].
    #[inline]
    pub fn detection_level(&self) -> f32 {
        self.detection_level
    }

    /// Whether the detected notification has fired since the level last hit 0.
    #[inline]
    pub fn detected_event_sent(&self) -> bool {
        self.detected_event_sent
    }

    /// Integrates one tick. Returns true exactly when the level reaches 1.0
    /// with the one-shot flag unarmed.
    pub(crate) fn integrate(&mut self, visible: bool, dt: f32, build_rate: f32, decay_rate: f32) -> bool {
        self.in_fov = visible;

        let step = if visible { build_rate * dt } else { -decay_rate * dt };
        if step == 0.0 {
            return false;
        }

        let mut level = (self.detection_level + step).clamp(0.0, 1.0);
        // Snap float drift only toward the bound the level is moving to.
        if step > 0.0 && level >= 1.0 - LEVEL_SNAP {
            level = 1.0;
        } else if step < 0.0 && level <= LEVEL_SNAP {
            level = 0.0;
        }
        self.detection_level = level;

        if level <= 0.0 {
            self.detected_event_sent = false;
        }

        if level >= 1.0 && !self.detected_event_sent {
            self.detected_event_sent = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_to_full_in_inverse_rate_seconds() {
        let mut target = PotentialTarget::new(TargetId(1));
        let dt = 1.0 / 60.0;
        let mut fired = 0;
        // build rate 0.5 => 2 seconds => 120 ticks
        for _ in 0..120 {
            if target.integrate(true, dt, 0.5, 0.25) {
                fired += 1;
            }
        }
        assert_eq!(target.detection_level(), 1.0);
        assert_eq!(fired, 1);
        assert!(target.in_fov());
    }

    #[test]
    fn test_one_shot_rearms_after_full_decay() {
        let mut target = PotentialTarget::new(TargetId(1));
        assert!(target.integrate(true, 1.0, 1.0, 1.0));
        assert!(!target.integrate(true, 1.0, 1.0, 1.0));

        target.integrate(false, 0.5, 1.0, 1.0);
        assert!(target.detected_event_sent());
        assert!(!target.integrate(true, 0.5, 1.0, 1.0));

        target.integrate(false, 1.0, 1.0, 1.0);
        assert_eq!(target.detection_level(), 0.0);
        assert!(!target.detected_event_sent());
        assert!(target.integrate(true, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_zero_dt_leaves_level_alone() {
        let mut target = PotentialTarget::new(TargetId(1));
        assert!(target.integrate(true, 1.0, 1.0, 1.0));
        target.integrate(false, 1.0, 1.0, 0.00005);
        let near_full = target.detection_level();
        assert!(near_full < 1.0);

        assert!(!target.integrate(true, 0.0, 1.0, 1.0));
        assert_eq!(target.detection_level(), near_full);
        assert!(target.in_fov());

        let mut target = PotentialTarget::new(TargetId(2));
        target.integrate(true, 0.00005, 1.0, 1.0);
        let near_empty = target.detection_level();
        target.integrate(false, 0.0, 1.0, 1.0);
        assert_eq!(target.detection_level(), near_empty);
        assert!(!target.in_fov());
    }

    #[test]
    fn test_level_clamped() {
        let mut target = PotentialTarget::new(TargetId(1));
        target.integrate(false, 10.0, 1.0, 1.0);
        assert_eq!(target.detection_level(), 0.0);
        target.integrate(true, 10.0, 1.0, 1.0);
        assert_eq!(target.detection_level(), 1.0);
    }
}
