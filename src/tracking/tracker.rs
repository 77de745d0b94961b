//! Target tracker state machine.
//!
//! Per target: `Untracked -> Tracked { in_fov, level } -> removed`. The
//! camera-wide state adds a sticky "has detected target" flag that is raised
//! when any level reaches 1.0 and lowered once nothing remains above zero.
//! An exit that leaves nothing above zero lowers it at once and latches the
//! all-clear for the next tick, so a later enter cannot hide it.

use super::{Color, PotentialTarget};
use crate::config::DetectionConfig;
use crate::geometry::{Observer, ObstructionQuery, TargetLocator, VisibilityProbe};
use crate::ids::TargetId;

/// Snapshot of the most-detected target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedTarget {
    pub id: TargetId,
    pub detection_level: f32,
    pub in_fov: bool,
}

/// Camera detection state derived from the tracked set.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionState {
    /// Target with the highest level; `None` iff nothing is tracked.
    pub currently_detected: Option<TrackedTarget>,
    /// Sticky flag set on full detection, cleared once nothing remains above zero.
    pub has_detected_target: bool,
    /// Indicator blended by the highest detection level.
    pub indicator: Color,
}

/// Edges raised by a single tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerOutcome {
    /// Targets whose level reached 1.0 this tick.
    pub detected: Vec<TargetId>,
    /// Nothing remains above zero after a detection.
    pub all_clear: bool,
}

impl TrackerOutcome {
    /// Returns true if no edge fired.
    pub fn is_quiet(&self) -> bool {
        self.detected.is_empty() && !self.all_clear
    }
}

/// Tracks candidate targets and integrates their detection levels.
pub struct TargetTracker {
    probe: VisibilityProbe,
    build_rate: f32,
    decay_rate: f32,
    allowed_tags: Vec<String>,
    nothing_color: Color,
    detected_color: Color,
    /// Insertion-ordered; the order breaks ties between equal levels.
    targets: Vec<PotentialTarget>,
    state: DetectionState,
    /// Set by an exit that cleared the last level above zero.
    all_clear_pending: bool,
}

impl TargetTracker {
    /// Creates a tracker from validated detection settings.
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            probe: VisibilityProbe::from_config(config),
            build_rate: config.build_rate,
            decay_rate: config.decay_rate,
            allowed_tags: config.allowed_tags.clone(),
            nothing_color: config.nothing_color,
            detected_color: config.detected_color,
            targets: Vec::new(),
            state: DetectionState {
                currently_detected: None,
                has_detected_target: false,
                indicator: config.nothing_color,
            },
            all_clear_pending: false,
        }
    }

    /// Handles an object entering the detection volume.
    ///
    /// Returns true if a new entry was created. Objects without an allowed
    /// tag are ignored, and a repeated enter keeps the existing progress.
    pub fn on_target_entered<S: AsRef<str>>(&mut self, id: TargetId, tags: &[S]) -> bool {
        let allowed = tags
            .iter()
            .any(|tag| self.allowed_tags.iter().any(|a| a == tag.as_ref()));
        if !allowed {
            tracing::trace!(target_id = id.0, "Ignoring object without a tracked tag");
            return false;
        }
        if self.contains(id) {
            return false;
        }

        self.targets.push(PotentialTarget::new(id));
        self.refresh_aggregate();
        tracing::debug!(target_id = id.0, tracked = self.targets.len(), "Target entered volume");
        true
    }

    /// Handles an object leaving the detection volume. Progress is discarded.
    pub fn on_target_exited(&mut self, id: TargetId) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| t.id() != id);
        let removed = self.targets.len() != before;
        if removed {
            self.refresh_aggregate();
            if self.state.has_detected_target && !self.any_level_raised() {
                self.state.has_detected_target = false;
                self.all_clear_pending = true;
            }
            tracing::debug!(target_id = id.0, tracked = self.targets.len(), "Target left volume");
        }
        removed
    }

    /// Runs the visibility probe for every tracked target and integrates levels.
    pub fn tick(
        &mut self,
        dt: f32,
        observer: &Observer,
        locator: &dyn TargetLocator,
        obstruction: &dyn ObstructionQuery,
    ) -> TrackerOutcome {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut outcome = TrackerOutcome {
            all_clear: std::mem::take(&mut self.all_clear_pending),
            ..Default::default()
        };

        for target in &mut self.targets {
            let visible = locator
                .position(target.id())
                .map(|position| self.probe.is_visible(observer, target.id(), position, obstruction))
                .unwrap_or(false);

            if target.integrate(visible, dt, self.build_rate, self.decay_rate) {
                outcome.detected.push(target.id());
            }

            tracing::trace!(
                target_id = target.id().0,
                visible,
                level = target.detection_level(),
                "Detection level updated"
            );
        }

        if !outcome.detected.is_empty() {
            self.state.has_detected_target = true;
        }

        self.refresh_aggregate();

        if self.state.has_detected_target && !self.any_level_raised() {
            self.state.has_detected_target = false;
            outcome.all_clear = true;
        }

        outcome
    }

    /// Current detection state.
    pub fn state(&self) -> &DetectionState {
        &self.state
    }

    /// Target with the highest detection level, if any target is tracked.
    pub fn currently_detected(&self) -> Option<TrackedTarget> {
        self.state.currently_detected
    }

    /// Returns true from a full detection until nothing remains above zero.
    pub fn has_detected_target(&self) -> bool {
        self.state.has_detected_target
    }

    /// Tracked entries in insertion order.
    pub fn targets(&self) -> &[PotentialTarget] {
        &self.targets
    }

    /// Looks up one tracked entry.
    pub fn target(&self, id: TargetId) -> Option<&PotentialTarget> {
        self.targets.iter().find(|t| t.id() == id)
    }

    /// Returns true if the target is tracked.
    pub fn contains(&self, id: TargetId) -> bool {
        self.target(id).is_some()
    }

    /// Visibility constants used for each tracked target.
    pub fn probe(&self) -> &VisibilityProbe {
        &self.probe
    }

    fn any_level_raised(&self) -> bool {
        self.targets.iter().any(|t| t.detection_level() > 0.0)
    }

    fn refresh_aggregate(&mut self) {
        let mut best: Option<&PotentialTarget> = None;
        for target in &self.targets {
            if best.map_or(true, |b| target.detection_level() > b.detection_level()) {
                best = Some(target);
            }
        }

        self.state.currently_detected = best.map(|t| TrackedTarget {
            id: t.id(),
            detection_level: t.detection_level(),
            in_fov: t.in_fov(),
        });
        self.state.indicator = match best {
            Some(t) => self.nothing_color.lerp(self.detected_color, t.detection_level()),
            None => self.nothing_color,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LayerMask, RayHit};
    use glam::Vec3;
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};

    /// Targets are points; hidden targets sit behind a wall halfway along the ray.
    #[derive(Default)]
    struct Stage {
        positions: HashMap<TargetId, Vec3>,
        hidden: HashSet<TargetId>,
    }

    impl Stage {
        fn place(&mut self, id: u64, x: f32) {
            self.positions.insert(TargetId(id), Vec3::new(x, 0.0, 0.0));
        }

        fn hide(&mut self, id: u64) {
            self.hidden.insert(TargetId(id));
        }

        fn reveal(&mut self, id: u64) {
            self.hidden.remove(&TargetId(id));
        }
    }

    impl TargetLocator for Stage {
        fn position(&self, target: TargetId) -> Option<Vec3> {
            self.positions.get(&target).copied()
        }
    }

    impl ObstructionQuery for Stage {
        fn raycast(
            &self,
            origin: Vec3,
            direction: Vec3,
            max_distance: f32,
            _layers: LayerMask,
        ) -> Option<RayHit> {
            let (id, distance) = self
                .positions
                .iter()
                .filter_map(|(id, p)| {
                    let along = (*p - origin).dot(direction);
                    let off_axis = (*p - origin - direction * along).length();
                    (along >= 0.0 && along <= max_distance && off_axis < 0.25)
                        .then_some((*id, along))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))?;

            if self.hidden.contains(&id) {
                return Some(RayHit {
                    distance: distance * 0.5,
                    point: origin + direction * distance * 0.5,
                    target: None,
                });
            }
            Some(RayHit {
                distance,
                point: origin + direction * distance,
                target: Some(id),
            })
        }
    }

    fn config() -> DetectionConfig {
        DetectionConfig {
            half_angle: 45.0,
            range: 20.0,
            vertical_offset: 0.0,
            build_rate: 0.5,
            decay_rate: 0.25,
            allowed_tags: vec!["Player".into(), "Guard".into()],
            ..Default::default()
        }
    }

    fn observer() -> Observer {
        Observer::new(Vec3::ZERO, Vec3::X)
    }

    fn run(tracker: &mut TargetTracker, stage: &Stage, seconds: f32, dt: f32) -> Vec<TrackerOutcome> {
        let ticks = (seconds / dt).round() as usize;
        (0..ticks)
            .map(|_| tracker.tick(dt, &observer(), stage, stage))
            .collect()
    }

    #[test]
    fn test_only_allowed_tags_tracked() {
        let mut tracker = TargetTracker::new(&config());
        assert!(!tracker.on_target_entered(TargetId(1), &["Crate"]));
        assert!(tracker.on_target_entered(TargetId(2), &["Prop", "Guard"]));
        let no_tags: [&str; 0] = [];
        assert!(!tracker.on_target_entered(TargetId(3), &no_tags));
        assert_eq!(tracker.targets().len(), 1);
    }

    #[test]
    fn test_duplicate_enter_keeps_progress() {
        let mut stage = Stage::default();
        stage.place(1, 5.0);
        let mut tracker = TargetTracker::new(&config());
        tracker.on_target_entered(TargetId(1), &["Player"]);
        run(&mut tracker, &stage, 1.0, 0.1);
        let level = tracker.target(TargetId(1)).unwrap().detection_level();

        assert!(!tracker.on_target_entered(TargetId(1), &["Player"]));
        assert_eq!(tracker.target(TargetId(1)).unwrap().detection_level(), level);
    }

    #[test]
    fn test_detected_fires_once_after_inverse_build_rate() {
        let mut stage = Stage::default();
        stage.place(1, 5.0);
        let mut tracker = TargetTracker::new(&config());
        tracker.on_target_entered(TargetId(1), &["Player"]);

        let outcomes = run(&mut tracker, &stage, 2.0, 1.0 / 60.0);
        let detections: usize = outcomes.iter().map(|o| o.detected.len()).sum();

        assert_eq!(detections, 1);
        assert!(outcomes.last().unwrap().detected.contains(&TargetId(1)));
        assert!(tracker.has_detected_target());
        assert!((tracker.currently_detected().unwrap().detection_level - 1.0).abs() < 1e-6);

        // Staying visible does not fire again.
        let more = run(&mut tracker, &stage, 1.0, 1.0 / 60.0);
        assert!(more.iter().all(|o| o.detected.is_empty()));
    }

    #[test]
    fn test_all_clear_after_inverse_decay_rate() {
        let mut stage = Stage::default();
        stage.place(1, 5.0);
        let mut tracker = TargetTracker::new(&config());
        tracker.on_target_entered(TargetId(1), &["Player"]);
        run(&mut tracker, &stage, 2.0, 0.05);
        assert!(tracker.has_detected_target());

        stage.hide(1);
        let outcomes = run(&mut tracker, &stage, 4.0, 0.05);
        let clears = outcomes.iter().filter(|o| o.all_clear).count();

        assert_eq!(clears, 1);
        assert!(outcomes.last().unwrap().all_clear);
        assert_eq!(tracker.target(TargetId(1)).unwrap().detection_level(), 0.0);
        assert!(!tracker.has_detected_target());
        // Still tracked, so still the current target.
        assert_eq!(tracker.currently_detected().unwrap().id, TargetId(1));
    }

    #[test]
    fn test_exit_discards_progress_and_clears() {
        let mut stage = Stage::default();
        stage.place(1, 5.0);
        let mut tracker = TargetTracker::new(&config());
        tracker.on_target_entered(TargetId(1), &["Player"]);
        run(&mut tracker, &stage, 2.0, 0.1);

        assert!(tracker.on_target_exited(TargetId(1)));
        assert!(tracker.currently_detected().is_none());
        assert_eq!(tracker.state().indicator, Color::GREEN);

        let outcome = tracker.tick(0.1, &observer(), &stage, &stage);
        assert!(outcome.all_clear);

        tracker.on_target_entered(TargetId(1), &["Player"]);
        assert_eq!(tracker.target(TargetId(1)).unwrap().detection_level(), 0.0);
        assert!(!tracker.on_target_exited(TargetId(9)));
    }

    #[test]
    fn test_all_clear_survives_enter_after_exit() {
        let mut stage = Stage::default();
        stage.place(1, 5.0);
        stage.positions.insert(TargetId(2), Vec3::new(5.0, 0.0, 2.0));
        let mut tracker = TargetTracker::new(&config());
        tracker.on_target_entered(TargetId(1), &["Player"]);
        let outcomes = run(&mut tracker, &stage, 2.0, 0.1);
        assert_eq!(outcomes.iter().map(|o| o.detected.len()).sum::<usize>(), 1);

        tracker.on_target_exited(TargetId(1));
        assert!(!tracker.has_detected_target());
        tracker.on_target_entered(TargetId(2), &["Player"]);

        let outcomes = run(&mut tracker, &stage, 0.3, 0.1);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].all_clear);
        assert!(outcomes[1..].iter().all(TrackerOutcome::is_quiet));
        assert!(!tracker.has_detected_target());

        let current = tracker.currently_detected().unwrap();
        assert_eq!(current.id, TargetId(2));
        assert!((current.detection_level - 0.15).abs() < 1e-5);
    }

    #[test]
    fn test_exit_with_other_target_raised_defers_all_clear() {
        let mut stage = Stage::default();
        stage.place(1, 5.0);
        stage.positions.insert(TargetId(2), Vec3::new(5.0, 0.0, 2.0));
        let mut tracker = TargetTracker::new(&config());
        tracker.on_target_entered(TargetId(1), &["Player"]);
        tracker.on_target_entered(TargetId(2), &["Player"]);
        run(&mut tracker, &stage, 2.0, 0.1);

        tracker.on_target_exited(TargetId(1));
        assert!(tracker.has_detected_target());
        let outcome = tracker.tick(0.1, &observer(), &stage, &stage);
        assert!(!outcome.all_clear);
    }

    #[test]
    fn test_all_clear_waits_for_every_target() {
        let mut stage = Stage::default();
        stage.place(1, 5.0);
        stage.positions.insert(TargetId(2), Vec3::new(5.0, 0.0, 2.0));
        let mut tracker = TargetTracker::new(&config());
        tracker.on_target_entered(TargetId(1), &["Player"]);
        tracker.on_target_entered(TargetId(2), &["Player"]);
        run(&mut tracker, &stage, 2.0, 0.1);

        stage.hide(1);
        stage.hide(2);
        run(&mut tracker, &stage, 2.0, 0.1);
        stage.reveal(2);
        let outcomes = run(&mut tracker, &stage, 4.0, 0.1);
        assert!(outcomes.iter().all(|o| !o.all_clear));
        assert_eq!(tracker.currently_detected().unwrap().id, TargetId(2));
    }

    #[test]
    fn test_current_target_is_highest_level() {
        let mut stage = Stage::default();
        stage.place(1, 5.0);
        stage.positions.insert(TargetId(2), Vec3::new(5.0, 0.0, 2.0));
        let mut tracker = TargetTracker::new(&config());
        tracker.on_target_entered(TargetId(1), &["Player"]);
        tracker.on_target_entered(TargetId(2), &["Player"]);

        // Tie at zero: first inserted wins.
        assert_eq!(tracker.currently_detected().unwrap().id, TargetId(1));

        stage.hide(1);
        run(&mut tracker, &stage, 0.5, 0.1);
        let current = tracker.currently_detected().unwrap();
        assert_eq!(current.id, TargetId(2));
        assert!(current.in_fov);
        assert!(tracker.state().indicator.r > 0.0);
    }

    #[test]
    fn test_unknown_position_decays() {
        let stage = Stage::default();
        let mut tracker = TargetTracker::new(&config());
        tracker.on_target_entered(TargetId(1), &["Player"]);
        run(&mut tracker, &stage, 1.0, 0.1);
        let target = tracker.target(TargetId(1)).unwrap();
        assert_eq!(target.detection_level(), 0.0);
        assert!(!target.in_fov());
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut stage = Stage::default();
        stage.place(1, 5.0);
        let mut tracker = TargetTracker::new(&config());
        tracker.on_target_entered(TargetId(1), &["Player"]);
        tracker.tick(-1.0, &observer(), &stage, &stage);
        tracker.tick(f32::NAN, &observer(), &stage, &stage);
        assert_eq!(tracker.target(TargetId(1)).unwrap().detection_level(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_levels_stay_in_unit_range(
            steps in prop::collection::vec((any::<bool>(), any::<bool>(), 0.0f32..0.5), 1..200)
        ) {
            let mut stage = Stage::default();
            stage.place(1, 5.0);
            stage.positions.insert(TargetId(2), Vec3::new(6.0, 0.0, 3.0));
            let mut tracker = TargetTracker::new(&config());
            tracker.on_target_entered(TargetId(1), &["Player"]);
            tracker.on_target_entered(TargetId(2), &["Guard"]);

            for (hide_first, hide_second, dt) in steps {
                if hide_first { stage.hide(1) } else { stage.reveal(1) }
                if hide_second { stage.hide(2) } else { stage.reveal(2) }

                let before: Vec<f32> = tracker.targets().iter().map(|t| t.detection_level()).collect();
                tracker.tick(dt, &observer(), &stage, &stage);

                for (target, prev) in tracker.targets().iter().zip(before) {
                    let level = target.detection_level();
                    prop_assert!((0.0..=1.0).contains(&level));
                    let bound = if target.in_fov() { 0.5 * dt } else { 0.25 * dt };
                    prop_assert!((level - prev).abs() <= bound + crate::tracking::LEVEL_SNAP);
                    if dt == 0.0 {
                        prop_assert_eq!(level, prev);
                    }
                    if target.in_fov() {
                        prop_assert!(level >= prev);
                    } else {
                        prop_assert!(level <= prev);
                    }
                }

                let max = tracker.targets().iter().map(|t| t.detection_level()).fold(f32::MIN, f32::max);
                let current = tracker.currently_detected().unwrap();
                prop_assert_eq!(current.detection_level, max);
            }
        }
    }
}
