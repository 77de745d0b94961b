//! A single security camera.

use super::{FeedHandle, FeedOutput, FeedRenderer};
use crate::config::{CameraConfig, ConfigError};
use crate::events::{Notification, NotificationSink};
use crate::geometry::{Observer, ObstructionQuery, TargetLocator};
use crate::ids::{CameraId, ConsoleId, TargetId};
use crate::orientation::{OrientationController, OrientationMode};
use crate::tracking::{DetectionState, TargetTracker, TrackedTarget, TrackerOutcome};
use glam::{Quat, Vec3};
use std::collections::BTreeSet;

/// A patrolling camera with suspicion tracking and a gated live feed.
pub struct SecurityCamera {
    id: CameraId,
    display_name: String,
    position: Vec3,
    detection_range: f32,
    tracker: TargetTracker,
    controller: OrientationController,
    /// Consoles currently showing this camera.
    watchers: BTreeSet<ConsoleId>,
    feed: FeedOutput,
}

impl SecurityCamera {
    /// Builds a camera from configuration. The feed starts disabled.
    pub fn new(id: CameraId, config: &CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mount = Quat::from_rotation_y(config.mount_yaw.to_radians());
        let camera = Self {
            id,
            display_name: config.name.clone(),
            position: config.position,
            detection_range: config.detection.range,
            tracker: TargetTracker::new(&config.detection),
            controller: OrientationController::new(&config.patrol, &config.detection, mount),
            watchers: BTreeSet::new(),
            feed: FeedOutput::new(id, config.output_texture_size),
        };

        tracing::info!(
            camera = %camera.display_name,
            position = ?camera.position,
            "Security camera created"
        );
        Ok(camera)
    }

    /// Forwards an overlap-enter event to the tracker.
    pub fn on_target_entered<S: AsRef<str>>(&mut self, target: TargetId, tags: &[S]) -> bool {
        self.tracker.on_target_entered(target, tags)
    }

    /// Forwards an overlap-exit event to the tracker.
    pub fn on_target_exited(&mut self, target: TargetId) -> bool {
        self.tracker.on_target_exited(target)
    }

    /// Runs one simulation tick: visibility refresh, detection edges, then
    /// orientation.
    pub fn tick<W>(&mut self, dt: f32, world: &W, sink: &mut dyn NotificationSink) -> TrackerOutcome
    where
        W: ObstructionQuery + TargetLocator,
    {
        let observer = Observer::new(self.position, self.controller.forward());
        let outcome = self.tracker.tick(dt, &observer, world, world);

        // A latched all-clear belongs to an exit before any detection this tick.
        if outcome.all_clear {
            tracing::info!(camera = %self.display_name, "All clear");
            sink.notify(Notification::AllClear { camera: self.id });
        }
        for &target in &outcome.detected {
            tracing::info!(camera = %self.display_name, target_id = target.0, "Target detected");
            sink.notify(Notification::TargetDetected {
                camera: self.id,
                target,
            });
        }

        self.controller
            .update(dt, self.position, self.tracker.currently_detected(), world);

        outcome
    }

    /// Registers a watching console. Returns false if it was already watching.
    pub fn start_watching(&mut self, console: ConsoleId) -> bool {
        let added = self.watchers.insert(console);
        self.on_watchers_changed();
        added
    }

    /// Unregisters a console. Returns false if it was not watching.
    pub fn stop_watching(&mut self, console: ConsoleId) -> bool {
        let removed = self.watchers.remove(&console);
        self.on_watchers_changed();
        removed
    }

    fn on_watchers_changed(&mut self) {
        let enabled = !self.watchers.is_empty();
        if enabled != self.feed.is_enabled() {
            tracing::debug!(
                camera = %self.display_name,
                watchers = self.watchers.len(),
                enabled,
                "Feed toggled"
            );
        }
        self.feed.set_enabled(enabled);
    }

    /// Renders the current view if any console is watching.
    pub fn render(&mut self, renderer: &mut dyn FeedRenderer) -> bool {
        let forward = self.controller.forward();
        let indicator = self.tracker.state().indicator;
        match self.feed.next_frame(self.position, forward, indicator) {
            Some(frame) => {
                renderer.render(&frame);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn id(&self) -> CameraId {
        self.id
    }

    #[inline]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Radius of the detection volume.
    #[inline]
    pub fn detection_range(&self) -> f32 {
        self.detection_range
    }

    /// Physical pivot orientation.
    pub fn rotation(&self) -> Quat {
        self.controller.rotation()
    }

    /// Direction the lens points.
    pub fn forward(&self) -> Vec3 {
        self.controller.forward()
    }

    pub fn mode(&self) -> OrientationMode {
        self.controller.mode()
    }

    pub fn controller(&self) -> &OrientationController {
        &self.controller
    }

    pub fn tracker(&self) -> &TargetTracker {
        &self.tracker
    }

    pub fn detection_state(&self) -> &DetectionState {
        self.tracker.state()
    }

    pub fn currently_detected(&self) -> Option<TrackedTarget> {
        self.tracker.currently_detected()
    }

    pub fn has_detected_target(&self) -> bool {
        self.tracker.has_detected_target()
    }

    /// Feed is enabled exactly when at least one console watches.
    #[inline]
    pub fn feed_enabled(&self) -> bool {
        self.feed.is_enabled()
    }

    pub fn feed(&self) -> &FeedOutput {
        &self.feed
    }

    pub fn feed_handle(&self) -> FeedHandle {
        self.feed.handle()
    }

    pub fn watchers(&self) -> impl Iterator<Item = ConsoleId> + '_ {
        self.watchers.iter().copied()
    }

    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_watched_by(&self, console: ConsoleId) -> bool {
        self.watchers.contains(&console)
    }
}

impl std::fmt::Debug for SecurityCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityCamera")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("position", &self.position)
            .field("mode", &self.controller.mode())
            .field("tracked", &self.tracker.targets().len())
            .field("watchers", &self.watchers)
            .finish()
    }
}
