//! Fixed-step driver wiring a [`Scene`] to the sandbox world.

use super::{OverlapEvent, SandboxWorld};
use crate::camera::FrameCounter;
use crate::config::{ConfigError, SceneConfig};
use crate::console::DisplayLog;
use crate::events::NotificationQueue;
use crate::ids::CameraId;
use crate::scene::{Scene, TickSummary};

/// Scene plus the stand-in engine services it consumes.
pub struct Simulation {
    scene: Scene,
    world: SandboxWorld,
    notifications: NotificationQueue,
    display: DisplayLog,
    frames: FrameCounter,
    elapsed: f32,
    ticks: u64,
    switches: u64,
}

impl Simulation {
    /// Builds the scene and sandbox from one configuration.
    pub fn from_config(config: &SceneConfig) -> Result<Self, ConfigError> {
        let scene = Scene::from_config(config)?;
        let world = SandboxWorld::new(&config.sandbox, config.simulation.seed);
        Ok(Self::new(scene, world))
    }

    pub fn new(scene: Scene, world: SandboxWorld) -> Self {
        let mut display = DisplayLog::new();
        scene.announce(&mut display);
        Self {
            scene,
            world,
            notifications: NotificationQueue::new(),
            display,
            frames: FrameCounter::new(),
            elapsed: 0.0,
            ticks: 0,
            switches: 0,
        }
    }

    /// One frame: move targets, deliver overlap events, tick the scene and
    /// render the watched feeds.
    pub fn step(&mut self, dt: f32) -> TickSummary {
        self.world.step(dt);
        self.deliver_overlaps();

        let summary = self
            .scene
            .tick(dt, &self.world, &mut self.notifications, &mut self.display);
        self.scene.render(&mut self.frames);

        self.elapsed += dt;
        self.ticks += 1;
        self.switches += summary.switches as u64;
        summary
    }

    fn deliver_overlaps(&mut self) {
        for index in 0..self.scene.cameras().len() {
            let camera = &self.scene.cameras()[index];
            let (id, center, radius) = (camera.id(), camera.position(), camera.detection_range());

            for event in self.world.overlap_events(id, center, radius) {
                let result = match event {
                    OverlapEvent::Entered { target, tags } => {
                        self.scene.on_target_entered(id, target, tags.as_slice())
                    }
                    OverlapEvent::Exited { target } => self.scene.on_target_exited(id, target),
                };
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Dropping overlap event");
                }
            }
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn world_mut(&mut self) -> &mut SandboxWorld {
        &mut self.world
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationQueue {
        &mut self.notifications
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn display(&self) -> &DisplayLog {
        &self.display
    }

    /// Split borrow for clicking a console from the outside.
    pub fn scene_and_display(&mut self) -> (&mut Scene, &mut DisplayLog) {
        (&mut self.scene, &mut self.display)
    }

    /// Frames rendered for one camera.
    pub fn frames_rendered(&self, camera: CameraId) -> u64 {
        self.frames.count(camera)
    }

    /// Simulated seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Automatic console switches so far; clicks are not counted.
    pub fn autoswitches(&self) -> u64 {
        self.switches
    }
}
