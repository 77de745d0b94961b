//! Scene registry and tick scheduler.

use crate::camera::{FeedRenderer, SecurityCamera};
use crate::config::{AutoswitchConfig, CameraConfig, ConfigError, SceneConfig};
use crate::console::{CameraSwitch, DisplaySink, DisplayUpdate, SecurityConsole};
use crate::events::NotificationSink;
use crate::geometry::{ObstructionQuery, TargetLocator};
use crate::ids::{CameraId, ConsoleId, TargetId};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from addressing scene objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("unknown camera {0}")]
    UnknownCamera(CameraId),
    #[error("unknown console {0}")]
    UnknownConsole(ConsoleId),
}

/// Counts of what happened during one scene tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub detections: usize,
    pub all_clears: usize,
    pub switches: usize,
}

/// All cameras and consoles of a level.
#[derive(Debug, Default)]
pub struct Scene {
    cameras: Vec<SecurityCamera>,
    consoles: Vec<SecurityConsole>,
}

impl Scene {
    /// Builds cameras and consoles from a configuration, resolving console
    /// camera names to ids.
    pub fn from_config(config: &SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let cameras = config
            .cameras
            .iter()
            .enumerate()
            .map(|(i, c)| SecurityCamera::new(CameraId(i), c))
            .collect::<Result<Vec<_>, _>>()?;

        let by_name: HashMap<&str, CameraId> = cameras
            .iter()
            .map(|c| (c.display_name(), c.id()))
            .collect();

        let mut consoles = Vec::with_capacity(config.consoles.len());
        for (i, console) in config.consoles.iter().enumerate() {
            let linked = console
                .cameras
                .iter()
                .map(|name| {
                    by_name
                        .get(name.as_str())
                        .copied()
                        .ok_or_else(|| ConfigError::UnknownCamera {
                            console: console.name.clone(),
                            camera: name.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            consoles.push(SecurityConsole::new(
                ConsoleId(i),
                console.name.clone(),
                linked,
                console.autoswitch.clone(),
            )?);
        }

        tracing::info!(
            cameras = cameras.len(),
            consoles = consoles.len(),
            "Scene loaded"
        );
        Ok(Self { cameras, consoles })
    }

    /// Adds a camera; its id is its slot index.
    pub fn add_camera(&mut self, config: &CameraConfig) -> Result<CameraId, ConfigError> {
        if self.camera_by_name(&config.name).is_some() {
            return Err(ConfigError::DuplicateCamera(config.name.clone()));
        }
        let id = CameraId(self.cameras.len());
        self.cameras.push(SecurityCamera::new(id, config)?);
        Ok(id)
    }

    /// Adds a console linked to existing cameras.
    pub fn add_console(
        &mut self,
        name: &str,
        cameras: Vec<CameraId>,
        autoswitch: AutoswitchConfig,
    ) -> Result<ConsoleId, ConfigError> {
        if let Some(missing) = cameras.iter().find(|id| id.0 >= self.cameras.len()) {
            return Err(ConfigError::UnknownCamera {
                console: name.to_string(),
                camera: missing.to_string(),
            });
        }
        let id = ConsoleId(self.consoles.len());
        self.consoles
            .push(SecurityConsole::new(id, name, cameras, autoswitch)?);
        Ok(id)
    }

    /// Pushes the initial "no camera" label to every console screen.
    pub fn announce(&self, display: &mut dyn DisplaySink) {
        for console in &self.consoles {
            display.show(DisplayUpdate {
                console: console.id(),
                label: SecurityConsole::label(None),
                feed: None,
            });
        }
    }

    pub fn cameras(&self) -> &[SecurityCamera] {
        &self.cameras
    }

    pub fn consoles(&self) -> &[SecurityConsole] {
        &self.consoles
    }

    pub fn camera(&self, id: CameraId) -> Option<&SecurityCamera> {
        self.cameras.get(id.0)
    }

    pub fn console(&self, id: ConsoleId) -> Option<&SecurityConsole> {
        self.consoles.get(id.0)
    }

    pub fn camera_by_name(&self, name: &str) -> Option<&SecurityCamera> {
        self.cameras.iter().find(|c| c.display_name() == name)
    }

    fn camera_mut(&mut self, id: CameraId) -> Result<&mut SecurityCamera, SceneError> {
        self.cameras.get_mut(id.0).ok_or(SceneError::UnknownCamera(id))
    }

    /// Overlap-enter event from a camera's detection volume.
    pub fn on_target_entered<S: AsRef<str>>(
        &mut self,
        camera: CameraId,
        target: TargetId,
        tags: &[S],
    ) -> Result<bool, SceneError> {
        Ok(self.camera_mut(camera)?.on_target_entered(target, tags))
    }

    /// Overlap-exit event from a camera's detection volume.
    pub fn on_target_exited(&mut self, camera: CameraId, target: TargetId) -> Result<bool, SceneError> {
        Ok(self.camera_mut(camera)?.on_target_exited(target))
    }

    /// Manual click on a console.
    pub fn click_console(
        &mut self,
        console: ConsoleId,
        display: &mut dyn DisplaySink,
    ) -> Result<CameraSwitch, SceneError> {
        let switch = self
            .consoles
            .get_mut(console.0)
            .ok_or(SceneError::UnknownConsole(console))?
            .on_clicked();
        self.apply_switch(switch, display);
        Ok(switch)
    }

    /// Advances a console to its next camera without touching its timer.
    pub fn activate_console(
        &mut self,
        console: ConsoleId,
        display: &mut dyn DisplaySink,
    ) -> Result<CameraSwitch, SceneError> {
        let switch = self
            .consoles
            .get_mut(console.0)
            .ok_or(SceneError::UnknownConsole(console))?
            .select_next();
        self.apply_switch(switch, display);
        Ok(switch)
    }

    fn apply_switch(&mut self, switch: CameraSwitch, display: &mut dyn DisplaySink) {
        if let Some(previous) = switch.previous.and_then(|id| self.cameras.get_mut(id.0)) {
            previous.stop_watching(switch.console);
        }

        let Some(next) = self.cameras.get_mut(switch.next.0) else {
            return;
        };
        next.start_watching(switch.console);

        let label = SecurityConsole::label(Some(next.display_name()));
        tracing::info!(console = switch.console.0, %label, "Console switched camera");
        display.show(DisplayUpdate {
            console: switch.console,
            label,
            feed: Some(next.feed_handle()),
        });
    }

    /// Runs one tick: every camera in order, then every console.
    pub fn tick<W>(
        &mut self,
        dt: f32,
        world: &W,
        notifications: &mut dyn NotificationSink,
        display: &mut dyn DisplaySink,
    ) -> TickSummary
    where
        W: ObstructionQuery + TargetLocator,
    {
        let mut summary = TickSummary::default();

        for camera in &mut self.cameras {
            let outcome = camera.tick(dt, world, notifications);
            summary.detections += outcome.detected.len();
            summary.all_clears += usize::from(outcome.all_clear);
        }

        for i in 0..self.consoles.len() {
            if self.consoles[i].tick(dt) {
                let switch = self.consoles[i].select_next();
                self.apply_switch(switch, display);
                summary.switches += 1;
            }
        }

        summary
    }

    /// Renders every camera whose feed is enabled. Returns frames rendered.
    pub fn render(&mut self, renderer: &mut dyn FeedRenderer) -> usize {
        self.cameras
            .iter_mut()
            .map(|c| c.render(renderer))
            .filter(|&rendered| rendered)
            .count()
    }
}
