//! Console camera selection and autoswitch timing.
//!
//! The console only decides *which* camera becomes active; the scene applies
//! the resulting [`CameraSwitch`] to the cameras' watcher sets.

use crate::config::{AutoswitchConfig, ConfigError};
use crate::ids::{CameraId, ConsoleId};

/// Transition produced by advancing a console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraSwitch {
    pub console: ConsoleId,
    /// Camera that loses this console as a watcher.
    pub previous: Option<CameraId>,
    /// Camera that gains this console as a watcher.
    pub next: CameraId,
}

/// A console cycling through an ordered list of cameras.
#[derive(Debug, Clone)]
pub struct SecurityConsole {
    id: ConsoleId,
    name: String,
    cameras: Vec<CameraId>,
    /// `None` until the first selection, then always a valid index.
    active_index: Option<usize>,
    autoswitch: AutoswitchConfig,
    time_until_next_autoswitch: f32,
}

impl SecurityConsole {
    /// Creates a console with nothing selected.
    pub fn new(
        id: ConsoleId,
        name: impl Into<String>,
        cameras: Vec<CameraId>,
        autoswitch: AutoswitchConfig,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if cameras.is_empty() {
            return Err(ConfigError::NoLinkedCameras(name));
        }
        Ok(Self {
            id,
            name,
            cameras,
            active_index: None,
            autoswitch,
            // Due immediately: the first autoswitch tick selects the first camera.
            time_until_next_autoswitch: 0.0,
        })
    }

    /// Advances to the next camera, wrapping past the end.
    pub fn select_next(&mut self) -> CameraSwitch {
        let previous = self.active_camera();
        let next_index = match self.active_index {
            Some(index) => (index + 1) % self.cameras.len(),
            None => 0,
        };
        self.active_index = Some(next_index);

        CameraSwitch {
            console: self.id,
            previous,
            next: self.cameras[next_index],
        }
    }

    /// Manual click: advance, and push the next automatic switch back to
    /// the start delay.
    pub fn on_clicked(&mut self) -> CameraSwitch {
        let switch = self.select_next();
        if self.autoswitch.enabled {
            self.time_until_next_autoswitch = self.autoswitch.start_time;
        }
        switch
    }

    /// Counts down the autoswitch timer. Returns true when a switch is due;
    /// the caller then calls [`select_next`](Self::select_next).
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.autoswitch.enabled {
            return false;
        }
        if dt.is_finite() && dt > 0.0 {
            self.time_until_next_autoswitch -= dt;
        }
        if self.time_until_next_autoswitch <= 0.0 {
            self.time_until_next_autoswitch = self.autoswitch.interval;
            return true;
        }
        false
    }

    #[inline]
    pub fn id(&self) -> ConsoleId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Linked cameras in cycling order.
    pub fn cameras(&self) -> &[CameraId] {
        &self.cameras
    }

    /// Index of the active camera; `None` until the first selection.
    #[inline]
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Active camera id, if any.
    pub fn active_camera(&self) -> Option<CameraId> {
        self.active_index.map(|index| self.cameras[index])
    }

    /// Seconds until the next automatic switch.
    #[inline]
    pub fn time_until_next_autoswitch(&self) -> f32 {
        self.time_until_next_autoswitch
    }

    #[inline]
    pub fn autoswitch_enabled(&self) -> bool {
        self.autoswitch.enabled
    }

    /// Screen label for the given active camera name.
    pub fn label(camera_name: Option<&str>) -> String {
        format!("Camera: {}", camera_name.unwrap_or("None"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn console(count: usize, autoswitch: AutoswitchConfig) -> SecurityConsole {
        let cameras = (0..count).map(CameraId).collect();
        SecurityConsole::new(ConsoleId(0), "Desk", cameras, autoswitch).unwrap()
    }

    fn autoswitch() -> AutoswitchConfig {
        AutoswitchConfig {
            enabled: true,
            start_time: 10.0,
            interval: 3.0,
        }
    }

    #[test]
    fn test_empty_camera_list_rejected() {
        let result = SecurityConsole::new(ConsoleId(0), "Desk", vec![], AutoswitchConfig::default());
        assert!(matches!(result, Err(ConfigError::NoLinkedCameras(_))));
    }

    #[test]
    fn test_first_selection_has_no_previous() {
        let mut console = console(3, AutoswitchConfig::default());
        assert_eq!(console.active_index(), None);
        assert_eq!(console.active_camera(), None);

        let switch = console.select_next();
        assert_eq!(switch.previous, None);
        assert_eq!(switch.next, CameraId(0));
        assert_eq!(console.active_index(), Some(0));
    }

    #[test]
    fn test_wraps_past_end() {
        let mut console = console(2, AutoswitchConfig::default());
        console.select_next();
        console.select_next();
        let switch = console.select_next();
        assert_eq!(switch.previous, Some(CameraId(1)));
        assert_eq!(switch.next, CameraId(0));
    }

    #[test]
    fn test_single_camera_reselects_itself() {
        let mut console = console(1, AutoswitchConfig::default());
        console.select_next();
        let switch = console.select_next();
        assert_eq!(switch.previous, Some(CameraId(0)));
        assert_eq!(switch.next, CameraId(0));
    }

    #[test]
    fn test_autoswitch_disabled_never_fires() {
        let mut console = console(2, AutoswitchConfig::default());
        assert!(!console.tick(100.0));
    }

    #[test]
    fn test_autoswitch_fires_immediately_then_on_interval() {
        let mut console = console(2, autoswitch());
        assert!(console.tick(0.5));
        assert_eq!(console.time_until_next_autoswitch(), 3.0);

        assert!(!console.tick(1.0));
        assert!(!console.tick(1.0));
        assert!(console.tick(1.0));
    }

    #[test]
    fn test_click_resets_to_start_delay() {
        let mut console = console(2, autoswitch());
        console.tick(0.1);
        console.on_clicked();
        assert_eq!(console.time_until_next_autoswitch(), 10.0);

        let fired = (0..99).filter(|_| console.tick(0.1)).count();
        assert_eq!(fired, 0);
        assert!(console.tick(0.2));
    }

    #[test]
    fn test_label() {
        assert_eq!(SecurityConsole::label(None), "Camera: None");
        assert_eq!(SecurityConsole::label(Some("Vault")), "Camera: Vault");
    }

    proptest! {
        #[test]
        fn prop_activation_index(k in 1usize..12, n in 1usize..60) {
            let mut console = console(k, AutoswitchConfig::default());
            for _ in 0..n {
                console.select_next();
            }
            prop_assert_eq!(console.active_index(), Some((n - 1) % k));
        }
    }
}
