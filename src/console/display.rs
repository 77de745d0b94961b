//! Display/UI sink for console screens.

use crate::camera::FeedHandle;
use crate::ids::ConsoleId;

/// What a console screen should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUpdate {
    pub console: ConsoleId,
    /// Label text, e.g. `Camera: Lobby`.
    pub label: String,
    /// Feed to bind to the screen image, if any camera is active.
    pub feed: Option<FeedHandle>,
}

/// Receives label and feed bindings for console screens.
pub trait DisplaySink {
    fn show(&mut self, update: DisplayUpdate);
}

impl DisplaySink for Vec<DisplayUpdate> {
    fn show(&mut self, update: DisplayUpdate) {
        self.push(update);
    }
}

/// Keeps the latest update per console.
#[derive(Debug, Default)]
pub struct DisplayLog {
    latest: Vec<DisplayUpdate>,
    updates: u64,
}

impl DisplayLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest update for a console.
    pub fn current(&self, console: ConsoleId) -> Option<&DisplayUpdate> {
        self.latest.iter().find(|u| u.console == console)
    }

    /// Total updates received.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl DisplaySink for DisplayLog {
    fn show(&mut self, update: DisplayUpdate) {
        self.updates += 1;
        match self.latest.iter_mut().find(|u| u.console == update.console) {
            Some(slot) => *slot = update,
            None => self.latest.push(update),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_log_keeps_latest() {
        let mut log = DisplayLog::new();
        for label in ["Camera: None", "Camera: Lobby"] {
            log.show(DisplayUpdate {
                console: ConsoleId(0),
                label: label.to_string(),
                feed: None,
            });
        }
        assert_eq!(log.updates(), 2);
        assert_eq!(log.current(ConsoleId(0)).unwrap().label, "Camera: Lobby");
        assert!(log.current(ConsoleId(1)).is_none());
    }
}
