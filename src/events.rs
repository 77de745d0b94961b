//! Fire-and-forget notifications raised by cameras.
//!
//! Downstream game logic (alarms, guard dispatch) hooks up by implementing
//! [`NotificationSink`]. Nothing in the core waits on a sink.

use crate::ids::{CameraId, TargetId};
use std::fmt;

/// A one-shot signal emitted during a camera tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// A target's detection level reached 1.0.
    TargetDetected {
        /// Camera that made the detection.
        camera: CameraId,
        /// The detected target.
        target: TargetId,
    },
    /// No tracked target remains above zero detection after a detection.
    AllClear {
        /// Camera that cleared.
        camera: CameraId,
    },
}

impl Notification {
    /// Camera that raised the notification.
    pub fn camera(&self) -> CameraId {
        match *self {
            Notification::TargetDetected { camera, .. } => camera,
            Notification::AllClear { camera } => camera,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::TargetDetected { camera, target } => {
                write!(f, "{camera}: detected {target}")
            }
            Notification::AllClear { camera } => write!(f, "{camera}: all clear"),
        }
    }
}

/// Receiver for camera notifications.
pub trait NotificationSink {
    /// Delivers a notification.
    fn notify(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Buffers notifications until the caller drains them.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Vec<Notification>,
    total_detections: u64,
    total_all_clears: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything queued so far.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Detections seen since creation, drained or not.
    pub fn total_detections(&self) -> u64 {
        self.total_detections
    }

    /// All-clear signals seen since creation, drained or not.
    pub fn total_all_clears(&self) -> u64 {
        self.total_all_clears
    }
}

impl NotificationSink for NotificationQueue {
    fn notify(&mut self, notification: Notification) {
        match notification {
            Notification::TargetDetected { .. } => self.total_detections += 1,
            Notification::AllClear { .. } => self.total_all_clears += 1,
        }
        self.pending.push(notification);
    }
}
