//! Security Cameras Library
//!
//! Patrolling security cameras for stealth games. A camera sweeps back and
//! forth, builds suspicion on tagged targets it can see, turns to track the
//! most-detected one and raises notifications when a target is fully
//! detected and when everything is clear again. Consoles cycle through
//! linked cameras, and only cameras watched by a console render their feed.
//!
//! # Architecture
//!
//! Each scene tick flows through the same stages for every camera:
//!
//! ```text
//! overlap events → tracking → orientation → notifications
//!                     ↑            ↓
//!            geometry (visibility probe)
//!
//! console timers → camera switch → watcher sets → feed render
//! ```
//!
//! Engine services (raycasts, target positions, trigger volumes, display and
//! notification sinks) sit behind traits. The [`sandbox`] module provides a
//! deterministic implementation of all of them.
//!
//! # Example
//!
//! ```no_run
//! use security_cameras::{
//!     config::SceneConfig,
//!     console::DisplayLog,
//!     events::NotificationQueue,
//!     sandbox::SandboxWorld,
//!     scene::Scene,
//! };
//!
//! let config = SceneConfig::demo();
//! let mut scene = Scene::from_config(&config).unwrap();
//! let world = SandboxWorld::new(&config.sandbox, config.simulation.seed);
//!
//! let mut notifications = NotificationQueue::new();
//! let mut display = DisplayLog::new();
//! scene.announce(&mut display);
//!
//! for _ in 0..config.simulation.ticks {
//!     scene.tick(config.simulation.dt, &world, &mut notifications, &mut display);
//! }
//!
//! for notification in notifications.drain() {
//!     println!("{notification}");
//! }
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod camera;
pub mod config;
pub mod console;
pub mod events;
pub mod geometry;
pub mod ids;
pub mod metrics;
pub mod orientation;
pub mod sandbox;
pub mod scene;
pub mod tracking;

// Re-export commonly used types at crate root
pub use camera::SecurityCamera;
pub use config::{CameraConfig, ConfigError, SceneConfig};
pub use console::SecurityConsole;
pub use events::{Notification, NotificationSink};
pub use geometry::{ObstructionQuery, TargetLocator};
pub use ids::{CameraId, ConsoleId, TargetId};
pub use scene::Scene;
pub use tracking::TargetTracker;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
