//! Prometheus metrics for camera monitoring.
//!
//! The registry is filled from a [`MetricsSnapshot`] and encoded in the
//! Prometheus text format; serving it is left to the embedding program.
//!
//! # Metrics Exposed
//!
//! ## Simulation
//! - `security_camera_ticks_total` - Simulation ticks run
//! - `security_camera_elapsed_seconds` - Simulated time
//!
//! ## Notifications
//! - `security_camera_detections_total` - Target detected notifications
//! - `security_camera_all_clear_total` - All clear notifications
//! - `security_camera_console_autoswitches_total` - Automatic console switches
//!
//! ## Cameras
//! - `security_camera_feeds_enabled` - Cameras with at least one watcher
//! - `security_camera_tracked_targets{camera}` - Targets in the detection volume
//! - `security_camera_max_detection_level{camera}` - Highest detection level
//! - `security_camera_frames_rendered{camera}` - Feed frames rendered
//!
//! # Example
//!
//! ```no_run
//! use security_cameras::config::SceneConfig;
//! use security_cameras::metrics::{MetricsRegistry, MetricsSnapshot};
//! use security_cameras::sandbox::Simulation;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! let mut simulation = Simulation::from_config(&SceneConfig::demo()).expect("demo scene");
//! simulation.step(1.0 / 30.0);
//!
//! registry.update(&MetricsSnapshot::from_simulation(&simulation));
//! println!("{}", registry.encode().expect("encode"));
//! ```

mod collector;

pub use collector::{CameraSnapshot, MetricsError, MetricsRegistry, MetricsSnapshot};
