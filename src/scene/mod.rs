//! Registry owning every camera and console of a level.
//!
//! Cameras and consoles refer to each other only through [`CameraId`] and
//! [`ConsoleId`]; the scene is the single place that mutates both sides of a
//! watcher relationship.
//!
//! [`CameraId`]: crate::ids::CameraId
//! [`ConsoleId`]: crate::ids::ConsoleId

mod registry;

pub use registry::{Scene, SceneError, TickSummary};
