//! Camera orientation: patrol sweep, target gaze and rate-limited rotation.

mod controller;
mod rotation;
mod sweep;

pub use controller::{OrientationController, OrientationMode};
pub use rotation::{angle_between, look_rotation, rotate_towards, RIG_CORRECTION, RIG_FORWARD};
pub use sweep::PatrolSweep;
