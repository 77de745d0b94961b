//! Security consoles that cycle through camera feeds.

mod display;
mod selector;

pub use display::{DisplayLog, DisplaySink, DisplayUpdate};
pub use selector::{CameraSwitch, SecurityConsole};
