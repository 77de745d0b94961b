//! Security cameras and their live feeds.
//!
//! A camera owns its target tracker and orientation controller, and keeps
//! the set of consoles watching it. The feed renders only while that set is
//! non-empty.

mod feed;
mod security_camera;

pub use feed::{FeedFrame, FeedHandle, FeedOutput, FeedRenderer, FrameCounter};
pub use security_camera::SecurityCamera;
