//! Feed render target and rendered frame descriptors.

use crate::ids::CameraId;
use crate::tracking::Color;
use glam::Vec3;
use std::collections::HashMap;

/// Handle to a camera's render target, handed to displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedHandle {
    pub camera: CameraId,
    /// Side length of the square texture in pixels.
    pub size: u32,
}

/// Square render target owned by a camera.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedOutput {
    handle: FeedHandle,
    enabled: bool,
    /// Frames rendered so far.
    sequence: u64,
}

impl FeedOutput {
    /// Creates a disabled output; cameras start with nobody watching.
    pub fn new(camera: CameraId, size: u32) -> Self {
        Self {
            handle: FeedHandle { camera, size },
            enabled: false,
            sequence: 0,
        }
    }

    #[inline]
    pub fn handle(&self) -> FeedHandle {
        self.handle
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Frames rendered so far.
    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.sequence
    }

    /// Builds the next frame if the output is enabled.
    pub(crate) fn next_frame(&mut self, eye: Vec3, forward: Vec3, indicator: Color) -> Option<FeedFrame> {
        if !self.enabled {
            return None;
        }
        self.sequence += 1;
        Some(FeedFrame {
            handle: self.handle,
            sequence: self.sequence,
            eye,
            forward,
            indicator,
        })
    }
}

/// One frame written into a render target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedFrame {
    pub handle: FeedHandle,
    /// Monotonic per-camera sequence number, starting at 1.
    pub sequence: u64,
    /// Lens position.
    pub eye: Vec3,
    /// Lens direction.
    pub forward: Vec3,
    /// Detection indicator at render time.
    pub indicator: Color,
}

impl FeedFrame {
    /// Width of the frame in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.handle.size
    }

    /// Height of the frame in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.handle.size
    }

    /// Total pixel count (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width() as usize) * (self.height() as usize)
    }
}

/// Rendering output sink.
pub trait FeedRenderer {
    /// Draws the camera view described by `frame` into its render target.
    fn render(&mut self, frame: &FeedFrame);
}

impl FeedRenderer for Vec<FeedFrame> {
    fn render(&mut self, frame: &FeedFrame) {
        self.push(*frame);
    }
}

/// Renderer that only counts frames per camera.
#[derive(Debug, Default)]
pub struct FrameCounter {
    counts: HashMap<CameraId, u64>,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered for a camera.
    pub fn count(&self, camera: CameraId) -> u64 {
        self.counts.get(&camera).copied().unwrap_or(0)
    }

    /// Frames rendered across all cameras.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl FeedRenderer for FrameCounter {
    fn render(&mut self, frame: &FeedFrame) {
        *self.counts.entry(frame.handle.camera).or_insert(0) += 1;
    }
}
