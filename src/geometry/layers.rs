//! Raycast layer filtering.

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Bit set of physics layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches nothing.
    pub const NONE: LayerMask = LayerMask(0);
    /// Matches every layer.
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    /// Layer 0, where objects live unless configured otherwise.
    pub const DEFAULT: LayerMask = LayerMask(1);

    /// Mask with only the given layer set.
    pub const fn layer(index: u32) -> Self {
        LayerMask(1 << (index % 32))
    }

    /// Returns true if the two masks share any layer.
    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::DEFAULT
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 | rhs.0)
    }
}
