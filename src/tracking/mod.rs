//! Suspicion accumulation over tracked targets.
//!
//! Each object that enters a camera's detection volume becomes a
//! [`PotentialTarget`] whose detection level rises while it is visible and
//! falls while it is not. The tracker aggregates those levels into a
//! [`DetectionState`] and reports detected / all-clear edges.

mod indicator;
mod target;
mod tracker;

pub use indicator::Color;
pub use target::PotentialTarget;
pub use tracker::{DetectionState, TargetTracker, TrackedTarget, TrackerOutcome};

/// Levels within this distance of a bound snap onto it.
pub const LEVEL_SNAP: f32 = 1e-4;
