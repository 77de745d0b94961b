//! Deterministic stand-in world.
//!
//! Implements the collaborators a game engine would normally provide:
//! raycasts ([`ObstructionQuery`](crate::geometry::ObstructionQuery)), target
//! positions ([`TargetLocator`](crate::geometry::TargetLocator)) and
//! trigger-volume overlap events. [`Simulation`] drives a scene against it
//! at a fixed step for the CLI and benches.

mod driver;
mod shapes;
mod world;

pub use driver::Simulation;
pub use shapes::{Aabb, Sphere};
pub use world::{OverlapEvent, SandboxWorld};
