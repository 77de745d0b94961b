//! Sandbox world state: target bodies, occluders and overlap bookkeeping.

use super::{Aabb, Sphere};
use crate::config::{OccluderConfig, OccluderShape, SandboxConfig, TargetConfig};
use crate::geometry::{LayerMask, ObstructionQuery, RayHit, TargetLocator};
use crate::ids::{CameraId, TargetId};
use glam::Vec3;
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use std::collections::{BTreeSet, HashMap};

/// Maximum heading change of a wandering target, radians per second.
const WANDER_TURN_RATE: f32 = 2.0;

/// Trigger-volume event for one camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlapEvent {
    Entered { target: TargetId, tags: Vec<String> },
    Exited { target: TargetId },
}

#[derive(Debug, Clone)]
struct Body {
    id: TargetId,
    tags: Vec<String>,
    position: Vec3,
    radius: f32,
    height: f32,
    wander_speed: f32,
    /// Heading on the ground plane, radians.
    heading: f32,
}

impl Body {
    fn bounds(&self) -> Aabb {
        let half = Vec3::new(self.radius, 0.0, self.radius);
        Aabb::new(
            self.position - half,
            self.position + half + Vec3::Y * self.height,
        )
    }
}

#[derive(Debug, Clone)]
enum Occluder {
    Box(Aabb),
    Sphere(Sphere),
}

impl Occluder {
    fn ray_distance(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        match self {
            Occluder::Box(aabb) => aabb.ray_distance(origin, direction),
            Occluder::Sphere(sphere) => sphere.ray_distance(origin, direction),
        }
    }
}

/// A flat arena with target bodies and static occluders.
pub struct SandboxWorld {
    bodies: Vec<Body>,
    occluders: Vec<(Occluder, LayerMask)>,
    arena_half_extent: f32,
    rng: ChaCha8Rng,
    /// Targets last reported inside each camera's volume.
    inside: HashMap<CameraId, BTreeSet<TargetId>>,
}

impl SandboxWorld {
    /// Builds a world from configuration with a seeded random walk.
    pub fn new(config: &SandboxConfig, seed: u64) -> Self {
        let mut world = Self {
            bodies: Vec::new(),
            occluders: Vec::new(),
            arena_half_extent: config.arena_half_extent,
            rng: ChaCha8Rng::seed_from_u64(seed),
            inside: HashMap::new(),
        };
        for target in &config.targets {
            world.add_target(target.clone());
        }
        for occluder in &config.occluders {
            world.add_occluder(occluder.clone());
        }
        tracing::debug!(
            targets = world.bodies.len(),
            occluders = world.occluders.len(),
            seed,
            "Sandbox world built"
        );
        world
    }

    /// Adds or replaces a target body.
    pub fn add_target(&mut self, target: TargetConfig) {
        let heading = self.unit_random() * std::f32::consts::TAU;
        let wander_speed = if target.wanders() { target.wander_speed } else { 0.0 };
        let body = Body {
            id: target.id,
            tags: target.tags,
            position: target.position,
            radius: target.radius,
            height: target.height,
            wander_speed,
            heading,
        };
        match self.bodies.iter_mut().find(|b| b.id == body.id) {
            Some(existing) => *existing = body,
            None => self.bodies.push(body),
        }
    }

    /// Removes a target body. Cameras see it exit on the next overlap pass.
    pub fn remove_target(&mut self, id: TargetId) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.id != id);
        self.bodies.len() != before
    }

    /// Teleports a target.
    pub fn set_position(&mut self, id: TargetId, position: Vec3) -> bool {
        match self.bodies.iter_mut().find(|b| b.id == id) {
            Some(body) => {
                body.position = position;
                true
            }
            None => false,
        }
    }

    pub fn add_occluder(&mut self, occluder: OccluderConfig) {
        let shape = match occluder.shape {
            OccluderShape::Box { min, max } => Occluder::Box(Aabb::new(min, max)),
            OccluderShape::Sphere { center, radius } => Occluder::Sphere(Sphere { center, radius }),
        };
        self.occluders.push((shape, occluder.layers));
    }

    /// Ids of all targets in insertion order.
    pub fn target_ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.bodies.iter().map(|b| b.id)
    }

    /// Moves wandering targets along a seeded random walk inside the arena.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let limit = self.arena_half_extent;

        for i in 0..self.bodies.len() {
            if self.bodies[i].wander_speed <= 0.0 {
                continue;
            }
            let turn = (self.unit_random() * 2.0 - 1.0) * WANDER_TURN_RATE * dt;

            let body = &mut self.bodies[i];
            body.heading += turn;
            let step = Vec3::new(body.heading.cos(), 0.0, body.heading.sin()) * body.wander_speed * dt;
            let mut next = body.position + step;

            // Bounce off the arena walls.
            if next.x.abs() > limit {
                next.x = next.x.clamp(-limit, limit);
                body.heading = std::f32::consts::PI - body.heading;
            }
            if next.z.abs() > limit {
                next.z = next.z.clamp(-limit, limit);
                body.heading = -body.heading;
            }
            body.position = next;
        }
    }

    /// Diffs which targets lie within `radius` of `center` against the last
    /// call for the same camera and returns enter/exit events.
    pub fn overlap_events(&mut self, camera: CameraId, center: Vec3, radius: f32) -> Vec<OverlapEvent> {
        let now: BTreeSet<TargetId> = self
            .bodies
            .iter()
            .filter(|b| b.position.distance(center) <= radius)
            .map(|b| b.id)
            .collect();
        let before = self.inside.insert(camera, now.clone()).unwrap_or_default();

        let mut events: Vec<OverlapEvent> = before
            .difference(&now)
            .map(|&target| OverlapEvent::Exited { target })
            .collect();
        events.extend(
            self.bodies
                .iter()
                .filter(|b| now.contains(&b.id) && !before.contains(&b.id))
                .map(|b| OverlapEvent::Entered {
                    target: b.id,
                    tags: b.tags.clone(),
                }),
        );
        events
    }

    fn unit_random(&mut self) -> f32 {
        (self.rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new(&SandboxConfig::default(), 0)
    }
}

impl TargetLocator for SandboxWorld {
    fn position(&self, target: TargetId) -> Option<Vec3> {
        self.bodies.iter().find(|b| b.id == target).map(|b| b.position)
    }
}

impl ObstructionQuery for SandboxWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let occluder_hits = self
            .occluders
            .iter()
            .filter(|(_, mask)| mask.intersects(layers))
            .filter_map(|(shape, _)| shape.ray_distance(origin, direction))
            .map(|t| (t, None));

        let body_hits = self
            .bodies
            .iter()
            .filter(|_| LayerMask::DEFAULT.intersects(layers))
            .filter_map(|b| b.bounds().ray_distance(origin, direction).map(|t| (t, Some(b.id))));

        occluder_hits
            .chain(body_hits)
            .filter(|(t, _)| *t <= max_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(distance, target)| RayHit {
                distance,
                point: origin + direction * distance,
                target,
            })
    }
}
