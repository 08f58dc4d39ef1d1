//! Force Generators and Registry
//!
//! Forces are contributed by [`ForceGenerator`]s attached to individual bodies
//! through a [`ForceRegistry`]. The world runs the registry once per fixed
//! step, before impulses and integration.
//!
//! # Generators
//!
//! - [`Gravity`]: `mass * g`
//! - [`Drag`]: velocity-proportional resistance
//! - [`PointAttractor`]: inverse-square pull (or push) toward a point

use crate::body::{BodyId, BodySet, RigidBody};
use crate::math::Vec2;

/// Contributes a force to a body each fixed step.
pub trait ForceGenerator: core::fmt::Debug {
    /// Add this generator's force to `body` via [`RigidBody::add_force`].
    fn update_force(&self, body: &mut RigidBody, dt: f32);
}

// ============================================================================
// Generators
// ============================================================================

/// Uniform gravitational acceleration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gravity {
    /// Acceleration
    pub gravity: Vec2,
}

impl Gravity {
    /// Create a gravity generator.
    #[inline]
    #[must_use]
    pub const fn new(gravity: Vec2) -> Self {
        Self { gravity }
    }
}

impl ForceGenerator for Gravity {
    fn update_force(&self, body: &mut RigidBody, _dt: f32) {
        body.add_force(self.gravity * body.mass());
    }
}

/// Linear drag opposing the velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drag {
    /// Drag coefficient
    pub coefficient: f32,
}

impl ForceGenerator for Drag {
    fn update_force(&self, body: &mut RigidBody, _dt: f32) {
        let force = body.velocity * -self.coefficient;
        body.add_force(force);
    }
}

/// Inverse-square attractor, clamped near the center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointAttractor {
    /// Attractor position
    pub center: Vec2,
    /// Strength (`F = strength / r^2`)
    pub strength: f32,
    /// Force magnitude cap
    pub max_force: f32,
    /// Push away instead of pulling
    pub repulsive: bool,
}

impl ForceGenerator for PointAttractor {
    fn update_force(&self, body: &mut RigidBody, _dt: f32) {
        let delta = self.center - body.position();
        let dist_sq = delta.length_squared();
        if dist_sq == 0.0 {
            return;
        }
        let direction = delta / dist_sq.sqrt();
        let magnitude = (self.strength / dist_sq).min(self.max_force);
        let force = if self.repulsive {
            -direction * magnitude
        } else {
            direction * magnitude
        };
        body.add_force(force);
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Handle to a generator stored in a [`ForceRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeneratorId(usize);

/// Generator storage plus `(body, generator)` associations with set semantics.
#[derive(Debug, Default)]
pub struct ForceRegistry {
    generators: Vec<Box<dyn ForceGenerator>>,
    registrations: Vec<(BodyId, GeneratorId)>,
}

impl ForceRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a generator and return its handle.
    pub fn add_generator(&mut self, generator: Box<dyn ForceGenerator>) -> GeneratorId {
        self.generators.push(generator);
        GeneratorId(self.generators.len() - 1)
    }

    /// Swap the generator behind `id`. Returns `false` for unknown handles.
    pub fn replace_generator(&mut self, id: GeneratorId, generator: Box<dyn ForceGenerator>) -> bool {
        match self.generators.get_mut(id.0) {
            Some(slot) => {
                *slot = generator;
                true
            }
            None => false,
        }
    }

    /// Associate a generator with a body.
    ///
    /// Returns `false` if the pair already exists or the handle is unknown.
    pub fn add(&mut self, body: BodyId, generator: GeneratorId) -> bool {
        if generator.0 >= self.generators.len() || self.contains(body, generator) {
            return false;
        }
        self.registrations.push((body, generator));
        true
    }

    /// Drop one association.
    pub fn remove(&mut self, body: BodyId, generator: GeneratorId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|&r| r != (body, generator));
        self.registrations.len() != before
    }

    /// Drop every association of `body`.
    pub fn remove_body(&mut self, body: BodyId) {
        self.registrations.retain(|&(b, _)| b != body);
    }

    /// Drop every association; generators stay stored.
    pub fn clear(&mut self) {
        self.registrations.clear();
    }

    /// Whether `body` is associated with `generator`.
    #[must_use]
    pub fn contains(&self, body: BodyId, generator: GeneratorId) -> bool {
        self.registrations.contains(&(body, generator))
    }

    /// Number of associations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// `true` when there are no associations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Run every association once. Bodies missing from `bodies` are skipped.
    pub fn update_forces(&self, bodies: &mut BodySet, dt: f32) {
        for &(body_id, gen_id) in &self.registrations {
            let (Some(body), Some(generator)) = (bodies.get_mut(body_id), self.generators.get(gen_id.0)) else {
                continue;
            };
            generator.update_force(body, dt);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
