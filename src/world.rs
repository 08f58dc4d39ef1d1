//! Physics World
//!
//! Owns every registered body, the force registry and the fixed-step clock.
//!
//! # Fixed step
//!
//! 1. Broad phase: all distinct pairs of finite-mass bodies with colliders
//! 2. Narrow phase: [`collide`] each pair, keep colliding manifolds
//! 3. Forces: run the [`ForceRegistry`] once
//! 4. Impulses: `impulse_iterations` passes over every contact point
//! 5. Integration: [`RigidBody::physics_update`] on every body
//!
//! [`PhysicsWorld::update`] feeds a time accumulator and drains it one fixed
//! step at a time, at most `max_steps_per_update` steps per call.

use crate::body::{BodyId, BodySet, RigidBody};
use crate::entity::{self, ComponentOwner};
use crate::error::{PhysicsError, Result};
use crate::force::{ForceGenerator, ForceRegistry, GeneratorId, Gravity};
use crate::intersection::{self, RaycastResult};
use crate::manifold::{collide, CollisionManifold, ManifoldBuilder};
use crate::math::Vec2;
use crate::shape::{Ray, Shape};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// WorldConfig
// ============================================================================

/// Configuration for the physics world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldConfig {
    /// Gravitational acceleration.
    pub gravity: Vec2,
    /// Seconds per fixed step.
    pub fixed_timestep: f32,
    /// Impulse passes per fixed step.
    pub impulse_iterations: usize,
    /// Upper bound on fixed steps run by one `update` call.
    pub max_steps_per_update: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -10.0),
            fixed_timestep: 1.0 / 60.0,
            impulse_iterations: 6,
            max_steps_per_update: 8,
        }
    }
}

impl WorldConfig {
    /// Check that the configuration can drive a simulation.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::InvalidConfiguration`] for a non-positive or non-finite
    /// timestep, a non-finite gravity, or a zero step cap.
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "fixed timestep must be finite and > 0",
            });
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "gravity must be finite",
            });
        }
        if self.max_steps_per_update == 0 {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "max steps per update must be >= 1",
            });
        }
        Ok(())
    }
}

/// A colliding pair found during the last fixed step.
#[derive(Clone, Debug, PartialEq)]
pub struct Collision {
    /// First body
    pub body_a: BodyId,
    /// Second body; the manifold normal points from A to B
    pub body_b: BodyId,
    /// Contact data
    pub manifold: CollisionManifold,
}

// ============================================================================
// PhysicsWorld
// ============================================================================

/// Impulse-based 2D rigid body world.
pub struct PhysicsWorld {
    config: WorldConfig,
    bodies: BodySet,
    forces: ForceRegistry,
    gravity_generator: GeneratorId,
    manifolds: ManifoldBuilder,
    collisions: Vec<Collision>,
    accumulator: f32,
    step_count: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::build(WorldConfig::default())
    }
}

impl PhysicsWorld {
    /// Create an empty world.
    ///
    /// # Errors
    ///
    /// Propagates [`WorldConfig::validate`].
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        let mut forces = ForceRegistry::new();
        let gravity_generator = forces.add_generator(Box::new(Gravity::new(config.gravity)));
        Self {
            config,
            bodies: BodySet::new(),
            forces,
            gravity_generator,
            manifolds: ManifoldBuilder::new(),
            collisions: Vec::new(),
            accumulator: 0.0,
            step_count: 0,
        }
    }

    /// Reconfigure gravity and timestep, and reset the clock.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::InvalidConfiguration`] if the resulting configuration
    /// is invalid; the world is left unchanged in that case.
    pub fn initialize(&mut self, gravity: Vec2, fixed_timestep: f32) -> Result<()> {
        let config = WorldConfig {
            gravity,
            fixed_timestep,
            ..self.config.clone()
        };
        config.validate()?;
        self.config.fixed_timestep = fixed_timestep;
        self.set_gravity(gravity);
        self.accumulator = 0.0;
        tracing::debug!(?gravity, fixed_timestep, "physics world initialized");
        Ok(())
    }

    /// Replace the gravity applied to every gravity-affected body.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
        self.forces
            .replace_generator(self.gravity_generator, Box::new(Gravity::new(gravity)));
    }

    /// Current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ---- lifecycle ----

    /// Add a body that has no owning entity.
    pub fn add_body(&mut self, body: RigidBody) -> BodyId {
        self.insert(body, None)
    }

    /// Register `body` for `owner`.
    ///
    /// The owner's transform is fetched or created and seeds the body's
    /// transform. An owner that already holds a live body keeps it and
    /// `body` is discarded.
    pub fn register_rigid_body<O>(&mut self, owner: &mut O, mut body: RigidBody) -> BodyId
    where
        O: ComponentOwner + ?Sized,
    {
        if let Some(existing) = owner.rigid_body() {
            if self.bodies.contains(existing) {
                tracing::debug!(entity = owner.entity_id().0, body = %existing, "rigid body already registered");
                return existing;
            }
        }

        body.transform = entity::seed_transform(owner);
        let id = self.insert(body, Some(owner.entity_id()));
        owner.attach_rigid_body(id);
        id
    }

    fn insert(&mut self, body: RigidBody, owner: Option<entity::EntityId>) -> BodyId {
        let affected = body.affected_by_gravity;
        let id = self.bodies.insert(body, owner);
        if affected {
            self.forces.add(id, self.gravity_generator);
        }
        tracing::debug!(body = %id, ?owner, gravity = affected, "rigid body registered");
        id
    }

    /// Remove a body and its force associations. Unknown ids are a no-op.
    pub fn unregister_rigid_body(&mut self, id: BodyId) -> Option<RigidBody> {
        let slot = self.bodies.remove(id)?;
        self.forces.remove_body(id);
        self.collisions.retain(|c| c.body_a != id && c.body_b != id);
        tracing::debug!(body = %id, "rigid body unregistered");
        Some(slot.body)
    }

    /// Remove the owner's body and detach it from the owner.
    pub fn unregister_owner<O>(&mut self, owner: &mut O) -> Option<RigidBody>
    where
        O: ComponentOwner + ?Sized,
    {
        let id = owner.rigid_body()?;
        owner.detach_rigid_body();
        self.unregister_rigid_body(id)
    }

    /// Store `generator` and attach it to `body`.
    ///
    /// Returns `None` when the body is not registered.
    pub fn add_force(&mut self, body: BodyId, generator: Box<dyn ForceGenerator>) -> Option<GeneratorId> {
        if !self.bodies.contains(body) {
            return None;
        }
        let id = self.forces.add_generator(generator);
        self.forces.add(body, id);
        Some(id)
    }

    /// Attach an already stored generator to another body.
    pub fn attach_force(&mut self, body: BodyId, generator: GeneratorId) -> bool {
        self.bodies.contains(body) && self.forces.add(body, generator)
    }

    // ---- access ----

    /// Body by id.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(id)
    }

    /// Mutable body by id.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id)
    }

    /// All bodies.
    #[inline]
    #[must_use]
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    /// Force registry.
    #[inline]
    #[must_use]
    pub fn forces(&self) -> &ForceRegistry {
        &self.forces
    }

    /// Collisions found in the most recent fixed step.
    #[inline]
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Fixed steps run since creation.
    #[inline]
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Unconsumed time in the accumulator.
    #[inline]
    #[must_use]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    // ---- stepping ----

    /// Advance the clock by `delta_time` seconds. Returns the number of fixed
    /// steps that ran.
    pub fn update(&mut self, delta_time: f32) -> usize {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return 0;
        }

        let fixed = self.config.fixed_timestep;
        self.accumulator += delta_time;

        let mut steps = 0;
        while self.accumulator >= fixed && steps < self.config.max_steps_per_update {
            self.fixed_update();
            self.accumulator -= fixed;
            steps += 1;
        }

        if self.accumulator >= fixed {
            let dropped = (self.accumulator / fixed).floor();
            tracing::warn!(
                dropped_steps = dropped,
                max_steps = self.config.max_steps_per_update,
                "physics falling behind, dropping accumulated time"
            );
            self.accumulator %= fixed;
        }
        steps
    }

    /// Run exactly one fixed step.
    pub fn fixed_update(&mut self) {
        let dt = self.config.fixed_timestep;

        self.detect_collisions();
        self.forces.update_forces(&mut self.bodies, dt);

        for _ in 0..self.config.impulse_iterations {
            for collision in &self.collisions {
                if let Some((a, b)) = self.bodies.get2_mut(collision.body_a, collision.body_b) {
                    apply_impulse(a, b, &collision.manifold);
                }
            }
        }

        for (_, body) in self.bodies.iter_mut() {
            body.physics_update(dt);
        }

        self.step_count += 1;
        tracing::trace!(step = self.step_count, collisions = self.collisions.len(), "fixed step");
    }

    /// Pairs of bodies that both have colliders and finite mass.
    fn candidate_pairs(&self) -> Vec<(BodyId, BodyId, Shape, Shape)> {
        let slots = self.bodies.slots();
        let mut pairs = Vec::new();
        for (i, a) in slots.iter().enumerate() {
            if a.body.has_infinite_mass() {
                continue;
            }
            let Some(shape_a) = a.body.world_collider() else {
                continue;
            };
            for b in &slots[i + 1..] {
                if b.body.has_infinite_mass() {
                    continue;
                }
                if let Some(shape_b) = b.body.world_collider() {
                    pairs.push((a.id, b.id, shape_a, shape_b));
                }
            }
        }
        pairs
    }

    fn detect_collisions(&mut self) {
        self.collisions.clear();
        let candidates = self.candidate_pairs();

        #[cfg(feature = "parallel")]
        let manifolds: Vec<CollisionManifold> = candidates
            .par_iter()
            .map(|(_, _, a, b)| collide(a, b))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let manifolds: Vec<CollisionManifold> = candidates
            .iter()
            .map(|(_, _, a, b)| collide(a, b))
            .collect();

        for ((body_a, body_b, _, _), manifold) in candidates.into_iter().zip(manifolds) {
            if !manifold.is_colliding {
                continue;
            }
            self.collisions.push(Collision {
                body_a,
                body_b,
                manifold: self.manifolds.stamp(manifold),
            });
        }
    }

    // ---- queries ----

    /// Closest body whose collider the ray hits.
    #[must_use]
    pub fn raycast(&self, ray: &Ray) -> Option<(BodyId, RaycastResult)> {
        let mut best: Option<(BodyId, RaycastResult)> = None;
        for (id, body) in self.bodies.iter() {
            let Some(shape) = body.world_collider() else {
                continue;
            };
            let mut hit = RaycastResult::default();
            if !intersection::raycast(&shape, ray, Some(&mut hit)) {
                continue;
            }
            if best.as_ref().map_or(true, |(_, b)| hit.t < b.t) {
                best = Some((id, hit));
            }
        }
        best
    }

    /// Copy body transforms back into their owners' transform components.
    ///
    /// Returns how many owners were written.
    pub fn sync_transforms<'a, O, I>(&self, owners: I) -> usize
    where
        O: ComponentOwner + 'a,
        I: IntoIterator<Item = &'a mut O>,
    {
        let mut written = 0;
        for owner in owners {
            let Some(body) = owner.rigid_body().and_then(|id| self.bodies.get(id)) else {
                continue;
            };
            let transform = body.transform;
            if let Some(target) = owner.transform_mut() {
                entity::write_transform(target, &transform);
                written += 1;
            }
        }
        written
    }
}

impl core::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("bodies", &self.bodies.len())
            .field("force_registrations", &self.forces.len())
            .field("collisions", &self.collisions.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Resolve one collision along its normal, once per contact point.
///
/// Skipped when both bodies are static or when they already separate.
pub fn apply_impulse(a: &mut RigidBody, b: &mut RigidBody, manifold: &CollisionManifold) {
    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum == 0.0 {
        return;
    }

    let normal = manifold.normal;
    let count = manifold.contact_count();
    let restitution = a.restitution.min(b.restitution);

    for _ in &manifold.contact_points {
        let relative_velocity = b.velocity - a.velocity;
        let velocity_along_normal = relative_velocity.dot(normal);
        if velocity_along_normal > 0.0 {
            continue;
        }

        let mut j = -(1.0 + restitution) * velocity_along_normal / inv_sum;
        if count > 1 {
            j /= count as f32;
        }

        a.apply_linear_impulse(-(normal * j));
        b.apply_linear_impulse(normal * j);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use crate::force::Drag;
    use crate::math::PhysicsTransform;
    use crate::shape::{AxisAlignedBox, Circle};
    use approx::assert_abs_diff_eq;

    #[derive(Default)]
    struct Node {
        id: u64,
        transform: Option<PhysicsTransform>,
        body: Option<BodyId>,
    }

    impl ComponentOwner for Node {
        type Transform = PhysicsTransform;

        fn entity_id(&self) -> EntityId {
            EntityId(self.id)
        }
        fn transform(&self) -> Option<&PhysicsTransform> {
            self.transform.as_ref()
        }
        fn transform_mut(&mut self) -> Option<&mut PhysicsTransform> {
            self.transform.as_mut()
        }
        fn insert_transform(&mut self, transform: PhysicsTransform) {
            self.transform = Some(transform);
        }
        fn rigid_body(&self) -> Option<BodyId> {
            self.body
        }
        fn attach_rigid_body(&mut self, id: BodyId) {
            self.body = Some(id);
        }
        fn detach_rigid_body(&mut self) {
            self.body = None;
        }
    }

    fn zero_g() -> PhysicsWorld {
        PhysicsWorld::new(WorldConfig {
            gravity: Vec2::ZERO,
            ..WorldConfig::default()
        })
        .unwrap()
    }

    fn ball(x: f32, vx: f32) -> RigidBody {
        RigidBody::new_dynamic(Vec2::new(x, 0.0), 1.0, Shape::from(Circle::new(Vec2::ZERO, 1.0)))
            .with_velocity(Vec2::new(vx, 0.0))
    }

    #[test]
    fn test_config_validation() {
        assert!(WorldConfig::default().validate().is_ok());
        let bad_dt = WorldConfig {
            fixed_timestep: 0.0,
            ..WorldConfig::default()
        };
        assert!(PhysicsWorld::new(bad_dt).is_err());
        let bad_cap = WorldConfig {
            max_steps_per_update: 0,
            ..WorldConfig::default()
        };
        assert!(bad_cap.validate().is_err());
    }

    #[test]
    fn test_gravity_applies_to_registered_bodies() {
        let mut world = PhysicsWorld::default();
        let falling = world.add_body(ball(0.0, 0.0));
        let floating = world.add_body(ball(10.0, 0.0).with_gravity(false));
        world.fixed_update();

        let dt = world.config().fixed_timestep;
        assert_abs_diff_eq!(world.body(falling).unwrap().velocity.y, -10.0 * dt, epsilon = 1e-6);
        assert_eq!(world.body(floating).unwrap().velocity, Vec2::ZERO);
    }

    #[test]
    fn test_set_gravity_replaces_generator() {
        let mut world = PhysicsWorld::default();
        let id = world.add_body(ball(0.0, 0.0));
        world.set_gravity(Vec2::new(5.0, 0.0));
        world.fixed_update();
        let v = world.body(id).unwrap().velocity;
        assert!(v.x > 0.0);
        assert_eq!(v.y, 0.0);
        assert_eq!(world.forces().len(), 1);
    }

    #[test]
    fn test_initialize() {
        let mut world = PhysicsWorld::default();
        assert!(world.initialize(Vec2::new(0.0, -9.8), 0.01).is_ok());
        assert_eq!(world.config().fixed_timestep, 0.01);
        assert_eq!(world.config().gravity, Vec2::new(0.0, -9.8));

        assert!(world.initialize(Vec2::ZERO, -1.0).is_err());
        assert_eq!(world.config().fixed_timestep, 0.01);
    }

    #[test]
    fn test_update_accumulates() {
        let mut world = zero_g();
        assert_eq!(world.update(0.035), 2);
        assert_eq!(world.update(0.01), 0);
        assert_eq!(world.update(0.01), 1);
        assert_eq!(world.step_count(), 3);
        assert_eq!(world.update(0.0), 0);
        assert_eq!(world.update(f32::NAN), 0);
    }

    #[test]
    fn test_update_clamps_steps() {
        let mut world = PhysicsWorld::new(WorldConfig {
            max_steps_per_update: 3,
            ..WorldConfig::default()
        })
        .unwrap();
        assert_eq!(world.update(1.0), 3);
        assert!(world.accumulator() < world.config().fixed_timestep);
    }

    #[test]
    fn test_head_on_impulse_reverses_velocities() {
        let mut world = zero_g();
        let a = world.add_body(ball(-0.9, 1.0).with_restitution(1.0));
        let b = world.add_body(ball(0.9, -1.0).with_restitution(1.0));
        world.fixed_update();

        assert_eq!(world.collisions().len(), 1);
        assert_abs_diff_eq!(world.body(a).unwrap().velocity.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(world.body(b).unwrap().velocity.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_coincident_circles_separate() {
        let mut world = zero_g();
        let a = world.add_body(ball(0.0, 1.0).with_restitution(1.0));
        let b = world.add_body(ball(0.0, 0.0).with_restitution(1.0));
        world.fixed_update();

        assert_eq!(world.collisions().len(), 1);
        assert_abs_diff_eq!(world.body(a).unwrap().velocity.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(world.body(b).unwrap().velocity.x, 1.0, epsilon = 1e-5);

        for _ in 0..180 {
            world.fixed_update();
        }
        assert!(world.collisions().is_empty());
    }

    #[test]
    fn test_inelastic_impulse() {
        let mut world = zero_g();
        let a = world.add_body(ball(-0.9, 1.0).with_restitution(0.0));
        let b = world.add_body(ball(0.9, -1.0).with_restitution(1.0));
        world.fixed_update();
        // min restitution wins: both stop
        assert_abs_diff_eq!(world.body(a).unwrap().velocity.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(world.body(b).unwrap().velocity.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_static_pairs_are_skipped() {
        let mut world = zero_g();
        world.add_body(RigidBody::new_static(
            Vec2::ZERO,
            Shape::from(AxisAlignedBox::new(Vec2::ZERO, Vec2::new(10.0, 1.0))),
        ));
        world.add_body(ball(0.0, 0.0));
        world.fixed_update();
        assert!(world.collisions().is_empty());
    }

    #[test]
    fn test_collision_keys_increase() {
        let mut world = zero_g();
        world.add_body(ball(-0.5, 0.0));
        world.add_body(ball(0.5, 0.0));
        world.fixed_update();
        let first = world.collisions()[0].manifold.key;
        world.fixed_update();
        let second = world.collisions()[0].manifold.key;
        assert!(first > 0);
        assert!(second > first);
    }

    #[test]
    fn test_unregister() {
        let mut world = PhysicsWorld::default();
        let id = world.add_body(ball(0.0, 0.0));
        assert_eq!(world.forces().len(), 1);

        assert!(world.unregister_rigid_body(id).is_some());
        assert!(world.body(id).is_none());
        assert!(world.forces().is_empty());
        assert!(world.unregister_rigid_body(id).is_none());
    }

    #[test]
    fn test_register_with_owner() {
        let mut world = zero_g();
        let mut node = Node {
            id: 42,
            transform: Some(PhysicsTransform::from_position_angle(Vec2::new(3.0, 4.0), 0.0)),
            body: None,
        };
        let id = world.register_rigid_body(&mut node, ball(0.0, 0.0));
        assert_eq!(node.body, Some(id));
        assert_eq!(world.body(id).unwrap().position(), Vec2::new(3.0, 4.0));
        assert_eq!(world.bodies().owner_of(id), Some(EntityId(42)));

        // Second registration keeps the first body
        let again = world.register_rigid_body(&mut node, ball(0.0, 0.0));
        assert_eq!(again, id);
        assert_eq!(world.bodies().len(), 1);

        assert!(world.unregister_owner(&mut node).is_some());
        assert!(node.body.is_none());
    }

    #[test]
    fn test_register_creates_transform() {
        let mut world = zero_g();
        let mut node = Node::default();
        world.register_rigid_body(&mut node, ball(5.0, 0.0));
        assert!(node.transform.is_some());
    }

    #[test]
    fn test_sync_transforms() {
        let mut world = zero_g();
        let mut nodes = vec![Node::default(), Node { id: 1, ..Node::default() }];
        for node in &mut nodes {
            world.register_rigid_body(node, ball(0.0, 2.0).with_gravity(false));
        }
        world.fixed_update();
        let written = world.sync_transforms(nodes.iter_mut());
        assert_eq!(written, 2);
        let dt = world.config().fixed_timestep;
        for node in &nodes {
            assert_abs_diff_eq!(node.transform.unwrap().position.x, 2.0 * dt, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_add_force() {
        let mut world = zero_g();
        let id = world.add_body(ball(0.0, 4.0));
        assert!(world.add_force(id, Box::new(Drag { coefficient: 1.0 })).is_some());
        world.fixed_update();
        assert!(world.body(id).unwrap().velocity.x < 4.0);

        world.unregister_rigid_body(id);
        assert!(world.add_force(id, Box::new(Drag { coefficient: 1.0 })).is_none());
    }

    #[test]
    fn test_raycast_closest() {
        let mut world = zero_g();
        let far = world.add_body(ball(10.0, 0.0));
        let near = world.add_body(ball(5.0, 0.0));
        let ray = Ray::new(Vec2::ZERO, Vec2::UNIT_X).unwrap();
        let (hit_id, hit) = world.raycast(&ray).unwrap();
        assert_eq!(hit_id, near);
        assert_ne!(hit_id, far);
        assert_abs_diff_eq!(hit.t, 4.0, epsilon = 1e-5);

        let up = Ray::new(Vec2::ZERO, Vec2::UNIT_Y).unwrap();
        assert!(world.raycast(&up).is_none());
    }

    #[test]
    fn test_debug_format() {
        let world = PhysicsWorld::default();
        let s = format!("{world:?}");
        assert!(s.contains("PhysicsWorld"));
        assert!(s.contains("bodies"));
    }
}
