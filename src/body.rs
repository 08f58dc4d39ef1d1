//! Rigid Bodies
//!
//! [`RigidBody`] state and semi-implicit Euler integration, plus the
//! [`BodySet`] storage the world keeps them in.
//!
//! # Features
//!
//! - Mass / inverse mass kept consistent (`mass == 0` means static)
//! - Force accumulator cleared after every integration step
//! - Optional linear/angular damping and fixed rotation
//! - Collider stored in the body's local frame

use std::collections::HashMap;

use crate::entity::EntityId;
use crate::math::{PhysicsTransform, Rotation, Vec2};
use crate::shape::Shape;

// ============================================================================
// BodyId
// ============================================================================

/// Handle to a body registered with a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u32);

impl BodyId {
    /// Raw counter value.
    #[inline]
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for BodyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

// ============================================================================
// RigidBody
// ============================================================================

/// Point-mass rigid body with an optional collider.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidBody {
    mass: f32,
    inverse_mass: f32,
    force_accum: Vec2,
    /// Position and orientation; written by [`RigidBody::physics_update`]
    pub transform: PhysicsTransform,
    /// Linear velocity
    pub velocity: Vec2,
    /// Angular velocity (radians per second, CCW positive)
    pub angular_velocity: f32,
    /// Coefficient of restitution
    pub restitution: f32,
    /// Linear damping coefficient
    pub linear_damping: f32,
    /// Angular damping coefficient
    pub angular_damping: f32,
    /// Collider in the body's local frame
    pub collider: Option<Shape>,
    /// Whether the world's gravity generator is attached on registration
    pub affected_by_gravity: bool,
    /// Skip angular integration
    pub fixed_rotation: bool,
}

impl Default for RigidBody {
    /// Static (zero-mass) body at the origin, restitution 1, no collider.
    fn default() -> Self {
        Self {
            mass: 0.0,
            inverse_mass: 0.0,
            force_accum: Vec2::ZERO,
            transform: PhysicsTransform::IDENTITY,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            restitution: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            collider: None,
            affected_by_gravity: true,
            fixed_rotation: false,
        }
    }
}

impl RigidBody {
    /// Dynamic body at `position` with the given mass and collider.
    #[must_use]
    pub fn new_dynamic(position: Vec2, mass: f32, collider: Shape) -> Self {
        let mut body = Self {
            transform: PhysicsTransform::new(position, Rotation::IDENTITY),
            collider: Some(collider),
            ..Self::default()
        };
        body.set_mass(mass);
        body
    }

    /// Static body at `position`.
    #[must_use]
    pub fn new_static(position: Vec2, collider: Shape) -> Self {
        Self {
            transform: PhysicsTransform::new(position, Rotation::IDENTITY),
            collider: Some(collider),
            affected_by_gravity: false,
            ..Self::default()
        }
    }

    /// Builder: initial velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: restitution.
    #[must_use]
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Builder: linear and angular damping.
    #[must_use]
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Builder: gravity participation.
    #[must_use]
    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    /// Builder: lock rotation.
    #[must_use]
    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    /// Builder: collider.
    #[must_use]
    pub fn with_collider(mut self, collider: Shape) -> Self {
        self.collider = Some(collider);
        self
    }

    // ---- mass ----

    /// Set the mass. Zero, negative or non-finite values make the body static.
    pub fn set_mass(&mut self, mass: f32) {
        if mass > 0.0 && mass.is_finite() {
            self.mass = mass;
            self.inverse_mass = 1.0 / mass;
        } else {
            self.mass = 0.0;
            self.inverse_mass = 0.0;
        }
    }

    /// Mass (0 for static bodies).
    #[inline]
    #[must_use]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Inverse mass (0 for static bodies).
    #[inline]
    #[must_use]
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// `true` for static bodies.
    #[inline]
    #[must_use]
    pub fn has_infinite_mass(&self) -> bool {
        self.mass == 0.0
    }

    // ---- forces ----

    /// Accumulate a force for the next integration step.
    #[inline]
    pub fn add_force(&mut self, force: Vec2) {
        self.force_accum += force;
    }

    /// Force accumulated since the last step.
    #[inline]
    #[must_use]
    pub fn accumulated_force(&self) -> Vec2 {
        self.force_accum
    }

    /// Zero the force accumulator.
    #[inline]
    pub fn clear_accumulators(&mut self) {
        self.force_accum = Vec2::ZERO;
    }

    /// Change velocity by `impulse * inverse_mass`.
    #[inline]
    pub fn apply_linear_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.inverse_mass;
    }

    // ---- transform ----

    /// World position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// Teleport to `position`.
    #[inline]
    pub fn set_position(&mut self, position: Vec2) {
        self.transform.position = position;
    }

    /// Orientation in radians.
    #[inline]
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.transform.rotation.angle
    }

    /// Set the orientation in radians.
    #[inline]
    pub fn set_angle(&mut self, angle: f32) {
        self.transform.rotation.set_angle(angle);
    }

    /// Collider placed in world space.
    #[must_use]
    pub fn world_collider(&self) -> Option<Shape> {
        self.collider.map(|c| c.to_world(&self.transform))
    }

    // ---- integration ----

    /// Integrate one step of `dt` seconds and clear the force accumulator.
    ///
    /// Static bodies only clear their accumulator.
    pub fn physics_update(&mut self, dt: f32) {
        if self.mass == 0.0 {
            self.clear_accumulators();
            return;
        }

        let acceleration = self.force_accum * self.inverse_mass;
        self.velocity += acceleration * dt;

        self.velocity *= 1.0 / (1.0 + dt * self.linear_damping);
        self.angular_velocity *= 1.0 / (1.0 + dt * self.angular_damping);

        self.transform.position += self.velocity * dt;
        if !self.fixed_rotation {
            let angle = self.transform.rotation.angle + self.angular_velocity * dt;
            self.transform.rotation.set_angle(angle);
        }

        self.clear_accumulators();
    }
}

// ============================================================================
// BodySet
// ============================================================================

/// A registered body together with its id and optional owning entity.
#[derive(Clone, Debug)]
pub struct BodySlot {
    /// Handle
    pub id: BodyId,
    /// Owning entity, if registered through the entity layer
    pub owner: Option<EntityId>,
    /// Simulation state
    pub body: RigidBody,
}

/// Ordered body storage with id lookup. Hands out [`BodyId`]s.
#[derive(Clone, Debug, Default)]
pub struct BodySet {
    slots: Vec<BodySlot>,
    index: HashMap<BodyId, usize>,
    next_id: u32,
}

impl BodySet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a body and return its new id.
    pub fn insert(&mut self, body: RigidBody, owner: Option<EntityId>) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.index.insert(id, self.slots.len());
        self.slots.push(BodySlot { id, owner, body });
        id
    }

    /// Remove a body, keeping the order of the rest.
    pub fn remove(&mut self, id: BodyId) -> Option<BodySlot> {
        let idx = self.index.remove(&id)?;
        let slot = self.slots.remove(idx);
        self.rebuild_index();
        Some(slot)
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, slot) in self.slots.iter().enumerate() {
            self.index.insert(slot.id, i);
        }
    }

    /// Number of bodies.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` when empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether `id` is registered.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: BodyId) -> bool {
        self.index.contains_key(&id)
    }

    /// Body by id.
    #[must_use]
    pub fn get(&self, id: BodyId) -> Option<&RigidBody> {
        self.index.get(&id).map(|&i| &self.slots[i].body)
    }

    /// Mutable body by id.
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let i = *self.index.get(&id)?;
        Some(&mut self.slots[i].body)
    }

    /// Two distinct bodies mutably at once.
    pub fn get2_mut(&mut self, a: BodyId, b: BodyId) -> Option<(&mut RigidBody, &mut RigidBody)> {
        let ia = *self.index.get(&a)?;
        let ib = *self.index.get(&b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.slots.split_at_mut(ib);
            Some((&mut lo[ia].body, &mut hi[0].body))
        } else {
            let (lo, hi) = self.slots.split_at_mut(ia);
            Some((&mut hi[0].body, &mut lo[ib].body))
        }
    }

    /// Owning entity of a body.
    #[must_use]
    pub fn owner_of(&self, id: BodyId) -> Option<EntityId> {
        self.index.get(&id).and_then(|&i| self.slots[i].owner)
    }

    /// Body registered for an entity, if any.
    #[must_use]
    pub fn find_by_owner(&self, owner: EntityId) -> Option<BodyId> {
        self.slots
            .iter()
            .find(|slot| slot.owner == Some(owner))
            .map(|slot| slot.id)
    }

    /// Slots in registration order.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[BodySlot] {
        &self.slots
    }

    /// `(id, body)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> {
        self.slots.iter().map(|s| (s.id, &s.body))
    }

    /// Mutable `(id, body)` pairs in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut RigidBody)> {
        self.slots.iter_mut().map(|s| (s.id, &mut s.body))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Circle;
    use approx::assert_abs_diff_eq;

    fn ball(x: f32, mass: f32) -> RigidBody {
        RigidBody::new_dynamic(Vec2::new(x, 0.0), mass, Shape::from(Circle::new(Vec2::ZERO, 0.5)))
    }

    #[test]
    fn test_set_mass_keeps_inverse_consistent() {
        let mut b = RigidBody::default();
        assert!(b.has_infinite_mass());
        assert_eq!(b.inverse_mass(), 0.0);

        b.set_mass(4.0);
        assert_eq!(b.mass(), 4.0);
        assert_eq!(b.inverse_mass(), 0.25);

        b.set_mass(0.0);
        assert_eq!(b.inverse_mass(), 0.0);
        b.set_mass(-3.0);
        assert!(b.has_infinite_mass());
    }

    #[test]
    fn test_static_body_does_not_move() {
        let mut b = RigidBody::new_static(Vec2::new(1.0, 2.0), Shape::from(Circle::new(Vec2::ZERO, 1.0)));
        b.velocity = Vec2::new(5.0, 0.0);
        b.add_force(Vec2::new(100.0, 0.0));
        b.physics_update(1.0);
        assert_eq!(b.position(), Vec2::new(1.0, 2.0));
        assert_eq!(b.accumulated_force(), Vec2::ZERO);
    }

    #[test]
    fn test_integration_semi_implicit() {
        let mut b = ball(0.0, 2.0);
        b.add_force(Vec2::new(0.0, -20.0));
        b.physics_update(0.5);
        // a = -10, v = -5, x = v * dt = -2.5
        assert_abs_diff_eq!(b.velocity.y, -5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.position().y, -2.5, epsilon = 1e-6);
        assert_eq!(b.accumulated_force(), Vec2::ZERO);
    }

    #[test]
    fn test_damping() {
        let mut b = ball(0.0, 1.0).with_damping(1.0, 1.0).with_velocity(Vec2::new(2.0, 0.0));
        b.angular_velocity = 2.0;
        b.physics_update(1.0);
        assert_abs_diff_eq!(b.velocity.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.angular_velocity, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fixed_rotation() {
        let mut spinning = ball(0.0, 1.0);
        spinning.angular_velocity = 1.0;
        let mut locked = spinning.clone().with_fixed_rotation(true);

        spinning.physics_update(0.5);
        locked.physics_update(0.5);
        assert_abs_diff_eq!(spinning.angle(), 0.5, epsilon = 1e-6);
        assert_eq!(locked.angle(), 0.0);
    }

    #[test]
    fn test_world_collider_follows_transform() {
        let mut b = RigidBody::new_dynamic(Vec2::new(3.0, 0.0), 1.0, Shape::from(Circle::new(Vec2::new(1.0, 0.0), 0.5)));
        b.set_angle(core::f32::consts::PI);
        match b.world_collider() {
            Some(Shape::Circle(c)) => {
                assert_abs_diff_eq!(c.center.x, 2.0, epsilon = 1e-5);
                assert_abs_diff_eq!(c.center.y, 0.0, epsilon = 1e-5);
            }
            other => panic!("unexpected collider {other:?}"),
        }
    }

    #[test]
    fn test_body_set_insert_remove() {
        let mut set = BodySet::new();
        let a = set.insert(ball(0.0, 1.0), None);
        let b = set.insert(ball(1.0, 1.0), Some(EntityId(7)));
        let c = set.insert(ball(2.0, 1.0), None);
        assert_ne!(a, b);
        assert_eq!(set.len(), 3);
        assert_eq!(set.owner_of(b), Some(EntityId(7)));
        assert_eq!(set.find_by_owner(EntityId(7)), Some(b));

        let removed = set.remove(b).map(|s| s.id);
        assert_eq!(removed, Some(b));
        assert!(set.remove(b).is_none());
        assert!(!set.contains(b));

        // Index survives the shift
        assert_abs_diff_eq!(set.get(c).map(|b| b.position().x).unwrap(), 2.0);
        let ids: Vec<_> = set.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);

        // Ids are never reused
        let d = set.insert(ball(3.0, 1.0), None);
        assert!(d > c);
    }

    #[test]
    fn test_get2_mut() {
        let mut set = BodySet::new();
        let a = set.insert(ball(0.0, 1.0), None);
        let b = set.insert(ball(1.0, 1.0), None);
        {
            let (ba, bb) = set.get2_mut(b, a).unwrap();
            ba.velocity = Vec2::UNIT_X;
            bb.velocity = Vec2::UNIT_Y;
        }
        assert_eq!(set.get(b).unwrap().velocity, Vec2::UNIT_X);
        assert_eq!(set.get(a).unwrap().velocity, Vec2::UNIT_Y);
        assert!(set.get2_mut(a, a).is_none());
    }
}
