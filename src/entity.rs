//! Entity-Layer Contract
//!
//! The physics core does not own game objects. It talks to whatever entity
//! framework hosts it through two traits:
//!
//! - [`Transform2D`]: a position/rotation component the core reads and writes
//! - [`ComponentOwner`]: an object that can hold a transform and a body handle
//!
//! [`PhysicsWorld::register_rigid_body`](crate::world::PhysicsWorld::register_rigid_body)
//! and [`PhysicsWorld::sync_transforms`](crate::world::PhysicsWorld::sync_transforms)
//! are the only places these traits are consumed.

use crate::body::BodyId;
use crate::math::{PhysicsTransform, Rotation, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of an entity in the host framework.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId(pub u64);

/// Position/rotation component owned by the entity layer.
pub trait Transform2D {
    /// World position.
    fn position(&self) -> Vec2;
    /// Set the world position.
    fn set_position(&mut self, position: Vec2);
    /// Rotation in radians.
    fn rotation(&self) -> f32;
    /// Set the rotation in radians.
    fn set_rotation(&mut self, radians: f32);
}

/// An entity that can carry a transform component and a rigid body.
pub trait ComponentOwner {
    /// Transform component type; `Default` is used when one must be created.
    type Transform: Transform2D + Default;

    /// Stable id of this entity.
    fn entity_id(&self) -> EntityId;

    /// Transform component, if present.
    fn transform(&self) -> Option<&Self::Transform>;

    /// Mutable transform component, if present.
    fn transform_mut(&mut self) -> Option<&mut Self::Transform>;

    /// Attach a transform component.
    fn insert_transform(&mut self, transform: Self::Transform);

    /// Body currently attached, if any.
    fn rigid_body(&self) -> Option<BodyId>;

    /// Attach a body handle. Attaching the same id twice is a no-op.
    fn attach_rigid_body(&mut self, id: BodyId);

    /// Drop the body handle.
    fn detach_rigid_body(&mut self);
}

impl Transform2D for PhysicsTransform {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn rotation(&self) -> f32 {
        self.rotation.angle
    }

    fn set_rotation(&mut self, radians: f32) {
        self.rotation.set_angle(radians);
    }
}

/// Get-or-create the owner's transform and return it as a [`PhysicsTransform`].
pub fn seed_transform<O: ComponentOwner + ?Sized>(owner: &mut O) -> PhysicsTransform {
    if owner.transform().is_none() {
        tracing::debug!(entity = owner.entity_id().0, "creating transform component");
        owner.insert_transform(O::Transform::default());
    }
    owner
        .transform()
        .map(|t| PhysicsTransform::new(t.position(), Rotation::from_angle(t.rotation())))
        .unwrap_or_default()
}

/// Copy a body transform into an entity transform.
pub fn write_transform<T: Transform2D + ?Sized>(target: &mut T, source: &PhysicsTransform) {
    target.set_position(source.position);
    target.set_rotation(source.rotation.angle);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_seed_transform_creates_missing() {
        let mut node = Node::default();
        let xf = seed_transform(&mut node);
        assert!(node.transform.is_some());
        assert_eq!(xf.position, Vec2::ZERO);
    }

    #[test]
    fn test_seed_transform_reads_existing() {
        let mut node = Node {
            transform: Some(PhysicsTransform::from_position_angle(Vec2::new(2.0, 3.0), 0.5)),
            ..Node::default()
        };
        let xf = seed_transform(&mut node);
        assert_eq!(xf.position, Vec2::new(2.0, 3.0));
        assert_abs_diff_eq!(xf.rotation.angle, 0.5);
        assert_abs_diff_eq!(xf.rotation.sin, 0.5f32.sin());
    }

    #[test]
    fn test_write_transform() {
        let mut target = PhysicsTransform::IDENTITY;
        let source = PhysicsTransform::from_position_angle(Vec2::new(-1.0, 4.0), 1.25);
        write_transform(&mut target, &source);
        assert_eq!(target.position, source.position);
        assert_abs_diff_eq!(target.rotation.cos, 1.25f32.cos());
    }
}
