//! # impulse2d
//!
//! **2D Physics Core: Shapes, Collisions, Impulses and Ropes**
//!
//! Geometric primitives, intersection queries, impulse-resolved rigid bodies
//! on a fixed timestep, and a PBD/XPBD rope solver.
//!
//! ## Features
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`math`] | `Vec2`, cached-trig `Rotation`, `PhysicsTransform` |
//! | [`shape`] | Circle, axis-aligned box, oriented box, segment, ray, polygon view |
//! | [`intersection`] | Point/line/ray tests, SAT overlap |
//! | [`manifold`] | Circle and box-circle contact manifolds |
//! | [`body`] | Rigid bodies and body storage |
//! | [`force`] | Force generators and the force registry |
//! | [`world`] | Fixed-step world with impulse resolution |
//! | [`rope`] | Rope with six bending and two stretching models |
//! | [`entity`] | Traits the host entity layer implements |
//! | [`debug_draw`] | Injected drawing capability |
//!
//! ## Cargo features
//!
//! - `parallel`: narrow phase on the rayon thread pool
//! - `serde`: `Serialize`/`Deserialize` for math types and configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use impulse2d::prelude::*;
//!
//! let mut world = PhysicsWorld::new(WorldConfig {
//!     gravity: Vec2::ZERO,
//!     ..WorldConfig::default()
//! })
//! .unwrap();
//!
//! let ball = |x: f32, vx: f32| {
//!     RigidBody::new_dynamic(Vec2::new(x, 0.0), 1.0, Circle::new(Vec2::ZERO, 1.0).into())
//!         .with_velocity(Vec2::new(vx, 0.0))
//! };
//! let a = world.add_body(ball(-0.9, 1.0));
//! let b = world.add_body(ball(0.9, -1.0));
//!
//! world.update(1.0 / 60.0);
//! assert_eq!(world.collisions().len(), 1);
//! assert!(world.body(a).unwrap().velocity.x < 0.0);
//! assert!(world.body(b).unwrap().velocity.x > 0.0);
//! ```

#![warn(missing_docs)]

pub mod body;
pub mod debug_draw;
pub mod entity;
pub mod error;
pub mod force;
pub mod intersection;
pub mod manifold;
pub mod math;
pub mod rope;
pub mod shape;
pub mod world;

pub use body::{BodyId, BodySet, RigidBody};
pub use error::{PhysicsError, Result};
pub use math::{PhysicsTransform, Rotation, Vec2};
pub use rope::{Rope, RopeDef, RopeTuning};
pub use shape::Shape;
pub use world::{PhysicsWorld, WorldConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::body::{BodyId, RigidBody};
    pub use crate::debug_draw::{DebugColor, DebugDraw, DebugDrawData};
    pub use crate::entity::{ComponentOwner, EntityId, Transform2D};
    pub use crate::error::{PhysicsError, Result};
    pub use crate::force::{Drag, ForceGenerator, Gravity, PointAttractor};
    pub use crate::intersection::{raycast, shapes_overlap, RaycastResult};
    pub use crate::manifold::{collide, CollisionManifold};
    pub use crate::math::{PhysicsTransform, Rotation, Vec2};
    pub use crate::rope::{BendingModel, Rope, RopeDef, RopeTuning, StretchingModel};
    pub use crate::shape::{
        AxisAlignedBox, Circle, LineSegment, OrientedBox, PointContainment, Polygon, Ray, Shape,
        VertexSource,
    };
    pub use crate::world::{Collision, PhysicsWorld, WorldConfig};
}
