//! Collision Manifolds
//!
//! Narrow-phase contact generation for circles and boxes.
//!
//! - Circle vs circle: single contact on the line between centers
//! - Box vs circle: Box2D-style separation search over the box polygon
//!
//! [`collide`] dispatches on the shape pair. Pairs without a manifold routine
//! produce [`CollisionManifold::default()`], which means "no collision".

use crate::math::{PhysicsTransform, Vec2, EPSILON};
use crate::shape::{Circle, Polygon, Shape};

// ============================================================================
// CollisionManifold
// ============================================================================

/// Contact data for a pair of shapes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionManifold {
    /// Unit normal pointing from shape A to shape B
    pub normal: Vec2,
    /// World-space contact points
    pub contact_points: Vec<Vec2>,
    /// Penetration depth
    pub depth: f32,
    /// `false` for the empty manifold
    pub is_colliding: bool,
    /// Monotonic id assigned by [`ManifoldKeys`]; 0 when unassigned
    pub key: u32,
}

impl CollisionManifold {
    /// Colliding manifold with a single contact point. The key is left at 0.
    #[must_use]
    pub fn single(normal: Vec2, point: Vec2, depth: f32) -> Self {
        Self {
            normal,
            contact_points: vec![point],
            depth,
            is_colliding: true,
            key: 0,
        }
    }

    /// Number of contact points.
    #[inline]
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.contact_points.len()
    }

    /// Swap the roles of A and B.
    #[must_use]
    pub fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

// ============================================================================
// Key counter
// ============================================================================

/// Counter handing out manifold keys. Owned by the world.
#[derive(Clone, Debug)]
pub struct ManifoldKeys {
    next: u32,
}

impl Default for ManifoldKeys {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl ManifoldKeys {
    /// Fresh counter; the first key handed out is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next key to a colliding manifold. Empty manifolds pass
    /// through unchanged and do not consume a key.
    pub fn stamp(&mut self, mut manifold: CollisionManifold) -> CollisionManifold {
        if manifold.is_colliding {
            manifold.key = self.next;
            self.next = self.next.wrapping_add(1);
        }
        manifold
    }

    /// Key the next colliding manifold will receive.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> u32 {
        self.next
    }
}

/// [`collide`] plus key stamping.
#[derive(Clone, Debug, Default)]
pub struct ManifoldBuilder {
    keys: ManifoldKeys,
}

impl ManifoldBuilder {
    /// New builder with its own key counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the manifold for `a` vs `b`; colliding results get a key.
    pub fn find_manifold(&mut self, a: &Shape, b: &Shape) -> CollisionManifold {
        self.keys.stamp(collide(a, b))
    }

    /// Stamp a manifold produced elsewhere (e.g. on a worker thread).
    pub fn stamp(&mut self, manifold: CollisionManifold) -> CollisionManifold {
        self.keys.stamp(manifold)
    }

    /// Underlying key counter.
    #[must_use]
    pub fn keys(&self) -> &ManifoldKeys {
        &self.keys
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Manifold for any pair of shapes; the normal points from `a` to `b`.
///
/// Supported: circle-circle, box-circle, circle-box. Every other pair yields
/// the empty manifold.
#[must_use]
pub fn collide(a: &Shape, b: &Shape) -> CollisionManifold {
    match (a, b) {
        (Shape::Circle(ca), Shape::Circle(cb)) => collide_circles(ca, cb),
        (Shape::Circle(c), other) => match box_polygon(other) {
            Some((poly, xf)) => collide_polygon_and_circle(&poly, &xf, c).flipped(),
            None => unsupported(a, b),
        },
        (other, Shape::Circle(c)) => match box_polygon(other) {
            Some((poly, xf)) => collide_polygon_and_circle(&poly, &xf, c),
            None => unsupported(a, b),
        },
        _ => unsupported(a, b),
    }
}

fn box_polygon(shape: &Shape) -> Option<(Polygon, PhysicsTransform)> {
    match shape {
        Shape::AxisAlignedBox(b) => Some(Polygon::from_aabb(b)),
        Shape::OrientedBox(b) => Some(Polygon::from_oriented_box(b)),
        _ => None,
    }
}

fn unsupported(a: &Shape, b: &Shape) -> CollisionManifold {
    tracing::trace!(a = ?a.kind(), b = ?b.kind(), "no manifold routine for shape pair");
    CollisionManifold::default()
}

// ============================================================================
// Circle vs circle
// ============================================================================

/// Circle A vs circle B.
#[must_use]
pub fn collide_circles(a: &Circle, b: &Circle) -> CollisionManifold {
    let sum_radii = a.radius + b.radius;
    let distance = b.center - a.center;
    if distance.length_squared() - sum_radii * sum_radii >= 0.0 {
        return CollisionManifold::default();
    }

    let length = distance.length();
    let depth = (length - sum_radii).abs() * 0.5;
    // Coincident centers fall back to +x
    let normal = if length > f32::EPSILON {
        distance / length
    } else {
        Vec2::UNIT_X
    };
    let contact = a.center + normal * (a.radius - depth);
    CollisionManifold::single(normal, contact, depth)
}

// ============================================================================
// Polygon vs circle
// ============================================================================

/// Polygon (placed by `xf`) vs circle. The normal points from the polygon
/// toward the circle.
#[must_use]
pub fn collide_polygon_and_circle(
    poly: &Polygon,
    xf: &PhysicsTransform,
    circle: &Circle,
) -> CollisionManifold {
    let count = poly.count();
    if count == 0 || poly.normals.len() != count {
        return CollisionManifold::default();
    }

    let c = xf.mul_t(circle.center);
    let radius = poly.radius + circle.radius;

    // Edge of maximum separation
    let mut normal_index = 0;
    let mut separation = f32::MIN;
    for (i, (v, n)) in poly.vertices.iter().zip(&poly.normals).enumerate() {
        let s = n.dot(c - *v);
        if s > radius {
            return CollisionManifold::default();
        }
        if s > separation {
            separation = s;
            normal_index = i;
        }
    }

    let v1 = poly.vertices[normal_index];
    let v2 = poly.vertices[(normal_index + 1) % count];
    let face_normal = poly.normals[normal_index];
    let face_center = (v1 + v2) * 0.5;

    // Center inside the polygon
    if separation < EPSILON {
        return to_world(xf, face_normal, face_center, radius - separation);
    }

    let u1 = (c - v1).dot(v2 - v1);
    let u2 = (c - v2).dot(v1 - v2);

    if u1 <= 0.0 {
        let (normal, distance) = (c - v1).normalize_with_length();
        if distance > radius {
            return CollisionManifold::default();
        }
        to_world(xf, normal, v1, radius - distance)
    } else if u2 <= 0.0 {
        let (normal, distance) = (c - v2).normalize_with_length();
        if distance > radius {
            return CollisionManifold::default();
        }
        to_world(xf, normal, v2, radius - distance)
    } else {
        let distance = (c - face_center).dot(face_normal);
        if distance > radius {
            return CollisionManifold::default();
        }
        to_world(xf, face_normal, face_center, radius - distance)
    }
}

fn to_world(xf: &PhysicsTransform, local_normal: Vec2, local_point: Vec2, depth: f32) -> CollisionManifold {
    CollisionManifold::single(
        xf.rotation.rotate(local_normal),
        xf.mul(local_point),
        depth,
    )
}

// ============================================================================
// Tests
// ============================================================================
