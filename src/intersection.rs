//! Intersection Detector
//!
//! Boolean and raycast queries between the primitives in [`crate::shape`].
//!
//! # Features
//!
//! - Point on line, point in shape
//! - Line segment vs circle / axis-aligned box / oriented box / segment
//! - Raycast vs circle / axis-aligned box / oriented box, with hit data
//! - Shape vs shape overlap (distance tests for circles, SAT for boxes)

use crate::math::{approx_eq, Vec2};
use crate::shape::{
    AxisAlignedBox, Circle, LineSegment, OrientedBox, PointContainment, Ray, Shape, VertexSource,
};

/// Stand-in for `1 / 0` in the slab tests.
const SLAB_SENTINEL: f32 = 1.0e20;

// ============================================================================
// Points
// ============================================================================

/// Is `point` on the infinite line through `line`?
///
/// Vertical lines compare x coordinates; every other line compares against
/// `y = m * x + b`. Both use [`approx_eq`].
#[must_use]
pub fn point_on_line(point: Vec2, line: &LineSegment) -> bool {
    let dx = line.end.x - line.start.x;
    let dy = line.end.y - line.start.y;
    if dx == 0.0 {
        return approx_eq(point.x, line.start.x);
    }
    let m = dy / dx;
    let b = line.end.y - m * line.end.x;
    approx_eq(point.y, m * point.x + b)
}

/// Point-in-shape for any [`Shape`].
#[inline]
#[must_use]
pub fn point_in_shape(point: Vec2, shape: &Shape) -> bool {
    shape.contains(point)
}

// ============================================================================
// Line segments
// ============================================================================

/// Segment vs circle.
#[must_use]
pub fn line_intersects_circle(line: &LineSegment, circle: &Circle) -> bool {
    if circle.contains(line.start) || circle.contains(line.end) {
        return true;
    }

    let ab = line.delta();
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return false;
    }

    // Project the center onto the segment
    let t = (circle.center - line.start).dot(ab) / len_sq;
    if !(0.0..=1.0).contains(&t) {
        return false;
    }

    let closest = line.start + ab * t;
    circle.contains(closest)
}

/// Segment vs axis-aligned box (slab method).
#[must_use]
pub fn line_intersects_aabb(line: &LineSegment, aabb: &AxisAlignedBox) -> bool {
    if aabb.contains(line.start) || aabb.contains(line.end) {
        return true;
    }

    let dir = line.delta().normalize();
    let Some((t_min, t_max)) = slab_interval(line.start, dir, aabb) else {
        return false;
    };

    let t = if t_min < 0.0 { t_max } else { t_min };
    t > 0.0 && t * t < line.length_squared()
}

/// Segment vs oriented box: move the segment into the box frame and reuse
/// [`line_intersects_aabb`].
#[must_use]
pub fn line_intersects_oriented_box(line: &LineSegment, obb: &OrientedBox) -> bool {
    let local = LineSegment::new(obb.to_local(line.start), obb.to_local(line.end));
    let aabb = AxisAlignedBox::from_min_max(obb.local_min(), obb.local_max());
    line_intersects_aabb(&local, &aabb)
}

/// Segment vs segment (orientation test, collinear overlap included).
#[must_use]
pub fn line_intersects_line(a: &LineSegment, b: &LineSegment) -> bool {
    let d1 = a.delta().cross(b.start - a.start);
    let d2 = a.delta().cross(b.end - a.start);
    let d3 = b.delta().cross(a.start - b.start);
    let d4 = b.delta().cross(a.end - b.start);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && a.contains(b.start))
        || (d2 == 0.0 && a.contains(b.end))
        || (d3 == 0.0 && b.contains(a.start))
        || (d4 == 0.0 && b.contains(a.end))
}

/// Segment vs any [`Shape`]. Segment vs ray is not supported and returns `false`.
#[must_use]
pub fn line_intersects_shape(line: &LineSegment, shape: &Shape) -> bool {
    match shape {
        Shape::Circle(c) => line_intersects_circle(line, c),
        Shape::AxisAlignedBox(b) => line_intersects_aabb(line, b),
        Shape::OrientedBox(b) => line_intersects_oriented_box(line, b),
        Shape::LineSegment(l) => line_intersects_line(line, l),
        Shape::Ray(_) => {
            tracing::trace!("segment vs ray intersection is not supported");
            false
        }
    }
}

/// Entry/exit parameters of a ray-like query against a box.
///
/// Zero direction components use [`SLAB_SENTINEL`] as their inverse.
fn slab_interval(origin: Vec2, dir: Vec2, aabb: &AxisAlignedBox) -> Option<(f32, f32)> {
    let inv = Vec2::new(
        if dir.x != 0.0 { 1.0 / dir.x } else { SLAB_SENTINEL },
        if dir.y != 0.0 { 1.0 / dir.y } else { SLAB_SENTINEL },
    );
    let t1 = (aabb.min() - origin).mul_elements(inv);
    let t2 = (aabb.max() - origin).mul_elements(inv);

    let t_min = t1.x.min(t2.x).max(t1.y.min(t2.y));
    let t_max = t1.x.max(t2.x).min(t1.y.max(t2.y));

    if t_max < 0.0 || t_min > t_max {
        return None;
    }
    Some((t_min, t_max))
}

// ============================================================================
// Raycasts
// ============================================================================

/// Hit data written by the raycast functions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RaycastResult {
    /// World-space hit point
    pub point: Vec2,
    /// Outward surface normal at the hit point
    pub normal: Vec2,
    /// Distance along the ray
    pub t: f32,
    /// Whether anything was hit
    pub hit: bool,
}

impl RaycastResult {
    /// Clear back to "no hit".
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    fn init(&mut self, point: Vec2, normal: Vec2, t: f32) {
        self.point = point;
        self.normal = normal;
        self.t = t;
        self.hit = true;
    }
}

/// Reset `result` when present; `None` is left untouched.
#[inline]
fn reset_result(result: &mut Option<&mut RaycastResult>) {
    if let Some(r) = result.as_deref_mut() {
        r.reset();
    }
}

/// Ray vs circle.
///
/// When `result` is `Some` it is reset and, on a hit, filled in. With `None`
/// nothing is written.
pub fn raycast_circle(circle: &Circle, ray: &Ray, mut result: Option<&mut RaycastResult>) -> bool {
    reset_result(&mut result);

    let origin_to_center = circle.center - ray.origin();
    let radius_sq = circle.radius * circle.radius;
    let dist_sq = origin_to_center.length_squared();

    // Project the center onto the ray direction
    let a = origin_to_center.dot(ray.direction());
    let b_sq = dist_sq - a * a;
    if radius_sq - b_sq < 0.0 {
        return false;
    }
    let f = (radius_sq - b_sq).sqrt();

    // Near intersection first, far one when the origin is inside
    let t = if a - f >= 0.0 {
        a - f
    } else if a + f >= 0.0 {
        a + f
    } else {
        return false;
    };

    if let Some(r) = result {
        let point = ray.at(t);
        r.init(point, (point - circle.center).normalize(), t);
    }
    true
}

/// Ray vs axis-aligned box.
pub fn raycast_aabb(aabb: &AxisAlignedBox, ray: &Ray, mut result: Option<&mut RaycastResult>) -> bool {
    reset_result(&mut result);

    let Some((t_min, t_max)) = slab_interval(ray.origin(), ray.direction(), aabb) else {
        return false;
    };
    let t = if t_min < 0.0 { t_max } else { t_min };
    if t <= 0.0 {
        return false;
    }

    if let Some(r) = result {
        let point = ray.at(t);
        r.init(point, aabb_hit_normal(point, aabb), t);
    }
    true
}

/// Ray vs oriented box, solved in the box frame.
pub fn raycast_oriented_box(
    obb: &OrientedBox,
    ray: &Ray,
    mut result: Option<&mut RaycastResult>,
) -> bool {
    reset_result(&mut result);

    let local_origin = obb.to_local(ray.origin());
    let local_dir = ray.direction().rotate((-obb.rotation_degrees).to_radians());
    let Ok(local_ray) = Ray::new(local_origin, local_dir) else {
        return false;
    };
    let aabb = AxisAlignedBox::from_min_max(obb.local_min(), obb.local_max());

    let mut local_hit = RaycastResult::default();
    if !raycast_aabb(&aabb, &local_ray, Some(&mut local_hit)) {
        return false;
    }

    if let Some(r) = result {
        let point = local_hit
            .point
            .rotate_about(obb.rotation_degrees, obb.position);
        let normal = local_hit.normal.rotate(obb.rotation_degrees.to_radians());
        r.init(point, normal, local_hit.t);
    }
    true
}

/// Ray vs any [`Shape`]. Segments and rays are not raycast targets.
pub fn raycast(shape: &Shape, ray: &Ray, mut result: Option<&mut RaycastResult>) -> bool {
    match shape {
        Shape::Circle(c) => raycast_circle(c, ray, result),
        Shape::AxisAlignedBox(b) => raycast_aabb(b, ray, result),
        Shape::OrientedBox(b) => raycast_oriented_box(b, ray, result),
        Shape::LineSegment(_) | Shape::Ray(_) => {
            reset_result(&mut result);
            tracing::trace!(kind = ?shape.kind(), "raycast target not supported");
            false
        }
    }
}

/// Outward normal of the box face closest to `point`.
fn aabb_hit_normal(point: Vec2, aabb: &AxisAlignedBox) -> Vec2 {
    let local = point - aabb.position;
    let half = aabb.half_size();
    let dx = (local.x.abs() - half.x).abs();
    let dy = (local.y.abs() - half.y).abs();

    if dx < dy {
        Vec2::new(if local.x >= 0.0 { 1.0 } else { -1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if local.y >= 0.0 { 1.0 } else { -1.0 })
    }
}

// ============================================================================
// Shape vs shape
// ============================================================================

/// Circle vs circle.
#[must_use]
pub fn circle_overlaps_circle(a: &Circle, b: &Circle) -> bool {
    let r = a.radius + b.radius;
    a.center.distance_squared(b.center) <= r * r
}

/// Circle vs axis-aligned box via the closest point on the box.
#[must_use]
pub fn circle_overlaps_aabb(circle: &Circle, aabb: &AxisAlignedBox) -> bool {
    let closest = circle.center.clamp(aabb.min(), aabb.max());
    circle.center.distance_squared(closest) <= circle.radius * circle.radius
}

/// Circle vs oriented box, solved in the box frame.
#[must_use]
pub fn circle_overlaps_oriented_box(circle: &Circle, obb: &OrientedBox) -> bool {
    let local = Circle::new(obb.to_local(circle.center), circle.radius);
    let aabb = AxisAlignedBox::from_min_max(obb.local_min(), obb.local_max());
    circle_overlaps_aabb(&local, &aabb)
}

/// Separating-axis test over the edge normals of both shapes.
#[must_use]
pub fn sat_overlap<A, B>(a: &A, b: &B) -> bool
where
    A: VertexSource + ?Sized,
    B: VertexSource + ?Sized,
{
    let verts_a = a.vertices();
    let verts_b = b.vertices();
    a.normals()
        .into_iter()
        .chain(b.normals())
        .all(|axis| overlap_on_axis(&verts_a, &verts_b, axis))
}

fn overlap_on_axis(verts_a: &[Vec2], verts_b: &[Vec2], axis: Vec2) -> bool {
    let (min_a, max_a) = project(verts_a, axis);
    let (min_b, max_b) = project(verts_b, axis);
    min_b <= max_a && min_a <= max_b
}

/// Project vertices onto an axis, returning `(min, max)`.
fn project(verts: &[Vec2], axis: Vec2) -> (f32, f32) {
    verts
        .iter()
        .map(|v| v.dot(axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        })
}

/// Boolean overlap for any pair of shapes.
///
/// Unsupported pairs (ray vs segment, ray vs ray) return `false`.
#[must_use]
pub fn shapes_overlap(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Circle(ca), Shape::Circle(cb)) => circle_overlaps_circle(ca, cb),
        (Shape::Circle(c), Shape::AxisAlignedBox(bx))
        | (Shape::AxisAlignedBox(bx), Shape::Circle(c)) => circle_overlaps_aabb(c, bx),
        (Shape::Circle(c), Shape::OrientedBox(bx)) | (Shape::OrientedBox(bx), Shape::Circle(c)) => {
            circle_overlaps_oriented_box(c, bx)
        }
        (Shape::AxisAlignedBox(ba), Shape::AxisAlignedBox(bb)) => sat_overlap(ba, bb),
        (Shape::AxisAlignedBox(ba), Shape::OrientedBox(bb)) => sat_overlap(ba, bb),
        (Shape::OrientedBox(ba), Shape::AxisAlignedBox(bb)) => sat_overlap(ba, bb),
        (Shape::OrientedBox(ba), Shape::OrientedBox(bb)) => sat_overlap(ba, bb),
        (Shape::LineSegment(l), other) | (other, Shape::LineSegment(l)) => {
            line_intersects_shape(l, other)
        }
        (Shape::Ray(r), other) | (other, Shape::Ray(r)) => raycast(other, r, None),
    }
}

// ============================================================================
// Tests
// ============================================================================
