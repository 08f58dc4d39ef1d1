//! Shape Primitives
//!
//! Circle, axis-aligned box, oriented box, line segment and ray, each a
//! distinct struct. [`Shape`] tags them for dispatch; there is no shared base
//! type. Two small capability traits cover what the collision code needs:
//!
//! - [`PointContainment`]: point-in-shape test
//! - [`VertexSource`]: world-space vertices and outward edge normals (boxes)
//!
//! [`Polygon`] is the narrow-phase view of a box: local vertices/normals plus
//! the transform that places them in the world.

use crate::error::{PhysicsError, Result};
use crate::math::{approx_eq, PhysicsTransform, Rotation, Vec2, EPSILON};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Capability traits
// ============================================================================

/// Point-in-shape query.
pub trait PointContainment {
    /// Returns `true` if `point` lies inside (or on) the shape.
    fn contains(&self, point: Vec2) -> bool;
}

/// Shapes that can be described as a convex vertex loop.
pub trait VertexSource {
    /// World-space vertices in counter-clockwise order.
    fn vertices(&self) -> Vec<Vec2>;

    /// Outward unit normal of each edge `vertices[i] -> vertices[i + 1]`.
    fn normals(&self) -> Vec<Vec2>;
}

/// Outward unit normals for a counter-clockwise vertex loop.
///
/// # Errors
///
/// [`PhysicsError::DegenerateGeometry`] for an empty loop or a zero-length edge.
pub fn edge_normals(vertices: &[Vec2]) -> Result<Vec<Vec2>> {
    if vertices.is_empty() {
        return Err(PhysicsError::DegenerateGeometry {
            reason: "empty vertex list",
        });
    }
    let n = vertices.len();
    let mut normals = Vec::with_capacity(n);
    for i in 0..n {
        let edge = vertices[(i + 1) % n] - vertices[i];
        let (normal, len) = Vec2::new(edge.y, -edge.x).normalize_with_length();
        if len <= EPSILON {
            return Err(PhysicsError::DegenerateGeometry {
                reason: "zero-length polygon edge",
            });
        }
        normals.push(normal);
    }
    Ok(normals)
}

// ============================================================================
// Circle
// ============================================================================

/// Circle given by its center and radius.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Circle {
    /// Center point
    pub center: Vec2,
    /// Radius
    pub radius: f32,
}

impl Circle {
    /// Create a circle.
    #[inline]
    #[must_use]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl PointContainment for Circle {
    /// Per-axis test: `|dx| <= r && |dy| <= r`.
    ///
    /// Accepts the whole bounding square of the circle, not just the disc.
    /// [`line_intersects_circle`](crate::intersection::line_intersects_circle)
    /// relies on this for its endpoint check.
    fn contains(&self, point: Vec2) -> bool {
        let d = point - self.center;
        d.x.abs() <= self.radius && d.y.abs() <= self.radius
    }
}

// ============================================================================
// AxisAlignedBox
// ============================================================================

/// Box whose edges stay parallel to the world axes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisAlignedBox {
    /// Center point
    pub position: Vec2,
    /// Full width and height
    pub size: Vec2,
}

impl AxisAlignedBox {
    /// Create a box from its center and full size.
    #[inline]
    #[must_use]
    pub const fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Create a box spanning `min..max`.
    #[must_use]
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            position: (min + max) * 0.5,
            size: max - min,
        }
    }

    /// Half of the size.
    #[inline]
    #[must_use]
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Minimum corner.
    #[inline]
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.position - self.half_size()
    }

    /// Maximum corner.
    #[inline]
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.position + self.half_size()
    }

    /// Always zero.
    #[inline]
    #[must_use]
    pub fn rotation(&self) -> f32 {
        0.0
    }

    /// Axis-aligned boxes cannot rotate; only `0.0` is accepted.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::RotationNotSupported`] for any non-zero angle.
    pub fn set_rotation(&mut self, degrees: f32) -> Result<()> {
        if degrees != 0.0 {
            return Err(PhysicsError::RotationNotSupported { degrees });
        }
        Ok(())
    }
}

impl PointContainment for AxisAlignedBox {
    fn contains(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

impl VertexSource for AxisAlignedBox {
    fn vertices(&self) -> Vec<Vec2> {
        let min = self.min();
        let max = self.max();
        vec![
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ]
    }

    fn normals(&self) -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, -1.0),
            Vec2::UNIT_X,
            Vec2::UNIT_Y,
            Vec2::new(-1.0, 0.0),
        ]
    }
}

// ============================================================================
// OrientedBox
// ============================================================================

/// Box rotated about its center.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientedBox {
    /// Center point
    pub position: Vec2,
    /// Full width and height
    pub size: Vec2,
    /// Counter-clockwise rotation about the center, in degrees
    pub rotation_degrees: f32,
}

impl OrientedBox {
    /// Create an oriented box.
    #[inline]
    #[must_use]
    pub const fn new(position: Vec2, size: Vec2, rotation_degrees: f32) -> Self {
        Self {
            position,
            size,
            rotation_degrees,
        }
    }

    /// Half of the size.
    #[inline]
    #[must_use]
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Minimum corner of the unrotated box.
    #[inline]
    #[must_use]
    pub fn local_min(&self) -> Vec2 {
        self.position - self.half_size()
    }

    /// Maximum corner of the unrotated box.
    #[inline]
    #[must_use]
    pub fn local_max(&self) -> Vec2 {
        self.position + self.half_size()
    }

    /// Rotation as a cached [`Rotation`].
    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        Rotation::from_degrees(self.rotation_degrees)
    }

    /// Transform placing the box's local frame (origin at the center) in the world.
    #[inline]
    #[must_use]
    pub fn transform(&self) -> PhysicsTransform {
        PhysicsTransform::new(self.position, self.rotation())
    }

    /// Bring a world point into the unrotated frame of the box.
    #[inline]
    #[must_use]
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        point.rotate_about(-self.rotation_degrees, self.position)
    }
}

impl PointContainment for OrientedBox {
    fn contains(&self, point: Vec2) -> bool {
        let local = self.to_local(point);
        let min = self.local_min();
        let max = self.local_max();
        local.x >= min.x && local.x <= max.x && local.y >= min.y && local.y <= max.y
    }
}

impl VertexSource for OrientedBox {
    fn vertices(&self) -> Vec<Vec2> {
        let min = self.local_min();
        let max = self.local_max();
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ]
        .iter()
        .map(|v| v.rotate_about(self.rotation_degrees, self.position))
        .collect()
    }

    fn normals(&self) -> Vec<Vec2> {
        let rot = self.rotation();
        let x = rot.x_axis();
        let y = rot.y_axis();
        vec![-y, x, y, -x]
    }
}

// ============================================================================
// LineSegment
// ============================================================================

/// Line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineSegment {
    /// Start point
    pub start: Vec2,
    /// End point
    pub end: Vec2,
}

impl LineSegment {
    /// Create a segment.
    #[inline]
    #[must_use]
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// `end - start`
    #[inline]
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    /// Squared length.
    #[inline]
    #[must_use]
    pub fn length_squared(&self) -> f32 {
        self.delta().length_squared()
    }

    /// Length.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.delta().length()
    }
}

impl PointContainment for LineSegment {
    /// On the supporting line and inside the segment's extents.
    fn contains(&self, point: Vec2) -> bool {
        let lo = self.start.min(self.end);
        let hi = self.start.max(self.end);
        let within = point.x >= lo.x - EPSILON
            && point.x <= hi.x + EPSILON
            && point.y >= lo.y - EPSILON
            && point.y <= hi.y + EPSILON;
        within && crate::intersection::point_on_line(point, self)
    }
}

// ============================================================================
// Ray
// ============================================================================

/// Half-line with a unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ray {
    origin: Vec2,
    direction: Vec2,
}

impl Ray {
    /// Create a ray; `direction` is normalized.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::ZeroLengthVector`] if `direction` has no length.
    pub fn new(origin: Vec2, direction: Vec2) -> Result<Self> {
        let (direction, len) = direction.normalize_with_length();
        if len == 0.0 {
            return Err(PhysicsError::ZeroLengthVector {
                context: "ray direction",
            });
        }
        Ok(Self { origin, direction })
    }

    /// Ray origin.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Unit direction.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Point at parameter `t` (distance from the origin).
    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }
}

impl PointContainment for Ray {
    fn contains(&self, point: Vec2) -> bool {
        let to_point = point - self.origin;
        let t = to_point.dot(self.direction);
        t >= -EPSILON && approx_eq(self.direction.cross(to_point), 0.0)
    }
}

// ============================================================================
// Shape
// ============================================================================

/// Discriminant of a [`Shape`], handy for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// [`Circle`]
    Circle,
    /// [`AxisAlignedBox`]
    AxisAlignedBox,
    /// [`OrientedBox`]
    OrientedBox,
    /// [`LineSegment`]
    LineSegment,
    /// [`Ray`]
    Ray,
}

/// Any supported shape.
///
/// As a body collider the shape is expressed in the body's local frame and
/// placed in the world with [`Shape::to_world`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shape {
    /// Circle
    Circle(Circle),
    /// Axis-aligned box
    AxisAlignedBox(AxisAlignedBox),
    /// Oriented box
    OrientedBox(OrientedBox),
    /// Line segment
    LineSegment(LineSegment),
    /// Ray
    Ray(Ray),
}

impl Shape {
    /// Variant tag.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle(_) => ShapeKind::Circle,
            Self::AxisAlignedBox(_) => ShapeKind::AxisAlignedBox,
            Self::OrientedBox(_) => ShapeKind::OrientedBox,
            Self::LineSegment(_) => ShapeKind::LineSegment,
            Self::Ray(_) => ShapeKind::Ray,
        }
    }

    /// Place a body-local shape in the world.
    ///
    /// Axis-aligned boxes only follow the translation; every other variant
    /// also picks up the rotation.
    #[must_use]
    pub fn to_world(&self, xf: &PhysicsTransform) -> Self {
        match *self {
            Self::Circle(c) => Self::Circle(Circle::new(xf.mul(c.center), c.radius)),
            Self::AxisAlignedBox(b) => {
                Self::AxisAlignedBox(AxisAlignedBox::new(xf.mul(b.position), b.size))
            }
            Self::OrientedBox(b) => Self::OrientedBox(OrientedBox::new(
                xf.mul(b.position),
                b.size,
                b.rotation_degrees + xf.rotation.degrees(),
            )),
            Self::LineSegment(l) => {
                Self::LineSegment(LineSegment::new(xf.mul(l.start), xf.mul(l.end)))
            }
            Self::Ray(r) => Self::Ray(Ray {
                origin: xf.mul(r.origin),
                direction: xf.rotation.rotate(r.direction),
            }),
        }
    }
}

impl PointContainment for Shape {
    fn contains(&self, point: Vec2) -> bool {
        match self {
            Self::Circle(s) => s.contains(point),
            Self::AxisAlignedBox(s) => s.contains(point),
            Self::OrientedBox(s) => s.contains(point),
            Self::LineSegment(s) => s.contains(point),
            Self::Ray(s) => s.contains(point),
        }
    }
}

impl From<Circle> for Shape {
    fn from(s: Circle) -> Self {
        Self::Circle(s)
    }
}

impl From<AxisAlignedBox> for Shape {
    fn from(s: AxisAlignedBox) -> Self {
        Self::AxisAlignedBox(s)
    }
}

impl From<OrientedBox> for Shape {
    fn from(s: OrientedBox) -> Self {
        Self::OrientedBox(s)
    }
}

impl From<LineSegment> for Shape {
    fn from(s: LineSegment) -> Self {
        Self::LineSegment(s)
    }
}

impl From<Ray> for Shape {
    fn from(s: Ray) -> Self {
        Self::Ray(s)
    }
}

// ============================================================================
// Polygon
// ============================================================================

/// Convex polygon in its own local frame, as consumed by the narrow phase.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    /// Local vertices, counter-clockwise
    pub vertices: Vec<Vec2>,
    /// Outward unit normal per edge
    pub normals: Vec<Vec2>,
    /// Skin radius added around the hull
    pub radius: f32,
}

impl Polygon {
    /// Build a polygon from a counter-clockwise vertex loop.
    ///
    /// # Errors
    ///
    /// Propagates [`edge_normals`] failures for empty or degenerate loops.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self> {
        let normals = edge_normals(&vertices)?;
        Ok(Self {
            vertices,
            normals,
            radius: 0.0,
        })
    }

    /// Centered box with the given half extents.
    #[must_use]
    pub fn centered_box(half: Vec2) -> Self {
        Self {
            vertices: vec![
                Vec2::new(-half.x, -half.y),
                Vec2::new(half.x, -half.y),
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
            ],
            normals: vec![
                Vec2::new(0.0, -1.0),
                Vec2::UNIT_X,
                Vec2::UNIT_Y,
                Vec2::new(-1.0, 0.0),
            ],
            radius: 0.0,
        }
    }

    /// Local polygon and placement for an axis-aligned box.
    #[must_use]
    pub fn from_aabb(b: &AxisAlignedBox) -> (Self, PhysicsTransform) {
        (
            Self::centered_box(b.half_size()),
            PhysicsTransform::new(b.position, Rotation::IDENTITY),
        )
    }

    /// Local polygon and placement for an oriented box.
    #[must_use]
    pub fn from_oriented_box(b: &OrientedBox) -> (Self, PhysicsTransform) {
        (Self::centered_box(b.half_size()), b.transform())
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.vertices.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
