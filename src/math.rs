//! 2D Math Primitives
//!
//! Vector, rotation and rigid transform types shared by every other module.
//!
//! # Types
//!
//! - [`Vec2`]: 2D vector with operator overloading
//! - [`Rotation`]: angle in radians with cached sine/cosine
//! - [`PhysicsTransform`]: position + rotation, local↔world mapping
//!
//! Angles are radians everywhere except [`Vec2::rotate_about`] and the
//! oriented-box API, which take degrees.

use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance used by [`approx_eq`] and the containment tests.
pub const EPSILON: f32 = 1.0e-5;

/// Approximate float equality with a tolerance that scales with magnitude.
///
/// `|x - y| <= EPSILON * max(1, |x|, |y|)`
#[inline]
#[must_use]
pub fn approx_eq(x: f32, y: f32) -> bool {
    approx_eq_eps(x, y, EPSILON)
}

/// [`approx_eq`] with a caller-supplied tolerance.
#[inline]
#[must_use]
pub fn approx_eq_eps(x: f32, y: f32, epsilon: f32) -> bool {
    (x - y).abs() <= epsilon * 1.0f32.max(x.abs().max(y.abs()))
}

// ============================================================================
// Vec2
// ============================================================================

/// 2D vector of `f32` components.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Zero vector (0, 0)
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// One vector (1, 1)
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    /// Unit X vector (1, 0)
    pub const UNIT_X: Self = Self { x: 1.0, y: 0.0 };

    /// Unit Y vector (0, 1)
    pub const UNIT_Y: Self = Self { x: 0.0, y: 1.0 };

    /// Create a new 2D vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared length (avoids sqrt).
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Length (magnitude).
    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Normalize to unit length. Returns `ZERO` for zero-length vectors.
    #[inline]
    #[must_use]
    pub fn normalize(self) -> Self {
        self.normalize_with_length().0
    }

    /// Normalize and also return the original length.
    ///
    /// Vectors shorter than `f32::EPSILON` come back as `(ZERO, 0.0)`.
    #[inline]
    #[must_use]
    pub fn normalize_with_length(self) -> (Self, f32) {
        let len = self.length();
        if len < f32::EPSILON {
            return (Self::ZERO, 0.0);
        }
        (self / len, len)
    }

    /// Dot product.
    #[inline]
    #[must_use]
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// 2D cross product (returns a scalar: `a.x * b.y - a.y * b.x`).
    #[inline]
    #[must_use]
    pub fn cross(self, rhs: Self) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Perpendicular vector (90 degrees counter-clockwise): `(-y, x)`.
    #[inline]
    #[must_use]
    pub fn skew(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Component-wise multiplication.
    #[inline]
    #[must_use]
    pub fn mul_elements(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }

    /// Component-wise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y))
    }

    /// Component-wise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y))
    }

    /// Clamp each component into `[lo, hi]`.
    #[inline]
    #[must_use]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    /// Rotate this vector about the origin by an angle in radians (counter-clockwise).
    #[must_use]
    pub fn rotate(self, radians: f32) -> Self {
        Rotation::from_angle(radians).rotate(self)
    }

    /// Rotate this point about `origin` by an angle in **degrees**.
    #[must_use]
    pub fn rotate_about(self, degrees: f32, origin: Self) -> Self {
        (self - origin).rotate(degrees.to_radians()) + origin
    }

    /// Distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Squared distance to another point.
    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        (other - self).length_squared()
    }

    /// `true` when both components are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;

    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs * self
    }
}

impl MulAssign<f32> for Vec2 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

// ============================================================================
// Rotation
// ============================================================================

/// Rotation angle (radians) with cached sine and cosine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rotation {
    /// Angle in radians
    pub angle: f32,
    /// Cached `sin(angle)`
    pub sin: f32,
    /// Cached `cos(angle)`
    pub cos: f32,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rotation {
    /// Zero rotation.
    pub const IDENTITY: Self = Self {
        angle: 0.0,
        sin: 0.0,
        cos: 1.0,
    };

    /// Build from an angle in radians.
    #[inline]
    #[must_use]
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { angle, sin, cos }
    }

    /// Build from an angle in degrees.
    #[inline]
    #[must_use]
    pub fn from_degrees(degrees: f32) -> Self {
        Self::from_angle(degrees.to_radians())
    }

    /// Build from explicit sine and cosine; the angle is recovered with `atan2`.
    #[inline]
    #[must_use]
    pub fn from_sin_cos(sin: f32, cos: f32) -> Self {
        Self {
            angle: sin.atan2(cos),
            sin,
            cos,
        }
    }

    /// Reset to angle 0.
    #[inline]
    pub fn set_identity(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Set a new angle in radians, refreshing the cache.
    #[inline]
    pub fn set_angle(&mut self, angle: f32) {
        *self = Self::from_angle(angle);
    }

    /// Angle in degrees.
    #[inline]
    #[must_use]
    pub fn degrees(&self) -> f32 {
        self.angle.to_degrees()
    }

    /// Rotated X axis.
    #[inline]
    #[must_use]
    pub fn x_axis(&self) -> Vec2 {
        Vec2::new(self.cos, self.sin)
    }

    /// Rotated Y axis.
    #[inline]
    #[must_use]
    pub fn y_axis(&self) -> Vec2 {
        Vec2::new(-self.sin, self.cos)
    }

    /// Rotate a vector.
    #[inline]
    #[must_use]
    pub fn rotate(&self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.cos * v.x - self.sin * v.y,
            self.sin * v.x + self.cos * v.y,
        )
    }

    /// Inverse-rotate a vector.
    #[inline]
    #[must_use]
    pub fn inv_rotate(&self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.cos * v.x + self.sin * v.y,
            -self.sin * v.x + self.cos * v.y,
        )
    }

    /// Compose two rotations: `self * rhs`.
    #[must_use]
    pub fn mul(&self, rhs: &Self) -> Self {
        // [qc -qs] * [rc -rs] = [qc*rc-qs*rs -qc*rs-qs*rc]
        // [qs  qc]   [rs  rc]   [qs*rc+qc*rs -qs*rs+qc*rc]
        Self {
            angle: self.angle + rhs.angle,
            sin: self.sin * rhs.cos + self.cos * rhs.sin,
            cos: self.cos * rhs.cos - self.sin * rhs.sin,
        }
    }

    /// Transpose-compose: `self^T * rhs`.
    #[must_use]
    pub fn mul_t(&self, rhs: &Self) -> Self {
        Self {
            angle: rhs.angle - self.angle,
            sin: self.cos * rhs.sin - self.sin * rhs.cos,
            cos: self.cos * rhs.cos + self.sin * rhs.sin,
        }
    }
}

// ============================================================================
// PhysicsTransform
// ============================================================================

/// Rigid transform: translation plus rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhysicsTransform {
    /// Translation
    pub position: Vec2,
    /// Orientation
    pub rotation: Rotation,
}

impl PhysicsTransform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: Rotation::IDENTITY,
    };

    /// Create a transform from a position and a rotation.
    #[inline]
    #[must_use]
    pub const fn new(position: Vec2, rotation: Rotation) -> Self {
        Self { position, rotation }
    }

    /// Create a transform from a position and an angle in radians.
    #[inline]
    #[must_use]
    pub fn from_position_angle(position: Vec2, angle: f32) -> Self {
        Self::new(position, Rotation::from_angle(angle))
    }

    /// Reset to identity.
    pub fn set_identity(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Local point → world point.
    #[inline]
    #[must_use]
    pub fn mul(&self, local: Vec2) -> Vec2 {
        self.rotation.rotate(local) + self.position
    }

    /// World point → local point. Inverse of [`mul`](Self::mul).
    #[inline]
    #[must_use]
    pub fn mul_t(&self, world: Vec2) -> Vec2 {
        self.rotation.inv_rotate(world - self.position)
    }

    /// Compose transforms: `self * rhs` maps `rhs`-local space into `self`'s parent.
    #[must_use]
    pub fn mul_transform(&self, rhs: &Self) -> Self {
        Self {
            rotation: self.rotation.mul(&rhs.rotation),
            position: self.rotation.rotate(rhs.position) + self.position,
        }
    }

    /// Relative transform: `self^-1 * rhs`.
    #[must_use]
    pub fn mul_t_transform(&self, rhs: &Self) -> Self {
        Self {
            rotation: self.rotation.mul_t(&rhs.rotation),
            position: self.rotation.inv_rotate(rhs.position - self.position),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f32::consts::{FRAC_PI_2, PI};

    fn assert_vec_eq(a: Vec2, b: Vec2) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-4);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-4);
    }

    #[test]
    fn test_vec2_arithmetic() {
        let a = Vec2::new(3.0, 5.0);
        let b = Vec2::new(1.0, 2.0);
        assert_eq!(a + b, Vec2::new(4.0, 7.0));
        assert_eq!(a - b, Vec2::new(2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(6.0, 10.0));
        assert_eq!(2.0 * a, Vec2::new(6.0, 10.0));
        assert_eq!(-a, Vec2::new(-3.0, -5.0));
        assert_eq!(a.dot(b), 13.0);
        assert_eq!(a.cross(b), 1.0);
    }

    #[test]
    fn test_vec2_normalize() {
        let n = Vec2::new(0.0, 5.0).normalize();
        assert_vec_eq(n, Vec2::UNIT_Y);

        let (z, len) = Vec2::ZERO.normalize_with_length();
        assert_eq!(z, Vec2::ZERO);
        assert_eq!(len, 0.0);

        let (_, len) = Vec2::new(3.0, 4.0).normalize_with_length();
        assert_abs_diff_eq!(len, 5.0);
    }

    #[test]
    fn test_vec2_skew_is_perpendicular() {
        let v = Vec2::new(3.0, 4.0);
        let p = v.skew();
        assert_eq!(p, Vec2::new(-4.0, 3.0));
        assert_eq!(v.dot(p), 0.0);
    }

    #[test]
    fn test_vec2_rotate_about_degrees() {
        let p = Vec2::new(2.0, 1.0).rotate_about(90.0, Vec2::new(1.0, 1.0));
        assert_vec_eq(p, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_rotation_cache() {
        let r = Rotation::from_angle(FRAC_PI_2);
        assert_abs_diff_eq!(r.sin, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r.cos, 0.0, epsilon = 1e-6);
        assert_vec_eq(r.rotate(Vec2::UNIT_X), Vec2::UNIT_Y);
        assert_vec_eq(r.inv_rotate(Vec2::UNIT_Y), Vec2::UNIT_X);
    }

    #[test]
    fn test_rotation_from_sin_cos() {
        let r = Rotation::from_sin_cos(1.0, 0.0);
        assert_abs_diff_eq!(r.angle, FRAC_PI_2, epsilon = 1e-6);

        let mut r = Rotation::from_angle(PI);
        r.set_identity();
        assert_eq!(r, Rotation::IDENTITY);
    }

    #[test]
    fn test_rotation_compose() {
        let a = Rotation::from_angle(0.3);
        let b = Rotation::from_angle(0.5);
        let ab = a.mul(&b);
        assert_abs_diff_eq!(ab.sin, 0.8f32.sin(), epsilon = 1e-6);
        let back = a.mul_t(&ab);
        assert_abs_diff_eq!(back.cos, b.cos, epsilon = 1e-6);
        assert_abs_diff_eq!(back.sin, b.sin, epsilon = 1e-6);
    }

    #[test]
    fn test_transform_round_trip() {
        let transforms = [
            PhysicsTransform::IDENTITY,
            PhysicsTransform::from_position_angle(Vec2::new(3.0, -2.0), 0.7),
            PhysicsTransform::from_position_angle(Vec2::new(-100.0, 40.0), -2.9),
        ];
        let points = [
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(-5.5, 12.25),
        ];
        for xf in &transforms {
            for &p in &points {
                assert_vec_eq(xf.mul_t(xf.mul(p)), p);
                assert_vec_eq(xf.mul(xf.mul_t(p)), p);
            }
        }
    }

    #[test]
    fn test_transform_composition() {
        let parent = PhysicsTransform::from_position_angle(Vec2::new(1.0, 2.0), FRAC_PI_2);
        let child = PhysicsTransform::from_position_angle(Vec2::new(3.0, 0.0), 0.2);
        let world = parent.mul_transform(&child);
        let p = Vec2::new(0.5, -0.5);
        assert_vec_eq(world.mul(p), parent.mul(child.mul(p)));

        let relative = parent.mul_t_transform(&world);
        assert_vec_eq(relative.position, child.position);
        assert_abs_diff_eq!(relative.rotation.angle, child.rotation.angle, epsilon = 1e-6);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0 + 1e-7));
        assert!(approx_eq(1000.0, 1000.001));
        assert!(!approx_eq(1.0, 1.1));
    }
}
