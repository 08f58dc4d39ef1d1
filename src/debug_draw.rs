//! Debug Drawing
//!
//! The core never renders. Anything that wants to visualize itself (the
//! rope solver) emits segments and points into a caller-supplied
//! [`DebugDraw`] implementation.
//!
//! [`DebugDrawData`] is a ready-made implementation that just records the
//! primitives, for tests and headless tools.

use crate::math::Vec2;

/// RGBA color for debug rendering (0-255 per channel)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebugColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl DebugColor {
    /// Create a new color
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Rope segments
    pub const ROPE: Self = Self::new(102, 128, 179, 255);
    /// Pinned (zero inverse mass) particles
    pub const PINNED: Self = Self::new(26, 204, 26, 255);
    /// Free particles
    pub const PARTICLE: Self = Self::new(179, 51, 102, 255);
}

/// Drawing capability injected by the caller.
pub trait DebugDraw {
    /// Draw a line segment.
    fn draw_segment(&mut self, p1: Vec2, p2: Vec2, color: DebugColor);

    /// Draw a point of the given pixel size.
    fn draw_point(&mut self, p: Vec2, size: f32, color: DebugColor);
}

/// A recorded segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugSegment {
    /// Start point
    pub start: Vec2,
    /// End point
    pub end: Vec2,
    /// Color
    pub color: DebugColor,
}

/// A recorded point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugPoint {
    /// Position
    pub position: Vec2,
    /// Size
    pub size: f32,
    /// Color
    pub color: DebugColor,
}

/// Recording [`DebugDraw`] implementation.
#[derive(Clone, Debug, Default)]
pub struct DebugDrawData {
    /// Segments in emission order
    pub segments: Vec<DebugSegment>,
    /// Points in emission order
    pub points: Vec<DebugPoint>,
}

impl DebugDrawData {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.points.clear();
    }

    /// Total number of primitives.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.segments.len() + self.points.len()
    }
}

impl DebugDraw for DebugDrawData {
    fn draw_segment(&mut self, p1: Vec2, p2: Vec2, color: DebugColor) {
        self.segments.push(DebugSegment {
            start: p1,
            end: p2,
            color,
        });
    }

    fn draw_point(&mut self, p: Vec2, size: f32, color: DebugColor) {
        self.points.push(DebugPoint {
            position: p,
            size,
            color,
        });
    }
}
