#![no_main]
use arbitrary::Arbitrary;
use impulse2d::intersection::{point_in_shape, raycast, shapes_overlap, RaycastResult};
use impulse2d::manifold::collide;
use impulse2d::shape::{AxisAlignedBox, Circle, LineSegment, OrientedBox, Ray, Shape};
use impulse2d::Vec2;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum ShapeInput {
    Circle { x: i8, y: i8, radius: u8 },
    Aabb { x: i8, y: i8, w: u8, h: u8 },
    Obb { x: i8, y: i8, w: u8, h: u8, degrees: i16 },
    Segment { x1: i8, y1: i8, x2: i8, y2: i8 },
}

impl ShapeInput {
    fn build(&self) -> Shape {
        let v = |x: i8, y: i8| Vec2::new(f32::from(x) * 0.25, f32::from(y) * 0.25);
        let size = |w: u8, h: u8| Vec2::new(f32::from(w) * 0.1, f32::from(h) * 0.1);
        match *self {
            Self::Circle { x, y, radius } => Circle::new(v(x, y), f32::from(radius) * 0.1).into(),
            Self::Aabb { x, y, w, h } => AxisAlignedBox::new(v(x, y), size(w, h)).into(),
            Self::Obb { x, y, w, h, degrees } => {
                OrientedBox::new(v(x, y), size(w, h), f32::from(degrees)).into()
            }
            Self::Segment { x1, y1, x2, y2 } => LineSegment::new(v(x1, y1), v(x2, y2)).into(),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct CollisionInput {
    a: ShapeInput,
    b: ShapeInput,
    /// Ray origin and direction
    ray: (i8, i8, i8, i8),
}

// Narrow phase and queries must never panic, including for degenerate
// (zero-size, coincident) shapes.
fuzz_target!(|input: CollisionInput| {
    let a = input.a.build();
    let b = input.b.build();

    let manifold = collide(&a, &b);
    if manifold.is_colliding {
        assert!(manifold.contact_count() > 0);
    }
    let _ = shapes_overlap(&a, &b);
    let _ = point_in_shape(Vec2::ZERO, &a);

    let (ox, oy, dx, dy) = input.ray;
    let origin = Vec2::new(f32::from(ox), f32::from(oy));
    if let Ok(ray) = Ray::new(origin, Vec2::new(f32::from(dx), f32::from(dy))) {
        let mut result = RaycastResult::default();
        if raycast(&a, &ray, Some(&mut result)) {
            assert!(result.hit);
            assert!(result.t >= 0.0);
        }
    }
});
