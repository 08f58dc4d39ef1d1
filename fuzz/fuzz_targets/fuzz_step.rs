#![no_main]
use arbitrary::Arbitrary;
use impulse2d::rope::{BendingModel, RopeDef, RopeTuning, StretchingModel};
use impulse2d::shape::{Circle, OrientedBox, Shape};
use impulse2d::{PhysicsWorld, RigidBody, Rope, Vec2, WorldConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Bodies: position, velocity, mass numerator, box instead of circle
    bodies: Vec<(i8, i8, i8, i8, u8, bool)>,
    /// Number of simulation steps (capped)
    step_count: u8,
    /// Frame time in milliseconds
    frame_ms: u8,
    /// Rope particle heights
    rope: Vec<i8>,
    bending: u8,
    xpbd_stretch: bool,
}

const BENDING: [BendingModel; 6] = [
    BendingModel::SpringAngle,
    BendingModel::PbdAngle,
    BendingModel::XpbdAngle,
    BendingModel::PbdDistance,
    BendingModel::PbdHeight,
    BendingModel::PbdTriangle,
];

// Stepping the world and a rope must never panic regardless of input.
fuzz_target!(|input: FuzzInput| {
    let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();

    for &(px, py, vx, vy, mass, boxed) in input.bodies.iter().take(16) {
        let collider: Shape = if boxed {
            OrientedBox::new(Vec2::ZERO, Vec2::new(1.0, 0.5), f32::from(px) * 3.0).into()
        } else {
            Circle::new(Vec2::ZERO, 0.5).into()
        };
        // Zero mass registers a static body
        let body = RigidBody::new_dynamic(
            Vec2::new(f32::from(px) * 0.5, f32::from(py) * 0.5),
            f32::from(mass),
            collider,
        )
        .with_velocity(Vec2::new(f32::from(vx), f32::from(vy)));
        world.add_body(body);
    }

    let frame = f32::from(input.frame_ms) / 1000.0;
    let steps = (input.step_count as usize).min(32);
    for _ in 0..steps {
        world.update(frame);
    }

    let vertices: Vec<Vec2> = input
        .rope
        .iter()
        .take(24)
        .enumerate()
        .map(|(i, &h)| Vec2::new(i as f32 * 0.25, f32::from(h) * 0.05))
        .collect();
    let mut masses = vec![1.0; vertices.len()];
    if let Some(first) = masses.first_mut() {
        *first = 0.0;
    }
    let def = RopeDef {
        position: Vec2::ZERO,
        vertices,
        masses,
        gravity: Vec2::new(0.0, -10.0),
        tuning: RopeTuning {
            bending_model: BENDING[usize::from(input.bending) % BENDING.len()],
            stretching_model: if input.xpbd_stretch {
                StretchingModel::Xpbd
            } else {
                StretchingModel::Pbd
            },
            ..RopeTuning::default()
        },
    };
    // Fewer than two particles is rejected, not a panic
    if let Ok(mut rope) = Rope::new(&def) {
        for _ in 0..steps {
            rope.step(1.0 / 60.0, 4, Vec2::ZERO);
        }
    }
});
