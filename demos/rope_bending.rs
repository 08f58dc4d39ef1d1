//! Rope Bending Example
//!
//! Builds one rope per bending model, swings the anchor and prints how far
//! each rope stretched and where its tip ended up.
//!
//! ```bash
//! RUST_LOG=impulse2d=debug cargo run --example rope_bending
//! ```

use impulse2d::prelude::*;
use tracing_subscriber::EnvFilter;

const MODELS: [BendingModel; 6] = [
    BendingModel::SpringAngle,
    BendingModel::PbdAngle,
    BendingModel::XpbdAngle,
    BendingModel::PbdDistance,
    BendingModel::PbdHeight,
    BendingModel::PbdTriangle,
];

fn main() -> impulse2d::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let count = 20;
    let vertices: Vec<Vec2> = (0..count).map(|i| Vec2::new(i as f32 * 0.2, 0.0)).collect();
    let mut masses = vec![0.1; count];
    masses[0] = 0.0;
    masses[1] = 0.0;

    println!("impulse2d Rope Bending");
    println!("======================");

    let mut debug = DebugDrawData::new();
    for model in MODELS {
        let mut rope = Rope::new(&RopeDef {
            position: Vec2::ZERO,
            vertices: vertices.clone(),
            masses: masses.clone(),
            gravity: Vec2::new(0.0, -10.0),
            tuning: RopeTuning {
                bending_model: model,
                stretching_model: StretchingModel::Xpbd,
                bend_hertz: 30.0,
                bend_damping: 4.0,
                ..RopeTuning::default()
            },
        })?;

        let dt = 1.0 / 60.0;
        for frame in 0..300 {
            let t = frame as f32 * dt;
            rope.step(dt, 8, Vec2::new(0.5 * (2.0 * t).sin(), 0.0));
        }

        let tip = rope.positions()[count - 1];
        println!(
            "{model:?}: length {:.3} / {:.3}, tip ({:.2}, {:.2})",
            rope.current_length(),
            rope.rest_length(),
            tip.x,
            tip.y
        );

        debug.clear();
        rope.draw(&mut debug);
    }

    println!();
    println!("Last rope emitted {} debug primitives", debug.primitive_count());
    Ok(())
}
