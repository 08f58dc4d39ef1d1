//! Falling Circles Example
//!
//! Drops a column of circles past a spinning crate and reports collisions.
//!
//! ```bash
//! RUST_LOG=impulse2d=debug cargo run --example falling_circles
//! ```

use impulse2d::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> impulse2d::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut world = PhysicsWorld::new(WorldConfig {
        gravity: Vec2::new(0.0, -10.0),
        ..WorldConfig::default()
    })?;

    // A crate that falls more slowly, so the circles catch up with it
    let crate_id = world.add_body(
        RigidBody::new_dynamic(
            Vec2::new(0.2, 0.0),
            4.0,
            OrientedBox::new(Vec2::ZERO, Vec2::new(2.0, 1.0), 15.0).into(),
        )
        .with_damping(2.0, 0.0),
    );

    let mut circles = Vec::new();
    for i in 0..5 {
        let body = RigidBody::new_dynamic(
            Vec2::new(0.0, 3.0 + i as f32 * 1.5),
            1.0,
            Circle::new(Vec2::ZERO, 0.5).into(),
        )
        .with_restitution(0.6);
        circles.push(world.add_body(body));
    }

    // Air drag on every circle, sharing one generator
    if let Some(drag) = world.add_force(circles[0], Box::new(Drag { coefficient: 0.3 })) {
        for &id in &circles[1..] {
            world.attach_force(id, drag);
        }
    }

    println!("impulse2d Falling Circles");
    println!("=========================");
    println!("Bodies: {}", world.bodies().len());
    println!();

    let frame = 1.0 / 60.0;
    for frame_index in 0..180 {
        world.update(frame);
        for collision in world.collisions() {
            println!(
                "frame {frame_index:3}: {} hit {} depth {:.3} (key {})",
                collision.body_a, collision.body_b, collision.manifold.depth, collision.manifold.key
            );
        }
    }

    println!();
    if let Some(body) = world.body(crate_id) {
        println!("crate at ({:.2}, {:.2})", body.position().x, body.position().y);
    }
    for id in &circles {
        if let Some(body) = world.body(*id) {
            let p = body.position();
            println!("{id} at ({:.2}, {:.2}) v = ({:.2}, {:.2})", p.x, p.y, body.velocity.x, body.velocity.y);
        }
    }

    let probe = Ray::new(Vec2::new(-10.0, world.body(crate_id).map_or(0.0, |b| b.position().y)), Vec2::UNIT_X)?;
    match world.raycast(&probe) {
        Some((id, hit)) => println!("probe ray hit {id} at t = {:.2}", hit.t),
        None => println!("probe ray hit nothing"),
    }
    Ok(())
}
