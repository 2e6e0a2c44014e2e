//! Seeded demo scenes
//!
//! Scatters circles and regular polygons inside a square region. The same
//! seed always produces the same world, so recorded event streams can be
//! compared across runs.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::shape::{Circle, ConvexPolygon, ResponsePolicy, Transform2};
use super::world::World;

/// Chance that a generated shape blocks instead of merely overlapping
const BLOCK_CHANCE: f64 = 0.4;
/// Chance that a generated shape is ignored entirely
const IGNORE_CHANCE: f64 = 0.1;

fn roll_response(rng: &mut Pcg32) -> ResponsePolicy {
    let roll: f64 = rng.random();
    if roll < IGNORE_CHANCE {
        ResponsePolicy::Ignore
    } else if roll < IGNORE_CHANCE + BLOCK_CHANCE {
        ResponsePolicy::Block
    } else {
        ResponsePolicy::Overlap
    }
}

/// Build a world with `count` shapes spread over `[-extent, extent]²`
pub fn random_scene(seed: u64, count: usize, extent: f32) -> World {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut world = World::new();
    let extent = extent.max(1.0);
    let max_size = (extent * 0.2).max(0.5);

    for _ in 0..count {
        let position = Vec2::new(
            rng.random_range(-extent..extent),
            rng.random_range(-extent..extent),
        );
        let size = rng.random_range(0.25 * max_size..max_size);
        let response = roll_response(&mut rng);

        if rng.random_bool(0.5) {
            world.insert(Circle::new(position, size).with_response(response));
        } else {
            let sides = rng.random_range(3..=8);
            let rotation = rng.random_range(0.0..std::f32::consts::TAU);
            let polygon = ConvexPolygon::regular(Vec2::ZERO, size, sides)
                .with_transform(Transform2::new(position, rotation, Vec2::ONE))
                .with_response(response);
            world.insert(polygon);
        }
    }

    log::info!("Scene {}: {} shapes over ±{}", seed, world.len(), extent);
    world
}
