//! Seeded initial boid distributions.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{Boid, HALF_EXTENT};

/// `count` boids spread uniformly over the simulation square.
///
/// Positions are drawn from `[-0.5, 0.5)` per axis and velocities from the
/// same range; the first tick clamps any speed above the cap. The same seed
/// always gives the same flock.
pub fn spawn_uniform(count: usize, seed: u64) -> Vec<Boid> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let position = Vec2::new(
                rng.gen_range(-HALF_EXTENT..HALF_EXTENT),
                rng.gen_range(-HALF_EXTENT..HALF_EXTENT),
            );
            let velocity = Vec2::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5));
            Boid { position, velocity }
        })
        .collect()
}
