//! 2-D flocking: data, update kernel, sprite kernel and the CPU host.
//!
//! Boids live in the square `[-0.5, 0.5]^2` with toroidal wraparound. Each
//! tick reads every boid from the "now" buffer and writes each boid's next
//! state into its own slot of the "next" buffer, then the buffers swap roles.
//!
//! # Rules
//!
//! | Rule | Threshold | Weight | Contribution |
//! |------|-----------|--------|--------------|
//! | Cohesion | `rule1_d2` | `rule1_w` | toward neighbour centroid |
//! | Separation | `rule2_d2` | `rule2_w` | raw sum of `self - other` |
//! | Alignment | `rule3_d2` | `rule3_w` | average neighbour velocity |
//!
//! Thresholds are squared distances. Cohesion and alignment each average over
//! their own neighbour count.

mod kernel;
mod pingpong;
pub mod shader;
mod simulation;
mod spawn;
mod sprite;

use glam::Vec2;

use crate::GpuLayout;

pub use kernel::{clamp_speed, dispatch, dispatch_sequential, integrate_wrapped, update_boid};
pub use pingpong::PingPong;
pub use simulation::{FlockSimulation, FlockStats};
pub use spawn::spawn_uniform;
pub use sprite::{
    orientation, sprite_fragment, sprite_vertex, SpriteCamera, SpriteCameraGpu, SpriteVertex,
    SPRITE_TRIANGLE,
};

/// Speeds at or below this revert to the previous velocity.
pub const MIN_SPEED: f32 = 0.001;

/// Speed cap applied after all rules.
pub const MAX_SPEED: f32 = 0.1;

/// Half the side of the simulation square.
pub const HALF_EXTENT: f32 = 0.5;

/// One flocking agent.
#[derive(GpuLayout, Clone, Copy, Debug, Default, PartialEq)]
pub struct Boid {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Boid {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }
}

/// Per-tick simulation parameters.
///
/// Read-only for the whole tick. Distances are stored squared so the kernel
/// never takes a square root in the neighbour loop.
#[derive(GpuLayout, Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    pub dt: f32,
    /// Cohesion radius, squared.
    pub rule1_d2: f32,
    /// Separation radius, squared.
    pub rule2_d2: f32,
    /// Alignment radius, squared.
    pub rule3_d2: f32,
    pub rule1_w: f32,
    pub rule2_w: f32,
    pub rule3_w: f32,
}

impl SimParams {
    /// Build from unsquared radii.
    pub fn from_distances(dt: f32, distances: [f32; 3], weights: [f32; 3]) -> Self {
        let [d1, d2, d3] = distances;
        let [w1, w2, w3] = weights;
        Self {
            dt,
            rule1_d2: d1 * d1,
            rule2_d2: d2 * d2,
            rule3_d2: d3 * d3,
            rule1_w: w1,
            rule2_w: w2,
            rule3_w: w3,
        }
    }

    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self::from_distances(0.01, [0.1, 0.025, 0.025], [0.05, 0.5, 0.2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boid_gpu_layout() {
        assert_eq!(Boid::SIZE, 16);
        assert_eq!(Boid::field_offset("position"), Some(0));
        assert_eq!(Boid::field_offset("velocity"), Some(8));
        assert_eq!(std::mem::size_of::<BoidGpu>(), 16);
    }

    #[test]
    fn test_sim_params_packed() {
        assert_eq!(SimParams::SIZE, 28);
        assert_eq!(std::mem::size_of::<SimParamsGpu>(), 28);
        assert_eq!(SimParams::field_offset("rule3_w"), Some(24));
    }

    #[test]
    fn test_sim_params_squares_distances() {
        let params = SimParams::from_distances(0.5, [0.1, 0.2, 0.3], [1.0, 2.0, 3.0]);
        assert_eq!(params.rule1_d2, 0.1 * 0.1);
        assert_eq!(params.rule2_d2, 0.2 * 0.2);
        assert_eq!(params.rule3_d2, 0.3 * 0.3);
        assert_eq!(params.rule2_w, 2.0);
        assert_eq!(params.with_dt(0.25).dt, 0.25);
    }
}
