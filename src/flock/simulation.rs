//! CPU flock host: owns the ping-pong buffers and advances them tick by tick.

use glam::Vec2;

use super::{dispatch, spawn_uniform, Boid, PingPong, SimParams};
use crate::config::FlockConfig;
use crate::error::{ConfigError, DispatchError};
use crate::time::Time;

/// A running flock on the CPU.
///
/// Use method chaining to configure, then call [`FlockSimulation::step`]
/// once per tick.
///
/// ```ignore
/// let mut sim = FlockSimulation::new(spawn_uniform(1000, 0))
///     .with_params(SimParams::default());
/// for _ in 0..100 {
///     sim.step()?;
/// }
/// println!("{:?}", sim.stats());
/// ```
#[derive(Debug, Clone)]
pub struct FlockSimulation {
    buffers: PingPong<Boid>,
    params: SimParams,
}

/// Summary of the current "now" buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockStats {
    pub count: usize,
    /// Mean position. Ignores wraparound, so a flock straddling an edge
    /// reports a centroid near the middle.
    pub centroid: Vec2,
    pub mean_speed: f32,
    pub max_speed: f32,
}

impl FlockSimulation {
    /// Start from the given boids with default parameters.
    pub fn new(boids: Vec<Boid>) -> Self {
        Self {
            buffers: PingPong::new(boids),
            params: SimParams::default(),
        }
    }

    /// Validate `config`, spawn its flock and take its parameters.
    pub fn from_config(config: &FlockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let boids = spawn_uniform(config.boid_count, config.seed);
        log::info!(
            "Spawned {} boids with seed {}",
            config.boid_count,
            config.seed
        );
        Ok(Self::new(boids).with_params(config.sim_params(config.dt)))
    }

    pub fn with_params(mut self, params: SimParams) -> Self {
        self.params = params;
        self
    }

    #[inline]
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SimParams) {
        self.params = params;
    }

    /// The boids as of the last completed tick.
    #[inline]
    pub fn boids(&self) -> &[Boid] {
        self.buffers.now()
    }

    /// Number of completed ticks.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.buffers.tick()
    }

    /// Advance one tick with the current parameters.
    pub fn step(&mut self) -> Result<(), DispatchError> {
        let params = self.params;
        self.step_with(&params)
    }

    /// Advance one tick with `dt` overriding the stored time step.
    pub fn step_with_dt(&mut self, dt: f32) -> Result<(), DispatchError> {
        let params = self.params.with_dt(dt);
        self.step_with(&params)
    }

    /// Advance one tick using the scaled step reported by `time`.
    pub fn step_timed(&mut self, time: &mut Time) -> Result<(), DispatchError> {
        let dt = time.tick();
        self.step_with_dt(dt)
    }

    fn step_with(&mut self, params: &SimParams) -> Result<(), DispatchError> {
        let (now, next) = self.buffers.split();
        dispatch(now, next, params)?;
        self.buffers.swap();
        log::debug!("tick {} (dt = {})", self.buffers.tick(), params.dt);
        Ok(())
    }

    pub fn stats(&self) -> FlockStats {
        FlockStats::from_boids(self.boids())
    }
}

impl FlockStats {
    pub fn from_boids(boids: &[Boid]) -> Self {
        let count = boids.len();
        if count == 0 {
            return Self {
                count,
                centroid: Vec2::ZERO,
                mean_speed: 0.0,
                max_speed: 0.0,
            };
        }

        let (position_sum, speed_sum, max_speed) = boids.iter().fold(
            (Vec2::ZERO, 0.0f32, 0.0f32),
            |(p, s, m), boid| {
                let speed = boid.velocity.length();
                (p + boid.position, s + speed, m.max(speed))
            },
        );

        Self {
            count,
            centroid: position_sum / count as f32,
            mean_speed: speed_sum / count as f32,
            max_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flock::{HALF_EXTENT, MAX_SPEED};

    #[test]
    fn test_step_advances_tick_and_swaps() {
        let mut sim = FlockSimulation::new(vec![Boid::new(Vec2::ZERO, Vec2::new(0.05, 0.0))])
            .with_params(SimParams::default().with_dt(1.0));
        sim.step().unwrap();
        assert_eq!(sim.tick(), 1);
        assert!((sim.boids()[0].position.x - 0.05).abs() < 1e-6);
        sim.step().unwrap();
        assert!((sim.boids()[0].position.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_step_with_dt_leaves_params() {
        let mut sim = FlockSimulation::new(vec![Boid::new(Vec2::ZERO, Vec2::new(0.0, 0.05))]);
        sim.step_with_dt(2.0).unwrap();
        assert!((sim.boids()[0].position.y - 0.1).abs() < 1e-6);
        assert_eq!(sim.params().dt, SimParams::default().dt);
    }

    #[test]
    fn test_step_timed_uses_scaled_fixed_step() {
        let mut time = Time::fixed(0.25);
        time.set_time_scale(2.0);
        let mut sim = FlockSimulation::new(vec![Boid::new(Vec2::ZERO, Vec2::new(0.04, 0.0))]);
        sim.step_timed(&mut time).unwrap();
        assert!((sim.boids()[0].position.x - 0.02).abs() < 1e-6);
        assert_eq!(time.ticks(), 1);
    }

    #[test]
    fn test_zero_time_scale_freezes_positions() {
        let mut time = Time::fixed(0.5);
        time.set_time_scale(0.0);
        let start = Vec2::new(0.1, -0.2);
        let mut sim = FlockSimulation::new(vec![Boid::new(start, Vec2::new(0.04, 0.03))]);
        for _ in 0..3 {
            sim.step_timed(&mut time).unwrap();
        }
        assert_eq!(sim.boids()[0].position, start);
        assert_eq!(sim.tick(), 3);
    }

    #[test]
    fn test_many_ticks_stay_in_bounds() {
        let mut sim = FlockSimulation::new(spawn_uniform(200, 3));
        for _ in 0..50 {
            sim.step_with_dt(0.5).unwrap();
        }
        let stats = sim.stats();
        assert_eq!(stats.count, 200);
        assert!(stats.max_speed <= MAX_SPEED + 1e-6);
        for b in sim.boids() {
            assert!(b.position.abs().max_element() <= HALF_EXTENT);
        }
    }

    #[test]
    fn test_stats_of_empty_flock() {
        let sim = FlockSimulation::new(Vec::new());
        let stats = sim.stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.centroid, Vec2::ZERO);
    }
}
