//! Tick clock that hands the simulation hosts their `dt`.
//!
//! A clock either replays a fixed step, which makes runs reproducible, or
//! measures the wall time since the previous tick. Either way the step is
//! multiplied by the time scale, so a flock can run faster, slower or not at
//! all without touching its [`SimParams`](crate::flock::SimParams).
//!
//! ```ignore
//! let mut time = Time::fixed(0.01);
//! time.set_time_scale(2.0);
//! for _ in 0..100 {
//!     sim.step_timed(&mut time)?;
//! }
//! ```

use std::time::Instant;

/// Where the unscaled step comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickSource {
    Fixed(f32),
    /// Wall time since the previous tick (or since the clock was created).
    Measured { last: Instant },
}

#[derive(Debug, Clone)]
pub struct Time {
    source: TickSource,
    time_scale: f32,
    ticks: u64,
    started: Instant,
}

impl Time {
    /// A clock that reports `delta` every tick, before scaling.
    pub fn fixed(delta: f32) -> Self {
        Self::with_source(TickSource::Fixed(delta))
    }

    /// A clock that reports the wall time between ticks.
    pub fn measured() -> Self {
        Self::with_source(TickSource::Measured {
            last: Instant::now(),
        })
    }

    fn with_source(source: TickSource) -> Self {
        Self {
            source,
            time_scale: 1.0,
            ticks: 0,
            started: Instant::now(),
        }
    }

    /// Advance one tick and return its scaled step.
    pub fn tick(&mut self) -> f32 {
        let raw = match &mut self.source {
            TickSource::Fixed(delta) => *delta,
            TickSource::Measured { last } => {
                let now = Instant::now();
                let delta = now.duration_since(*last).as_secs_f32();
                *last = now;
                delta
            }
        };
        self.ticks += 1;
        raw * self.time_scale
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn source(&self) -> TickSource {
        self.source
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Negative and NaN scales clamp to 0, which freezes the flock.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale > 0.0 { scale } else { 0.0 };
    }

    /// Average tick throughput since the clock was created.
    pub fn ticks_per_second(&self) -> f32 {
        let secs = self.started.elapsed().as_secs_f32();
        if secs > 0.0 {
            self.ticks as f32 / secs
        } else {
            0.0
        }
    }
}
