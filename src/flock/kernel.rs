//! The per-boid update kernel.
//!
//! [`update_boid`] is the CPU twin of `main` in the compute shader generated
//! by [`super::shader::compute_shader`]: same accumulation order, same
//! comparisons, same clamp and wrap.

use glam::Vec2;
use rayon::prelude::*;

use super::{Boid, SimParams, HALF_EXTENT, MAX_SPEED, MIN_SPEED};
use crate::error::DispatchError;

/// Compute the next state of boid `index` from the "now" buffer.
///
/// Returns `None` for an out-of-range index, the CPU equivalent of an
/// invocation past the end of the grid returning early.
pub fn update_boid(index: usize, now: &[Boid], params: &SimParams) -> Option<Boid> {
    let me = *now.get(index)?;

    let mut cohesion_sum = Vec2::ZERO;
    let mut cohesion_count = 0u32;
    let mut separation = Vec2::ZERO;
    let mut alignment_sum = Vec2::ZERO;
    let mut alignment_count = 0u32;

    for (j, other) in now.iter().enumerate() {
        if j == index {
            continue;
        }
        let away = me.position - other.position;
        let d2 = away.dot(away);

        if d2 < params.rule1_d2 {
            cohesion_sum += other.position;
            cohesion_count += 1;
        }
        if d2 < params.rule2_d2 {
            separation += away;
        }
        if d2 < params.rule3_d2 {
            alignment_sum += other.velocity;
            alignment_count += 1;
        }
    }

    let mut velocity = me.velocity;
    if cohesion_count > 0 {
        velocity += (cohesion_sum / cohesion_count as f32 - me.position) * params.rule1_w;
    }
    if alignment_count > 0 {
        velocity += (alignment_sum / alignment_count as f32) * params.rule3_w;
    }
    velocity += separation * params.rule2_w;

    let velocity = clamp_speed(velocity, me.velocity);
    let position = integrate_wrapped(me.position, velocity, params.dt);

    Some(Boid { position, velocity })
}

/// Cap speed at [`MAX_SPEED`], keeping direction.
///
/// At or below [`MIN_SPEED`] (or for a non-finite speed) the direction is not
/// trustworthy, so `fallback` is returned unchanged.
#[inline]
pub fn clamp_speed(velocity: Vec2, fallback: Vec2) -> Vec2 {
    let speed = velocity.length();
    if speed > MIN_SPEED {
        (velocity / speed) * speed.min(MAX_SPEED)
    } else {
        fallback
    }
}

/// Advance `position` by `velocity * dt` and wrap each axis into the square.
///
/// Leaving one edge re-enters from the opposite edge with the overshoot
/// preserved. Only a single crossing is corrected, so `|velocity| * dt` must
/// not exceed the side of the square; `FlockConfig::validate` enforces this
/// for configured flocks.
#[inline]
pub fn integrate_wrapped(position: Vec2, velocity: Vec2, dt: f32) -> Vec2 {
    let p = position + velocity * dt;
    Vec2::new(wrap_axis(p.x), wrap_axis(p.y))
}

#[inline]
fn wrap_axis(x: f32) -> f32 {
    if x < -HALF_EXTENT {
        x + 2.0 * HALF_EXTENT
    } else if x > HALF_EXTENT {
        x - 2.0 * HALF_EXTENT
    } else {
        x
    }
}

/// Run one tick: every slot of `next` gets the update of the same index.
///
/// Invocations run as an unordered parallel map. Each one reads only `now`
/// and writes only its own slot of `next`.
pub fn dispatch(now: &[Boid], next: &mut [Boid], params: &SimParams) -> Result<(), DispatchError> {
    check_lengths(now, next)?;
    next.par_iter_mut().enumerate().for_each(|(i, slot)| {
        if let Some(boid) = update_boid(i, now, params) {
            *slot = boid;
        }
    });
    Ok(())
}

/// Single-threaded [`dispatch`], kept as the reference ordering.
pub fn dispatch_sequential(
    now: &[Boid],
    next: &mut [Boid],
    params: &SimParams,
) -> Result<(), DispatchError> {
    check_lengths(now, next)?;
    for (i, slot) in next.iter_mut().enumerate() {
        if let Some(boid) = update_boid(i, now, params) {
            *slot = boid;
        }
    }
    Ok(())
}

fn check_lengths(now: &[Boid], next: &[Boid]) -> Result<(), DispatchError> {
    if now.len() != next.len() {
        return Err(DispatchError::LengthMismatch {
            now: now.len(),
            next: next.len(),
        });
    }
    Ok(())
}
