//! CPU twin of the sprite vertex and fragment stages.

use glam::{Vec2, Vec4};

use super::Boid;
use crate::GpuLayout;

/// Base triangle in boid-local space, nose along `+X`.
pub const SPRITE_TRIANGLE: [Vec2; 3] = [
    Vec2::new(0.02, 0.0),
    Vec2::new(-0.01, -0.01),
    Vec2::new(-0.01, 0.01),
];

/// Uniform consumed by the sprite vertex stage.
#[derive(GpuLayout, Clone, Copy, Debug, PartialEq)]
pub struct SpriteCamera {
    /// Viewport width divided by height.
    pub aspect_ratio: f32,
}

impl SpriteCamera {
    /// Camera for a `width` x `height` viewport. A zero height is treated as 1.
    pub fn from_viewport(width: u32, height: u32) -> Self {
        Self {
            aspect_ratio: width as f32 / height.max(1) as f32,
        }
    }
}

impl Default for SpriteCamera {
    fn default() -> Self {
        Self { aspect_ratio: 1.0 }
    }
}

/// Output of the sprite vertex stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteVertex {
    pub clip_position: Vec4,
    pub color: Vec4,
}

/// Unit heading of a boid; `+X` when it is not moving.
#[inline]
pub fn orientation(velocity: Vec2) -> Vec2 {
    velocity.try_normalize().unwrap_or(Vec2::X)
}

pub fn sprite_vertex(local: Vec2, boid: &Boid, camera: &SpriteCamera) -> SpriteVertex {
    let heading = orientation(boid.velocity);
    let (c, s) = (heading.x, heading.y);
    let rotated = Vec2::new(local.x * c - local.y * s, local.x * s + local.y * c);
    let world = rotated + boid.position;

    SpriteVertex {
        clip_position: Vec4::new(world.x, -world.y * camera.aspect_ratio, 0.0, 1.0),
        color: Vec4::new(0.5 + 0.5 * c, 0.5 + 0.5 * s, 1.0, 1.0),
    }
}

/// Opaque pass-through of the interpolated colour.
#[inline]
pub fn sprite_fragment(vertex: &SpriteVertex) -> Vec4 {
    vertex.color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_velocity_faces_x() {
        assert_eq!(orientation(Vec2::ZERO), Vec2::X);
        let boid = Boid::new(Vec2::ZERO, Vec2::ZERO);
        let v = sprite_vertex(SPRITE_TRIANGLE[0], &boid, &SpriteCamera::default());
        assert_eq!(v.clip_position, Vec4::new(0.02, 0.0, 0.0, 1.0));
        assert_eq!(v.color, Vec4::new(1.0, 0.5, 1.0, 1.0));
    }

    #[test]
    fn test_nose_follows_velocity() {
        let boid = Boid::new(Vec2::new(0.1, 0.2), Vec2::new(0.0, 0.05));
        let camera = SpriteCamera { aspect_ratio: 2.0 };
        let v = sprite_vertex(SPRITE_TRIANGLE[0], &boid, &camera);
        // Nose rotated onto +Y: (0.1, 0.22), then y flipped and scaled
        assert!((v.clip_position - Vec4::new(0.1, -0.44, 0.0, 1.0)).length() < 1e-6);
        assert!((v.color - Vec4::new(0.5, 1.0, 1.0, 1.0)).length() < 1e-6);
        assert_eq!(sprite_fragment(&v), v.color);
    }

    #[test]
    fn test_viewport_aspect() {
        assert_eq!(SpriteCamera::from_viewport(1600, 800).aspect_ratio, 2.0);
        assert_eq!(SpriteCamera::from_viewport(10, 0).aspect_ratio, 10.0);
    }
}
