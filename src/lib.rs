//! # boidlight
//!
//! Two families of GPU kernels, each shipped as generated WGSL plus a CPU
//! twin that computes the same thing:
//!
//! - [`flock`]: a 2-D boids simulation (cohesion, separation, alignment) with
//!   ping-pong buffers and an oriented-triangle sprite shader.
//! - [`shadow`]: a shadow-mapped renderer with a light-space depth pass and a
//!   camera-space shading pass, using reversed-infinite-Z projection.
//!
//! ## Quick Start
//!
//! ```ignore
//! use boidlight::prelude::*;
//!
//! let mut sim = FlockSimulation::new(spawn_uniform(1000, 0))
//!     .with_params(SimParams::default());
//! for _ in 0..100 {
//!     sim.step()?;
//! }
//! println!("{:?}", sim.stats());
//! ```
//!
//! ## Shared layouts
//!
//! Structs crossing the CPU/GPU boundary derive [`GpuLayout`]. The derive
//! emits a `#[repr(C)]` mirror (`BoidGpu`, `CameraGpu`, ...) for upload and
//! the matching WGSL declaration that the shader generators splice in.
//!
//! ```ignore
//! #[derive(GpuLayout, Clone, Copy, Debug)]
//! struct Camera {
//!     view_0: Vec4,
//!     view_1: Vec4,
//!     view_2: Vec4,
//!     near_z: f32,
//! }
//!
//! assert_eq!(Camera::SIZE, 64);
//! ```
//!
//! ## GPU host
//!
//! [`gpu::GpuFlock`] runs the flocking kernel headless on any wgpu adapter.
//! The shadow passes are provided as WGSL for a host renderer to bind; the
//! CPU reference in [`shadow::raster`] runs them end to end.

extern crate self as boidlight;

pub mod config;
pub mod error;
pub mod flock;
pub mod gpu;
pub mod layout;
pub mod math;
pub mod shadow;
pub mod time;

pub use boidlight_derive::GpuLayout;
pub use bytemuck;
pub use glam::{Vec2, Vec3, Vec4};
pub use layout::GpuLayout;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use boidlight::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::FlockConfig;
    pub use crate::error::{ConfigError, DispatchError, GpuError};
    pub use crate::flock::{
        spawn_uniform, Boid, FlockSimulation, FlockStats, SimParams, SpriteCamera,
    };
    pub use crate::math::Affine3x4;
    pub use crate::shadow::{Camera, DepthImage, Instance, Mesh, ShadowMap};
    pub use crate::time::{TickSource, Time};
    pub use crate::GpuLayout;
    pub use crate::{Vec2, Vec3, Vec4};
}
