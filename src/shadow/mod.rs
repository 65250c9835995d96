//! Shadow-mapped scene rendering with reversed-infinite-Z.
//!
//! Two passes over the same instanced geometry:
//!
//! 1. **Depth pass**: vertices are projected through the light and written to
//!    a depth target. No colour output.
//! 2. **Shading pass**: vertices are projected through the scene camera for
//!    rasterization and through the light for a shadow lookup. Each fragment
//!    is either fully lit or fully shadowed.
//!
//! # Reversed-infinite-Z
//!
//! A projector's view transform leaves the view-space depth in `z`. The clip
//! position is `(x, y, near_z, z)`, so after the divide the depth is
//! `near_z / z`: 1 on the near plane, falling toward 0 at infinity. Depth
//! targets clear to 0 and keep the greater value.
//!
//! Both passes run on the GPU through [`shader`] and on the CPU through the
//! twins in [`depth`], [`shading`] and [`raster`].

pub mod depth;
pub mod raster;
mod sampling;
pub mod shader;
pub mod shading;

use glam::{Vec3, Vec4};

use crate::math::Affine3x4;
use crate::GpuLayout;

pub use depth::depth_vertex;
pub use raster::{rasterize_depth, shade_samples, Mesh};
pub use sampling::{ConstantDepth, DepthImage, ShadowMap};
pub use shading::{
    in_light_frustum, is_lit, light_uv, shading_fragment, shading_vertex, ShadingVarying,
};

/// Added to the light's near depth before comparing against the shadow map.
pub const SHADOW_BIAS: f32 = 0.001;

/// A projector: the scene camera or the light.
///
/// `view_*` are the rows of its 3x4 view transform (focal scale included).
/// The WGSL struct is 64 bytes: 13 floats plus tail padding.
#[derive(GpuLayout, Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub view_0: Vec4,
    pub view_1: Vec4,
    pub view_2: Vec4,
    pub near_z: f32,
}

impl Camera {
    pub fn new(view: &Affine3x4, near_z: f32) -> Self {
        let [view_0, view_1, view_2] = view.rows;
        Self {
            view_0,
            view_1,
            view_2,
            near_z,
        }
    }

    #[inline]
    pub fn view(&self) -> Affine3x4 {
        Affine3x4::from_rows(self.view_0, self.view_1, self.view_2)
    }

    /// World position to view space (`z` is distance along the view axis).
    #[inline]
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view().transform_point(world)
    }
}

/// Model transform of one drawn object.
#[derive(GpuLayout, Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub model_0: Vec4,
    pub model_1: Vec4,
    pub model_2: Vec4,
}

impl Instance {
    pub fn new(model: &Affine3x4) -> Self {
        let [model_0, model_1, model_2] = model.rows;
        Self {
            model_0,
            model_1,
            model_2,
        }
    }

    #[inline]
    pub fn model(&self) -> Affine3x4 {
        Affine3x4::from_rows(self.model_0, self.model_1, self.model_2)
    }

    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.model().transform_point(local)
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new(&Affine3x4::IDENTITY)
    }
}

/// Reversed-infinite-Z clip position of a view-space point.
#[inline]
pub fn encode_reversed_z(view: Vec3, near_z: f32) -> Vec4 {
    Vec4::new(view.x, view.y, near_z, view.z)
}
