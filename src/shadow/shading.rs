//! Camera-space shading pass with a manual shadow-map lookup.

use glam::{Vec2, Vec3, Vec4};

use super::{encode_reversed_z, Camera, Instance, ShadowMap, SHADOW_BIAS};

/// Vertex-stage output of the shading pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadingVarying {
    /// Reversed-Z clip position through the scene camera.
    pub clip_position: Vec4,
    /// Homogeneous shadow-map coordinate: `xy / z` is the texture uv and `z`
    /// is the light-space depth.
    pub from_light: Vec3,
}

pub fn shading_vertex(
    local: Vec3,
    instance: &Instance,
    camera: &Camera,
    light: &Camera,
) -> ShadingVarying {
    let world = instance.to_world(local);
    let c = camera.project(world);
    let l = light.project(world);
    ShadingVarying {
        clip_position: encode_reversed_z(c, camera.near_z),
        from_light: Vec3::new(0.5 * (l.x + l.z), 0.5 * (l.z - l.y), l.z),
    }
}

/// Whether the shadow-map coordinate lies strictly inside the light frustum:
/// in front of the near plane and with `xy / z` strictly inside `(0, 1)`.
///
/// `0 < x < z` already implies `z > 0`, so points behind the light fail the
/// test even when `light_near_z` is negative.
#[inline]
pub fn in_light_frustum(from_light: Vec3, light_near_z: f32) -> bool {
    let Vec3 { x, y, z } = from_light;
    z > light_near_z && x > 0.0 && x < z && y > 0.0 && y < z
}

#[inline]
pub fn light_uv(from_light: Vec3) -> Vec2 {
    Vec2::new(from_light.x, from_light.y) / from_light.z
}

/// Shadow determination for one fragment.
///
/// Outside the light frustum is shadowed. Inside, the fragment is lit when
/// `light.near_z + SHADOW_BIAS > sampled * from_light.z`, i.e. nothing in
/// the shadow map is meaningfully closer to the light.
pub fn is_lit<M: ShadowMap + ?Sized>(from_light: Vec3, light: &Camera, shadow_map: &M) -> bool {
    if !in_light_frustum(from_light, light.near_z) {
        return false;
    }
    let sampled = shadow_map.sample_nearest(light_uv(from_light));
    light.near_z + SHADOW_BIAS > sampled * from_light.z
}

/// Fragment colour: white when lit, black when shadowed, opaque.
pub fn shading_fragment<M: ShadowMap + ?Sized>(
    varying: &ShadingVarying,
    light: &Camera,
    shadow_map: &M,
) -> Vec4 {
    let lit = if is_lit(varying.from_light, light, shadow_map) { 1.0 } else { 0.0 };
    Vec4::new(lit, lit, lit, 1.0)
}
