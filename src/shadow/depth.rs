//! Light-space depth pass, vertex stage.

use glam::{Vec3, Vec4};

use super::{encode_reversed_z, Camera, Instance};

/// Clip position of a local-space vertex as seen from the light.
#[inline]
pub fn depth_vertex(local: Vec3, instance: &Instance, light: &Camera) -> Vec4 {
    let world = instance.to_world(local);
    encode_reversed_z(light.project(world), light.near_z)
}
