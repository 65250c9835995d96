//! Integration tests for the `GpuLayout` derive.
//!
//! These tests verify that `#[derive(GpuLayout)]` produces mirrors whose
//! byte layout matches WGSL's alignment rules by actually using the derived
//! implementations.

use boidlight::GpuLayout;
use glam::{Vec2, Vec3, Vec4};

// ============================================================================
// Packed scalars
// ============================================================================

#[derive(GpuLayout, Clone, Copy, Debug, PartialEq)]
struct Scalars {
    a: f32,
    b: u32,
    c: i32,
}

#[test]
fn test_scalars_pack_without_padding() {
    assert_eq!(Scalars::SIZE, 12);
    assert_eq!(std::mem::size_of::<ScalarsGpu>(), 12);
    assert_eq!(Scalars::FIELD_OFFSETS, &[("a", 0), ("b", 4), ("c", 8)]);
}

#[test]
fn test_scalars_round_trip_through_bytes() {
    let value = Scalars { a: 1.5, b: 7, c: -3 };
    let gpu = value.to_gpu();
    let bytes = bytemuck::bytes_of(&gpu);
    assert_eq!(&bytes[0..4], &1.5f32.to_le_bytes());
    assert_eq!(&bytes[4..8], &7u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &(-3i32).to_le_bytes());
    assert_eq!(Scalars::from_gpu(&gpu), value);
}

// ============================================================================
// Vector alignment
// ============================================================================

#[derive(GpuLayout, Clone, Copy, Debug, PartialEq)]
struct Vec3ThenScalar {
    direction: Vec3,
    length: f32,
}

#[test]
fn test_scalar_fills_vec3_tail() {
    assert_eq!(Vec3ThenScalar::SIZE, 16);
    assert_eq!(Vec3ThenScalar::field_offset("length"), Some(12));
    assert_eq!(std::mem::size_of::<Vec3ThenScalarGpu>(), 16);
}

#[derive(GpuLayout, Clone, Copy, Debug, PartialEq)]
struct Vec2ThenVec3 {
    uv: Vec2,
    normal: Vec3,
}

#[test]
fn test_vec3_aligns_to_16() {
    assert_eq!(Vec2ThenVec3::field_offset("uv"), Some(0));
    assert_eq!(Vec2ThenVec3::field_offset("normal"), Some(16));
    // 28 bytes of data rounded up to the 16-byte struct alignment
    assert_eq!(Vec2ThenVec3::SIZE, 32);
    assert_eq!(std::mem::size_of::<Vec2ThenVec3Gpu>(), 32);
}

#[test]
fn test_padding_is_zeroed() {
    let value = Vec2ThenVec3 {
        uv: Vec2::new(1.0, 2.0),
        normal: Vec3::new(3.0, 4.0, 5.0),
    };
    let gpu = value.to_gpu();
    let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&gpu));
    assert_eq!(floats, &[1.0, 2.0, 0.0, 0.0, 3.0, 4.0, 5.0, 0.0]);
    assert_eq!(Vec2ThenVec3::from_gpu(&gpu), value);
}

#[derive(GpuLayout, Clone, Copy, Debug, PartialEq)]
struct ScalarThenVec2 {
    weight: f32,
    offset: Vec2,
}

#[test]
fn test_vec2_aligns_to_8() {
    assert_eq!(ScalarThenVec2::field_offset("offset"), Some(8));
    assert_eq!(ScalarThenVec2::SIZE, 16);
}

// ============================================================================
// WGSL declarations
// ============================================================================

#[test]
fn test_wgsl_struct_lists_real_fields_only() {
    let wgsl = Vec2ThenVec3::WGSL_STRUCT;
    assert_eq!(wgsl, "struct Vec2ThenVec3 {\n    uv: vec2<f32>,\n    normal: vec3<f32>,\n}");
    assert!(!wgsl.contains("_pad"));
    assert_eq!(Vec2ThenVec3::WGSL_NAME, "Vec2ThenVec3");
}

#[test]
fn test_wgsl_types() {
    assert!(Scalars::WGSL_STRUCT.contains("a: f32,"));
    assert!(Scalars::WGSL_STRUCT.contains("b: u32,"));
    assert!(Scalars::WGSL_STRUCT.contains("c: i32,"));
}

// ============================================================================
// Crate types
// ============================================================================

#[test]
fn test_camera_layout_is_64_bytes() {
    use boidlight::shadow::{Camera, CameraGpu};

    assert_eq!(Camera::SIZE, 64);
    assert_eq!(Camera::field_offset("near_z"), Some(48));
    assert_eq!(std::mem::size_of::<CameraGpu>(), 64);

    let camera = Camera {
        view_0: Vec4::new(1.0, 2.0, 3.0, 4.0),
        view_1: Vec4::new(5.0, 6.0, 7.0, 8.0),
        view_2: Vec4::new(9.0, 10.0, 11.0, 12.0),
        near_z: 0.5,
    };
    let gpu = camera.to_gpu();
    let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&gpu));
    assert_eq!(floats[12], 0.5);
    assert_eq!(&floats[13..], &[0.0, 0.0, 0.0]);
}

#[test]
fn test_boid_layout() {
    use boidlight::flock::{Boid, BoidGpu};

    assert_eq!(Boid::SIZE, 16);
    assert_eq!(Boid::field_offset("velocity"), Some(8));
    assert_eq!(std::mem::size_of::<BoidGpu>(), 16);

    let boid = Boid::new(Vec2::new(0.1, -0.2), Vec2::new(0.03, 0.04));
    let gpu = boid.to_gpu();
    assert_eq!(gpu.position, [0.1, -0.2]);
    assert_eq!(gpu.velocity, [0.03, 0.04]);
}

#[test]
fn test_slice_helpers() {
    use boidlight::flock::Boid;
    use boidlight::layout::{from_gpu_slice, to_gpu_vec};

    let boids = vec![
        Boid::new(Vec2::new(0.0, 0.1), Vec2::X),
        Boid::new(Vec2::new(0.2, 0.3), Vec2::Y),
    ];
    let gpu = to_gpu_vec(&boids);
    let bytes: &[u8] = bytemuck::cast_slice(&gpu);
    assert_eq!(bytes.len(), 32);
    assert_eq!(from_gpu_slice::<Boid>(&gpu), boids);
}
