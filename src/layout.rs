//! Shared Rust/WGSL data layout.
//!
//! Every struct that crosses the CPU/GPU boundary (boids, simulation
//! parameters, cameras, instance transforms) derives [`GpuLayout`]. The
//! derive produces the `#[repr(C)]` mirror that gets uploaded with
//! `bytemuck` and the WGSL declaration that shader generators splice in, so
//! both sides are generated from the same field list.

/// Trait automatically implemented by `#[derive(GpuLayout)]`.
///
/// # Do Not Implement Manually
///
/// The derive macro computes padding and offsets. A hand-written impl can
/// silently disagree with the shader.
pub trait GpuLayout: Copy + Send + Sync {
    /// GPU-compatible representation with explicit padding fields.
    type Gpu: Copy + bytemuck::Pod + bytemuck::Zeroable + Send + Sync;

    /// Struct name used in WGSL, identical to the Rust type name.
    const WGSL_NAME: &'static str;

    /// WGSL struct definition matching [`Self::Gpu`] byte for byte.
    const WGSL_STRUCT: &'static str;

    /// `(field_name, byte_offset)` for every declared field, in order.
    const FIELD_OFFSETS: &'static [(&'static str, u32)];

    /// Size in bytes of one element, including tail padding.
    const SIZE: u32;

    /// Convert to the GPU representation.
    fn to_gpu(&self) -> Self::Gpu;

    /// Convert back from the GPU representation (used for readback).
    fn from_gpu(gpu: &Self::Gpu) -> Self;

    /// Byte offset of a named field, if the struct declares it.
    fn field_offset(name: &str) -> Option<u32> {
        Self::FIELD_OFFSETS
            .iter()
            .find(|(field, _)| *field == name)
            .map(|&(_, offset)| offset)
    }
}

/// Convert a slice of values to their GPU mirrors.
pub fn to_gpu_vec<T: GpuLayout>(values: &[T]) -> Vec<T::Gpu> {
    values.iter().map(GpuLayout::to_gpu).collect()
}

/// Convert a slice of GPU mirrors back to values.
pub fn from_gpu_slice<T: GpuLayout>(gpu: &[T::Gpu]) -> Vec<T> {
    gpu.iter().map(T::from_gpu).collect()
}

/// Join the WGSL declarations of several layouts, one blank line apart.
pub fn wgsl_structs(declarations: &[&str]) -> String {
    declarations.join("\n\n")
}

/// Format an `f32` as a WGSL float literal (always with a decimal point).
pub fn wgsl_float(value: f32) -> String {
    format!("{:?}", value)
}
