//! Derive macros for boidlight.
//!
//! This crate provides one derive macro:
//!
//! - [`GpuLayout`] - Generates a `#[repr(C)]` GPU mirror struct and the
//!   matching WGSL struct declaration
//!
//! # Usage
//!
//! The macro is re-exported from the main `boidlight` crate. You don't need
//! to add this crate directly:
//!
//! ```ignore
//! use boidlight::prelude::*;
//!
//! #[derive(GpuLayout, Clone, Copy, Debug)]
//! struct Boid {
//!     position: Vec2,
//!     velocity: Vec2,
//! }
//! ```
//!
//! # GPU Memory Layout
//!
//! WGSL lays out structs with its own alignment rules, which differ from
//! Rust's for `vec3` and for struct tails:
//!
//! - `Vec3` and `Vec4` require 16-byte alignment
//! - `Vec2` requires 8-byte alignment
//! - The struct size rounds up to the largest member alignment
//!
//! The Rust mirror gets explicit `_padN` fields so its byte layout is exactly
//! what the shader reads. The WGSL declaration lists only the real fields;
//! WGSL inserts the same padding implicitly, and leaving it out keeps the
//! struct usable from the `uniform` address space.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, Type};

/// Derive macro for structs shared between Rust and WGSL.
///
/// # Generated Items
///
/// For a struct `Camera`:
///
/// - `CameraGpu`: `#[repr(C)]`, `Pod`, `Zeroable`, with padding fields
/// - `impl GpuLayout for Camera` with `WGSL_NAME`, `WGSL_STRUCT`,
///   `FIELD_OFFSETS`, `to_gpu()` and `from_gpu()`
///
/// # Supported Types
///
/// | Rust Type | WGSL Type | Size | Alignment |
/// |-----------|-----------|------|-----------|
/// | `Vec2` | `vec2<f32>` | 8 bytes | 8 bytes |
/// | `Vec3` | `vec3<f32>` | 12 bytes | 16 bytes |
/// | `Vec4` | `vec4<f32>` | 16 bytes | 16 bytes |
/// | `f32` | `f32` | 4 bytes | 4 bytes |
/// | `u32` | `u32` | 4 bytes | 4 bytes |
/// | `i32` | `i32` | 4 bytes | 4 bytes |
///
/// # Example
///
/// ```ignore
/// #[derive(GpuLayout, Clone, Copy, Debug)]
/// struct Camera {
///     view_0: Vec4,
///     view_1: Vec4,
///     view_2: Vec4,
///     near_z: f32,
/// }
///
/// // Generated:
/// // #[repr(C)]
/// // pub struct CameraGpu {
/// //     pub view_0: [f32; 4],
/// //     pub view_1: [f32; 4],
/// //     pub view_2: [f32; 4],
/// //     pub near_z: f32,
/// //     pub _pad0: [f32; 3],
/// // }
/// ```
///
/// # Panics
///
/// The macro panics at compile time if:
/// - Applied to an enum or union instead of a struct
/// - Struct uses tuple fields instead of named fields
/// - Any field has an unsupported type
#[proc_macro_derive(GpuLayout)]
pub fn derive_gpu_layout(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let name_str = name.to_string();
    let gpu_name = Ident::new(&format!("{}Gpu", name), Span::call_site());

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("GpuLayout derive only supports structs with named fields"),
        },
        _ => panic!("GpuLayout derive only supports structs"),
    };

    let mut wgsl_fields = Vec::new();
    let mut gpu_struct_fields = Vec::new();
    let mut to_gpu_conversions = Vec::new();
    let mut from_gpu_conversions = Vec::new();
    let mut offset_entries = Vec::new();
    let mut field_offset = 0u32;
    let mut struct_align = 4u32;
    let mut padding_count = 0u32;

    for field in fields.iter() {
        let field_name = field.ident.as_ref().expect("named field");
        let field_name_str = field_name.to_string();
        let field_type = &field.ty;
        let type_info = rust_type_info(field_type);
        struct_align = struct_align.max(type_info.align);

        let padding_needed = (type_info.align - (field_offset % type_info.align)) % type_info.align;
        if padding_needed > 0 {
            let (pad_field, pad_value) = padding_field(padding_count, padding_needed);
            gpu_struct_fields.push(pad_field);
            to_gpu_conversions.push(pad_value);
            padding_count += 1;
            field_offset += padding_needed;
        }

        offset_entries.push(quote! { (#field_name_str, #field_offset) });
        wgsl_fields.push(format!("    {}: {},", field_name_str, type_info.wgsl_type));

        let gpu_field_type = type_info.gpu_type;
        gpu_struct_fields.push(quote! { #field_name: #gpu_field_type });

        let conversion = generate_conversion(field_name, field_type);
        to_gpu_conversions.push(quote! { #field_name: #conversion });

        let reverse_conversion = generate_reverse_conversion(field_name, field_type);
        from_gpu_conversions.push(quote! { #field_name: #reverse_conversion });

        field_offset += type_info.size;
    }

    // Struct size rounds up to the largest member alignment (WGSL SizeOf rule)
    let tail_padding = (struct_align - (field_offset % struct_align)) % struct_align;
    if tail_padding > 0 {
        let (pad_field, pad_value) = padding_field(padding_count, tail_padding);
        gpu_struct_fields.push(pad_field);
        to_gpu_conversions.push(pad_value);
    }
    let size = field_offset + tail_padding;

    let wgsl_struct = format!("struct {} {{\n{}\n}}", name_str, wgsl_fields.join("\n"));

    let expanded = quote! {
        #[repr(C)]
        #[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
        pub struct #gpu_name {
            #(pub #gpu_struct_fields),*
        }

        impl boidlight::GpuLayout for #name {
            type Gpu = #gpu_name;

            const WGSL_NAME: &'static str = #name_str;
            const WGSL_STRUCT: &'static str = #wgsl_struct;
            const FIELD_OFFSETS: &'static [(&'static str, u32)] = &[#(#offset_entries),*];
            const SIZE: u32 = #size;

            fn to_gpu(&self) -> Self::Gpu {
                #gpu_name {
                    #(#to_gpu_conversions),*
                }
            }

            fn from_gpu(gpu: &Self::Gpu) -> Self {
                Self {
                    #(#from_gpu_conversions),*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Build a `_padN` field and its zero initializer covering `bytes` bytes.
fn padding_field(index: u32, bytes: u32) -> (proc_macro2::TokenStream, proc_macro2::TokenStream) {
    let pad_name = Ident::new(&format!("_pad{}", index), Span::call_site());
    let count = (bytes / 4) as usize;
    (
        quote! { #pad_name: [f32; #count] },
        quote! { #pad_name: [0.0; #count] },
    )
}

/// Type metadata for GPU memory layout calculations.
struct TypeInfo {
    /// WGSL type name (e.g., "vec2<f32>")
    wgsl_type: &'static str,
    /// Rust type for the GPU struct (e.g., `[f32; 2]`)
    gpu_type: proc_macro2::TokenStream,
    /// Size in bytes
    size: u32,
    /// Required alignment in bytes
    align: u32,
}

/// Get type information for a Rust type.
///
/// Maps Rust types to their WGSL equivalents and alignment requirements.
fn rust_type_info(ty: &Type) -> TypeInfo {
    let type_str = quote!(#ty).to_string().replace(' ', "");

    match type_str.as_str() {
        "Vec2" | "glam::Vec2" => TypeInfo {
            wgsl_type: "vec2<f32>",
            gpu_type: quote! { [f32; 2] },
            size: 8,
            align: 8,
        },
        "Vec3" | "glam::Vec3" => TypeInfo {
            wgsl_type: "vec3<f32>",
            gpu_type: quote! { [f32; 3] },
            size: 12,
            align: 16,
        },
        "Vec4" | "glam::Vec4" => TypeInfo {
            wgsl_type: "vec4<f32>",
            gpu_type: quote! { [f32; 4] },
            size: 16,
            align: 16,
        },
        "f32" => TypeInfo {
            wgsl_type: "f32",
            gpu_type: quote! { f32 },
            size: 4,
            align: 4,
        },
        "u32" => TypeInfo {
            wgsl_type: "u32",
            gpu_type: quote! { u32 },
            size: 4,
            align: 4,
        },
        "i32" => TypeInfo {
            wgsl_type: "i32",
            gpu_type: quote! { i32 },
            size: 4,
            align: 4,
        },
        _ => panic!("Unsupported type in GpuLayout struct: {}", type_str),
    }
}

/// Generate code to convert a field from Rust to GPU format.
///
/// Vector types need `.to_array()`, scalars are passed through.
fn generate_conversion(field_name: &Ident, ty: &Type) -> proc_macro2::TokenStream {
    let type_str = quote!(#ty).to_string().replace(' ', "");

    match type_str.as_str() {
        "Vec2" | "glam::Vec2" | "Vec3" | "glam::Vec3" | "Vec4" | "glam::Vec4" => {
            quote! { self.#field_name.to_array() }
        }
        _ => {
            quote! { self.#field_name }
        }
    }
}

/// Generate code to convert a field from GPU format back to Rust.
fn generate_reverse_conversion(field_name: &Ident, ty: &Type) -> proc_macro2::TokenStream {
    let type_str = quote!(#ty).to_string().replace(' ', "");

    match type_str.as_str() {
        "Vec2" | "glam::Vec2" => {
            quote! { glam::Vec2::from_array(gpu.#field_name) }
        }
        "Vec3" | "glam::Vec3" => {
            quote! { glam::Vec3::from_array(gpu.#field_name) }
        }
        "Vec4" | "glam::Vec4" => {
            quote! { glam::Vec4::from_array(gpu.#field_name) }
        }
        _ => {
            quote! { gpu.#field_name }
        }
    }
}
