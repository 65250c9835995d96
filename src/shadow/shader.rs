//! WGSL generation for the depth and shading passes.

use super::{Camera, Instance, SHADOW_BIAS};
use crate::layout::{wgsl_float, wgsl_structs};
use crate::GpuLayout;

/// Row-encoded affine point transform, shared by both passes.
const TRANSFORM_FN: &str = r#"fn transform_point(row_0: vec4<f32>, row_1: vec4<f32>, row_2: vec4<f32>, p: vec3<f32>) -> vec3<f32> {
    let h = vec4<f32>(p, 1.0);
    return vec3<f32>(dot(row_0, h), dot(row_1, h), dot(row_2, h));
}"#;

/// Depth pass: vertex entry point `vs_main`, no fragment stage.
///
/// Bindings (group 0): `light` uniform at 0, `instances` storage at 1.
/// Vertex location 0 is the local position; the instance index selects the
/// model transform.
pub fn depth_shader() -> String {
    format!(
        r#"{structs}

@group(0) @binding(0) var<uniform> light: {camera};
@group(0) @binding(1) var<storage, read> instances: array<{instance}>;

{transform_fn}

@vertex
fn vs_main(
    @builtin(instance_index) instance_index: u32,
    @location(0) position: vec3<f32>,
) -> @builtin(position) vec4<f32> {{
    let model = instances[instance_index];
    let world = transform_point(model.model_0, model.model_1, model.model_2, position);
    let p = transform_point(light.view_0, light.view_1, light.view_2, world);
    return vec4<f32>(p.x, p.y, light.near_z, p.z);
}}
"#,
        structs = wgsl_structs(&[Camera::WGSL_STRUCT, Instance::WGSL_STRUCT]),
        camera = Camera::WGSL_NAME,
        instance = Instance::WGSL_NAME,
        transform_fn = TRANSFORM_FN,
    )
}

/// Shading pass: entry points `vs_main` and `fs_main`.
///
/// Bindings (group 0): `camera` uniform at 0, `light` uniform at 1,
/// `instances` storage at 2, `shadow_map` depth texture at 3 and a
/// non-filtering `shadow_sampler` at 4.
pub fn shading_shader() -> String {
    format!(
        r#"{structs}

@group(0) @binding(0) var<uniform> camera: {camera};
@group(0) @binding(1) var<uniform> light: {camera};
@group(0) @binding(2) var<storage, read> instances: array<{instance}>;
@group(0) @binding(3) var shadow_map: texture_depth_2d;
@group(0) @binding(4) var shadow_sampler: sampler;

{transform_fn}

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) from_light: vec3<f32>,
}}

@vertex
fn vs_main(
    @builtin(instance_index) instance_index: u32,
    @location(0) position: vec3<f32>,
) -> VertexOutput {{
    let model = instances[instance_index];
    let world = transform_point(model.model_0, model.model_1, model.model_2, position);
    let c = transform_point(camera.view_0, camera.view_1, camera.view_2, world);
    let l = transform_point(light.view_0, light.view_1, light.view_2, world);

    var out: VertexOutput;
    out.clip_position = vec4<f32>(c.x, c.y, camera.near_z, c.z);
    out.from_light = vec3<f32>(0.5 * (l.x + l.z), 0.5 * (l.z - l.y), l.z);
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    let l = in.from_light;
    var lit = 0.0;
    if (l.z > light.near_z && l.x > 0.0 && l.x < l.z && l.y > 0.0 && l.y < l.z) {{
        let sampled = textureSampleLevel(shadow_map, shadow_sampler, l.xy / l.z, 0i);
        if (light.near_z + {bias} > sampled * l.z) {{
            lit = 1.0;
        }}
    }}
    return vec4<f32>(lit, lit, lit, 1.0);
}}
"#,
        structs = wgsl_structs(&[Camera::WGSL_STRUCT, Instance::WGSL_STRUCT]),
        camera = Camera::WGSL_NAME,
        instance = Instance::WGSL_NAME,
        transform_fn = TRANSFORM_FN,
        bias = wgsl_float(SHADOW_BIAS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_depth_shader_validates() {
        validate_wgsl(&depth_shader()).unwrap();
    }

    #[test]
    fn test_shading_shader_validates() {
        validate_wgsl(&shading_shader()).unwrap();
    }

    #[test]
    fn test_depth_shader_writes_reversed_z() {
        let code = depth_shader();
        assert!(code.contains("vec4<f32>(p.x, p.y, light.near_z, p.z)"));
        assert!(!code.contains("@fragment"));
    }

    #[test]
    fn test_shading_shader_bindings() {
        let code = shading_shader();
        assert!(code.contains("@binding(0) var<uniform> camera: Camera"));
        assert!(code.contains("@binding(1) var<uniform> light: Camera"));
        assert!(code.contains("@binding(3) var shadow_map: texture_depth_2d"));
        assert!(code.contains("light.near_z + 0.001 > sampled * l.z"));
    }
}
