//! WGSL generation for the flocking kernels.
//!
//! Struct declarations come from the [`GpuLayout`] derive so the shader reads
//! exactly the bytes the host uploads. Constants are spliced from the same
//! Rust constants the CPU kernel uses.

use super::{Boid, SimParams, SpriteCamera, HALF_EXTENT, MAX_SPEED, MIN_SPEED};
use crate::layout::{wgsl_float, wgsl_structs};
use crate::GpuLayout;

/// Invocations per compute workgroup.
pub const WORKGROUP_SIZE: u32 = 64;

/// Number of workgroups needed to cover `boid_count` invocations.
pub fn workgroup_count(boid_count: u32) -> u32 {
    boid_count.div_ceil(WORKGROUP_SIZE)
}

/// Compute shader with entry point `main`.
///
/// Bindings (group 0): `params` uniform at 0, `boids_now` read-only storage
/// at 1, `boids_next` read-write storage at 2.
pub fn compute_shader() -> String {
    format!(
        r#"{structs}

@group(0) @binding(0) var<uniform> params: {params};
@group(0) @binding(1) var<storage, read> boids_now: array<{boid}>;
@group(0) @binding(2) var<storage, read_write> boids_next: array<{boid}>;

@compute @workgroup_size({workgroup_size})
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {{
    let total = arrayLength(&boids_now);
    let index = global_id.x;
    if (index >= total) {{
        return;
    }}

    let me = boids_now[index];

    var cohesion_sum = vec2<f32>(0.0, 0.0);
    var cohesion_count = 0u;
    var separation = vec2<f32>(0.0, 0.0);
    var alignment_sum = vec2<f32>(0.0, 0.0);
    var alignment_count = 0u;

    for (var j = 0u; j < total; j += 1u) {{
        if (j == index) {{
            continue;
        }}
        let other = boids_now[j];
        let away = me.position - other.position;
        let d2 = dot(away, away);

        if (d2 < params.rule1_d2) {{
            cohesion_sum += other.position;
            cohesion_count += 1u;
        }}
        if (d2 < params.rule2_d2) {{
            separation += away;
        }}
        if (d2 < params.rule3_d2) {{
            alignment_sum += other.velocity;
            alignment_count += 1u;
        }}
    }}

    var velocity = me.velocity;
    if (cohesion_count > 0u) {{
        velocity += (cohesion_sum / f32(cohesion_count) - me.position) * params.rule1_w;
    }}
    if (alignment_count > 0u) {{
        velocity += (alignment_sum / f32(alignment_count)) * params.rule3_w;
    }}
    velocity += separation * params.rule2_w;

    let speed = length(velocity);
    if (speed > {min_speed}) {{
        velocity = (velocity / speed) * min(speed, {max_speed});
    }} else {{
        velocity = me.velocity;
    }}

    var position = me.position + velocity * params.dt;
    if (position.x < -{half}) {{
        position.x += {extent};
    }} else if (position.x > {half}) {{
        position.x -= {extent};
    }}
    if (position.y < -{half}) {{
        position.y += {extent};
    }} else if (position.y > {half}) {{
        position.y -= {extent};
    }}

    boids_next[index] = {boid}(position, velocity);
}}
"#,
        structs = wgsl_structs(&[SimParams::WGSL_STRUCT, Boid::WGSL_STRUCT]),
        params = SimParams::WGSL_NAME,
        boid = Boid::WGSL_NAME,
        workgroup_size = WORKGROUP_SIZE,
        min_speed = wgsl_float(MIN_SPEED),
        max_speed = wgsl_float(MAX_SPEED),
        half = wgsl_float(HALF_EXTENT),
        extent = wgsl_float(2.0 * HALF_EXTENT),
    )
}

/// Sprite render shader with entry points `vs_main` and `fs_main`.
///
/// The vertex stage takes the triangle corner at location 0 (per vertex) and
/// the boid position and velocity at locations 1 and 2 (per instance).
pub fn sprite_shader() -> String {
    format!(
        r#"{camera_struct}

@group(0) @binding(0) var<uniform> camera: {camera};

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
}}

@vertex
fn vs_main(
    @location(0) corner: vec2<f32>,
    @location(1) boid_position: vec2<f32>,
    @location(2) boid_velocity: vec2<f32>,
) -> VertexOutput {{
    var heading = vec2<f32>(1.0, 0.0);
    if (length(boid_velocity) > 0.0) {{
        heading = normalize(boid_velocity);
    }}
    let c = heading.x;
    let s = heading.y;
    let rotated = vec2<f32>(corner.x * c - corner.y * s, corner.x * s + corner.y * c);
    let world = rotated + boid_position;

    var out: VertexOutput;
    out.clip_position = vec4<f32>(world.x, -world.y * camera.aspect_ratio, 0.0, 1.0);
    out.color = vec4<f32>(0.5 + 0.5 * c, 0.5 + 0.5 * s, 1.0, 1.0);
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    return in.color;
}}
"#,
        camera_struct = SpriteCamera::WGSL_STRUCT,
        camera = SpriteCamera::WGSL_NAME,
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
    fn test_compute_shader_validates() {
        let code = compute_shader();
        validate_wgsl(&code).unwrap();
    }

    #[test]
    fn test_sprite_shader_validates() {
        let code = sprite_shader();
        validate_wgsl(&code).unwrap();
    }

    #[test]
    fn test_compute_shader_bindings() {
        let code = compute_shader();
        assert!(code.contains("@binding(0) var<uniform> params: SimParams"));
        assert!(code.contains("@binding(1) var<storage, read> boids_now: array<Boid>"));
        assert!(code.contains("@binding(2) var<storage, read_write> boids_next: array<Boid>"));
        assert!(code.contains("@workgroup_size(64)"));
        assert!(code.contains("struct Boid {"));
        assert!(code.contains("rule3_w: f32,"));
    }

    #[test]
    fn test_constants_are_float_literals() {
        assert_eq!(wgsl_float(0.1), "0.1");
        assert_eq!(wgsl_float(1.0), "1.0");
        let code = compute_shader();
        assert!(code.contains("speed > 0.001"));
        assert!(code.contains("min(speed, 0.1)"));
    }

    #[test]
    fn test_workgroup_count_rounds_up() {
        assert_eq!(workgroup_count(0), 0);
        assert_eq!(workgroup_count(1), 1);
        assert_eq!(workgroup_count(64), 1);
        assert_eq!(workgroup_count(65), 2);
        assert_eq!(workgroup_count(1000), 16);
    }
}
