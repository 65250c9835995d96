//! CPU reference rasterizer for the depth pass.
//!
//! Runs [`depth_vertex`] over indexed triangles and writes `near_z / w` into
//! a [`DepthImage`] with the reversed-Z "greater" test. Since `1 / w` is
//! affine in screen space, interpolating the stored depth with screen-space
//! barycentrics is exact. Triangles with any vertex in front of the light's
//! near plane are dropped rather than clipped.

use glam::{Vec2, Vec3, Vec4};

use super::{
    depth_vertex, shading_fragment, shading_vertex, Camera, DepthImage, Instance, ShadowMap,
};

/// Indexed triangle mesh in local space.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Square in the XZ plane at `y = 0`.
    pub fn quad(half_extent: f32) -> Self {
        let h = half_extent;
        Self {
            positions: vec![
                Vec3::new(-h, 0.0, -h),
                Vec3::new(h, 0.0, -h),
                Vec3::new(h, 0.0, h),
                Vec3::new(-h, 0.0, h),
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    /// Axis-aligned cube centred on the origin.
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent;
        let positions = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { -h } else { h },
                    if i & 2 == 0 { -h } else { h },
                    if i & 4 == 0 { -h } else { h },
                )
            })
            .collect();
        // Two triangles per face: -z, +z, -y, +y, -x, +x
        let faces: [[u32; 4]; 6] = [
            [0, 2, 3, 1],
            [4, 5, 7, 6],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 4, 6, 2],
            [1, 3, 7, 5],
        ];
        let triangles = faces
            .iter()
            .flat_map(|&[a, b, c, d]| [[a, b, c], [a, c, d]])
            .collect();
        Self { positions, triangles }
    }
}

/// Draw every instance of `mesh` into `target` as seen from `light`.
///
/// Returns the number of texels written.
pub fn rasterize_depth(
    light: &Camera,
    mesh: &Mesh,
    instances: &[Instance],
    target: &mut DepthImage,
) -> usize {
    let size = Vec2::new(target.width() as f32, target.height() as f32);
    let mut written = 0;

    for instance in instances {
        let clip: Vec<Vec4> = mesh
            .positions
            .iter()
            .map(|&p| depth_vertex(p, instance, light))
            .collect();

        for &[a, b, c] in &mesh.triangles {
            let corners = [a, b, c].map(|i| clip.get(i as usize).copied());
            let [Some(a), Some(b), Some(c)] = corners else {
                continue;
            };
            if [a, b, c].iter().any(|v| v.w < light.near_z) {
                continue;
            }
            written += rasterize_triangle([a, b, c], size, target);
        }
    }

    written
}

/// Screen position (texels, top-left origin) and depth of a clip vertex.
fn to_screen(clip: Vec4, size: Vec2) -> (Vec2, f32) {
    let ndc = Vec2::new(clip.x, clip.y) / clip.w;
    let screen = Vec2::new(0.5 * (ndc.x + 1.0), 0.5 * (1.0 - ndc.y)) * size;
    (screen, clip.z / clip.w)
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn rasterize_triangle(clip: [Vec4; 3], size: Vec2, target: &mut DepthImage) -> usize {
    let [(pa, da), (pb, db), (pc, dc)] = clip.map(|v| to_screen(v, size));
    let area = edge(pa, pb, pc);
    if area == 0.0 || !area.is_finite() {
        return 0;
    }

    let min = pa.min(pb).min(pc).max(Vec2::ZERO).floor();
    let max = pa.max(pb).max(pc).min(size).ceil();
    let mut written = 0;

    for y in min.y as u32..max.y as u32 {
        for x in min.x as u32..max.x as u32 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let wa = edge(pb, pc, p) / area;
            let wb = edge(pc, pa, p) / area;
            let wc = edge(pa, pb, p) / area;
            if wa < 0.0 || wb < 0.0 || wc < 0.0 {
                continue;
            }
            let depth = wa * da + wb * db + wc * dc;
            if target.store_if_greater(x, y, depth) {
                written += 1;
            }
        }
    }

    written
}

/// Run the shading pass at individual local-space points of one instance.
///
/// Each point is shaded as if a fragment landed exactly on it. Returns 1.0
/// for lit points and 0.0 for shadowed ones.
pub fn shade_samples<M: ShadowMap + ?Sized>(
    points: &[Vec3],
    instance: &Instance,
    camera: &Camera,
    light: &Camera,
    shadow_map: &M,
) -> Vec<f32> {
    points
        .iter()
        .map(|&p| {
            let varying = shading_vertex(p, instance, camera, light);
            shading_fragment(&varying, light, shadow_map).x
        })
        .collect()
}
