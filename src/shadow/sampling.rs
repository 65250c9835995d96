//! Point sampling of a shadow map.

use glam::Vec2;

/// Anything the shading pass can read a depth from.
///
/// `uv` is in `[0, 1]^2` with `v = 0` on the top row. Sampling is nearest
/// with clamp-to-edge addressing.
pub trait ShadowMap {
    fn sample_nearest(&self, uv: Vec2) -> f32;
}

/// Single-channel f32 depth target, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthImage {
    width: u32,
    height: u32,
    texels: Vec<f32>,
}

impl DepthImage {
    /// A target cleared to 0, the far value under reversed-Z.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            texels: vec![0.0; width as usize * height as usize],
        }
    }

    /// Wrap existing texels; `None` when the length does not match.
    pub fn from_texels(width: u32, height: u32, texels: Vec<f32>) -> Option<Self> {
        (texels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            texels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn texels(&self) -> &[f32] {
        &self.texels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.texels.get(self.index(x, y)).copied()
    }

    /// Reversed-Z depth test: store `depth` if it is greater than what is
    /// there. Returns whether it was stored.
    pub fn store_if_greater(&mut self, x: u32, y: u32, depth: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.index(x, y);
        match self.texels.get_mut(i) {
            Some(texel) if depth > *texel => {
                *texel = depth;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.texels.fill(0.0);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl ShadowMap for DepthImage {
    fn sample_nearest(&self, uv: Vec2) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 0.0;
        }
        let x = texel_coord(uv.x, self.width);
        let y = texel_coord(uv.y, self.height);
        self.texels[self.index(x, y)]
    }
}

/// Same depth everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDepth(pub f32);

impl ShadowMap for ConstantDepth {
    #[inline]
    fn sample_nearest(&self, _uv: Vec2) -> f32 {
        self.0
    }
}

/// `floor(u * size)` clamped to the edge texels.
#[inline]
fn texel_coord(u: f32, size: u32) -> u32 {
    let t = (u * size as f32).floor();
    if t.is_nan() || t <= 0.0 {
        0
    } else {
        (t as u32).min(size - 1)
    }
}
