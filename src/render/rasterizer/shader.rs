//! Pixel shaders for triangle rasterization.
//!
//! The rasterizer handles coverage, barycentric weights and the depth test.
//! A shader only turns the weights of a visible pixel into a color.

use crate::colors;
use crate::math::Vec2;
use crate::texture::Texture;

/// Below this interpolated `1/w` the perspective divide is skipped.
pub const INV_W_EPSILON: f32 = 1e-8;

/// Trait for per-pixel shading computations.
///
/// # Barycentric Coordinates
///
/// The `lambda` parameter contains three weights [λ₀, λ₁, λ₂] that:
/// - Sum to 1.0 for any point inside the triangle
/// - Represent the "influence" of each vertex on the current pixel
///
/// `inv_w` is `λ₀/w₀ + λ₁/w₁ + λ₂/w₂`, already computed for the depth test.
pub trait PixelShader {
    fn shade(&self, lambda: [f32; 3], inv_w: f32) -> u32;
}

/// Flat shader - returns a constant color for all pixels.
pub struct FlatShader {
    color: u32,
}

impl FlatShader {
    pub fn new(color: u32) -> Self {
        Self { color }
    }
}

impl PixelShader for FlatShader {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], _inv_w: f32) -> u32 {
        self.color
    }
}

/// Recovers UV from screen-space weights.
///
/// `uv_over_w` holds each vertex's `uv / w`, which is linear in screen space.
/// Blending it and dividing by the blended `1/w` undoes the perspective
/// weighting. A vanishing `inv_w` yields `(0, 0)` rather than NaN.
#[inline]
pub fn perspective_correct_uv(lambda: [f32; 3], uv_over_w: &[Vec2; 3], inv_w: f32) -> Vec2 {
    if inv_w.abs() < INV_W_EPSILON {
        return Vec2::ZERO;
    }
    let blended = uv_over_w[0] * lambda[0] + uv_over_w[1] * lambda[1] + uv_over_w[2] * lambda[2];
    blended * (1.0 / inv_w)
}

/// Texture shader - perspective-correct sampling modulated by the flat shade.
pub struct TextureShader<'a> {
    texture: &'a Texture,
    uv_over_w: [Vec2; 3],
    shade: u32,
}

impl<'a> TextureShader<'a> {
    /// # Arguments
    /// * `texture` - Texture to sample
    /// * `uvs` - Per-vertex texture coordinates
    /// * `w` - Per-vertex `w` kept by the projector
    /// * `shade` - Flat-shaded face color the texel is multiplied by
    pub fn new(texture: &'a Texture, uvs: [Vec2; 3], w: [f32; 3], shade: u32) -> Self {
        Self {
            texture,
            uv_over_w: [uvs[0] * (1.0 / w[0]), uvs[1] * (1.0 / w[1]), uvs[2] * (1.0 / w[2])],
            shade,
        }
    }
}

impl PixelShader for TextureShader<'_> {
    #[inline]
    fn shade(&self, lambda: [f32; 3], inv_w: f32) -> u32 {
        let uv = perspective_correct_uv(lambda, &self.uv_over_w, inv_w);
        colors::modulate(self.texture.sample(uv.x, uv.y), self.shade)
    }
}
