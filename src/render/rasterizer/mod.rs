//! Triangle rasterization.
//!
//! [`ScanlineRasterizer`] walks the covered pixels of a screen-space
//! [`Triangle`], computes barycentric weights for each one, depth-tests it
//! and hands surviving pixels to a [`PixelShader`].

mod scanline;
pub mod shader;

pub use scanline::ScanlineRasterizer;
pub use shader::{perspective_correct_uv, FlatShader, PixelShader, TextureShader};

use crate::math::{Vec2, Vec4};
use crate::mesh::TextureId;

/// Triangles with less than this doubled screen-space area are skipped.
pub const AREA_EPSILON: f32 = 1e-6;

/// A triangle ready for rasterization in screen space.
///
/// Points are `(screen_x, screen_y, ndc_z, w)` as produced by the projector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub points: [Vec4; 3],
    pub texcoords: [Vec2; 3],
    /// Flat-shaded color, ARGB8888.
    pub color: u32,
    pub texture: Option<TextureId>,
}

impl Triangle {
    pub fn new(points: [Vec4; 3], texcoords: [Vec2; 3], color: u32, texture: Option<TextureId>) -> Self {
        Self {
            points,
            texcoords,
            color,
            texture,
        }
    }

    /// Screen-space XY of each vertex.
    pub fn screen_points(&self) -> [Vec2; 3] {
        self.points.map(|p| Vec2::new(p.x, p.y))
    }
}

/// Computes the edge function value for point P relative to edge (A -> B).
///
/// ```text
/// E(P) = (P.x - A.x) * (B.y - A.y) - (P.y - A.y) * (B.x - A.x)
/// ```
///
/// The sign says which side of AB the point lies on; the magnitude is twice
/// the area of triangle ABP.
#[inline]
pub fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

/// Barycentric weights `[α, β, γ]` of `p` in triangle `abc`.
///
/// Each weight is the signed area of the sub-triangle opposite its vertex
/// divided by the full area, and `γ = 1 - α - β` so the three always sum to
/// one. Returns `None` for degenerate triangles.
#[inline]
pub fn barycentric_weights(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Option<[f32; 3]> {
    let area = edge_function(a, b, c);
    if area.abs() < AREA_EPSILON {
        return None;
    }
    Some(weights_with_inv_area([a, b, c], p, 1.0 / area))
}

/// Barycentric weights of `p` given a precomputed `1 / edge_function(a, b, c)`.
///
/// The rasterizer computes the reciprocal once per triangle and calls this
/// for every pixel.
#[inline]
pub fn weights_with_inv_area(vertices: [Vec2; 3], p: Vec2, inv_area: f32) -> [f32; 3] {
    let [a, b, c] = vertices;
    let alpha = edge_function(b, c, p) * inv_area;
    let beta = edge_function(c, a, p) * inv_area;
    [alpha, beta, 1.0 - alpha - beta]
}
