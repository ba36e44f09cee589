//! Scanline-based triangle rasterization.
//!
//! This module implements triangle rasterization using the classic scanline algorithm
//! with flat-top/flat-bottom triangle decomposition.
//!
//! # Algorithm Overview
//!
//! 1. **Sort vertices** by Y coordinate (top to bottom in screen space)
//! 2. **Decompose** the triangle into a flat-bottom and a flat-top half
//! 3. **Rasterize** each scanline between the left and right edge positions
//!
//! # Triangle Decomposition
//!
//! ```text
//!        v0                   v0
//!        /\                   /\
//!       /  \                 /  \
//!      /    \       =>      /----\<- split at v1.y
//!     /      \             v1   split
//!    /________\             \    /
//!   v1        v2             \  /
//!                             \/
//!                             v2
//!
//!   General triangle      Flat-bottom (top) + Flat-top (bottom)
//! ```
//!
//! # Inverse Slope Method
//!
//! For each edge we precompute `inv_slope = dx / dy` and step the edge X by
//! that amount per scanline instead of solving for X on every row.
//!
//! # Coverage
//!
//! Pixels are sampled at their centres `(x + 0.5, y + 0.5)`. Rows and spans
//! are half-open, so a pixel centre lying exactly on an edge shared by two
//! triangles is filled by only one of them.
//!
//! # Attributes
//!
//! Sorting only decides the scan order. Barycentric weights are always taken
//! against the triangle's input vertex order, so per-vertex depth, `w` and
//! UV stay paired with the right vertex without being shuffled.

use super::shader::{FlatShader, PixelShader, TextureShader};
use super::{edge_function, weights_with_inv_area, Triangle, AREA_EPSILON};
use crate::math::Vec2;
use crate::render::framebuffer::FrameBuffer;
use crate::texture::Texture;

/// Per-triangle constants reused for every pixel.
struct TriangleSetup {
    screen: [Vec2; 3],
    inv_area: f32,
    inv_w: [f32; 3],
}

impl TriangleSetup {
    fn new(triangle: &Triangle) -> Option<Self> {
        let screen = triangle.screen_points();
        let area = edge_function(screen[0], screen[1], screen[2]);
        if !area.is_finite() || area.abs() < AREA_EPSILON {
            return None;
        }
        // The projector only emits positive w
        if triangle.points.iter().any(|p| p.w.is_nan() || p.w <= f32::EPSILON) {
            return None;
        }
        Some(Self {
            screen,
            inv_area: 1.0 / area,
            inv_w: triangle.points.map(|p| 1.0 / p.w),
        })
    }

    #[inline]
    fn weights(&self, p: Vec2) -> [f32; 3] {
        weights_with_inv_area(self.screen, p, self.inv_area)
    }
}

/// A triangle edge walked one scanline at a time.
#[derive(Clone, Copy)]
struct Edge {
    origin: Vec2,
    inv_slope: f32,
}

impl Edge {
    #[inline]
    fn x_at(&self, y: f32) -> f32 {
        self.origin.x + self.inv_slope * (y - self.origin.y)
    }
}

/// Scanline-based triangle rasterizer with a per-pixel depth test.
///
/// The rasterizer handles vertex sorting internally, so input triangles can
/// have vertices in any order and either winding.
pub struct ScanlineRasterizer;

impl ScanlineRasterizer {
    /// Creates a new scanline rasterizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Rasterizes a triangle, choosing the shader from its texture binding.
    ///
    /// With a texture the texel is sampled perspective-correctly and
    /// modulated by `triangle.color`; without one `triangle.color` is
    /// written directly.
    pub fn rasterize(&self, triangle: &Triangle, texture: Option<&Texture>, buffer: &mut FrameBuffer) {
        match texture {
            Some(texture) => {
                let w = triangle.points.map(|p| p.w);
                let shader = TextureShader::new(texture, triangle.texcoords, w, triangle.color);
                self.fill_triangle(triangle, &shader, buffer);
            }
            None => self.fill_triangle(triangle, &FlatShader::new(triangle.color), buffer),
        }
    }

    /// Fills a triangle using the scanline algorithm and the given shader.
    ///
    /// Degenerate triangles (near-zero area or non-positive `w`) are skipped.
    /// Pixels outside the buffer are never visited.
    pub fn fill_triangle<S: PixelShader>(&self, triangle: &Triangle, shader: &S, buffer: &mut FrameBuffer) {
        let Some(setup) = TriangleSetup::new(triangle) else {
            return;
        };

        let [v0, v1, v2] = Self::sort_vertices(setup.screen);

        // Split point lies on edge v0->v2 at the same Y as v1
        let t = (v1.y - v0.y) / (v2.y - v0.y);
        let split = Vec2::new(v0.x + (v2.x - v0.x) * t, v1.y);

        Self::fill_flat_bottom(v0, v1, split, &setup, shader, buffer);
        Self::fill_flat_top(v1, split, v2, &setup, shader, buffer);
    }

    /// Sorts three vertices by Y coordinate (ascending: top to bottom in screen space).
    ///
    /// Three compare-and-swaps suffice for 3 elements.
    fn sort_vertices(points: [Vec2; 3]) -> [Vec2; 3] {
        let [mut v0, mut v1, mut v2] = points;
        if v1.y < v0.y {
            std::mem::swap(&mut v0, &mut v1);
        }
        if v2.y < v1.y {
            std::mem::swap(&mut v1, &mut v2);
        }
        if v1.y < v0.y {
            std::mem::swap(&mut v0, &mut v1);
        }
        [v0, v1, v2]
    }

    /// Fills a flat-bottom triangle: apex `v0` above `v1` and `v2`, which
    /// share a Y coordinate.
    fn fill_flat_bottom<S: PixelShader>(
        v0: Vec2,
        v1: Vec2,
        v2: Vec2,
        setup: &TriangleSetup,
        shader: &S,
        buffer: &mut FrameBuffer,
    ) {
        let height = v1.y - v0.y;
        if height.abs() < f32::EPSILON {
            return; // Zero-height half
        }

        let edge_1 = Edge {
            origin: v0,
            inv_slope: (v1.x - v0.x) / height,
        };
        let edge_2 = Edge {
            origin: v0,
            inv_slope: (v2.x - v0.x) / height,
        };
        Self::scan_rows(v0.y, v1.y, edge_1, edge_2, setup, shader, buffer);
    }

    /// Fills a flat-top triangle: `v0` and `v1` share a Y coordinate above
    /// the bottom vertex `v2`.
    fn fill_flat_top<S: PixelShader>(
        v0: Vec2,
        v1: Vec2,
        v2: Vec2,
        setup: &TriangleSetup,
        shader: &S,
        buffer: &mut FrameBuffer,
    ) {
        let height = v2.y - v0.y;
        if height.abs() < f32::EPSILON {
            return;
        }

        let edge_1 = Edge {
            origin: v0,
            inv_slope: (v2.x - v0.x) / height,
        };
        let edge_2 = Edge {
            origin: v1,
            inv_slope: (v2.x - v1.x) / height,
        };
        Self::scan_rows(v0.y, v2.y, edge_1, edge_2, setup, shader, buffer);
    }

    /// Visits every pixel centre with `y_top <= y < y_bottom` between the two
    /// edges, clamped to the buffer.
    fn scan_rows<S: PixelShader>(
        y_top: f32,
        y_bottom: f32,
        edge_1: Edge,
        edge_2: Edge,
        setup: &TriangleSetup,
        shader: &S,
        buffer: &mut FrameBuffer,
    ) {
        let width = buffer.width() as i32;
        let y_start = ((y_top - 0.5).ceil() as i32).max(0);
        let y_end = ((y_bottom - 0.5).ceil() as i32).min(buffer.height() as i32);
        if y_start >= y_end {
            return;
        }

        let first_row = y_start as f32 + 0.5;
        let mut x1 = edge_1.x_at(first_row);
        let mut x2 = edge_2.x_at(first_row);

        for y in y_start..y_end {
            let (x_left, x_right) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
            let x_start = ((x_left - 0.5).ceil() as i32).max(0);
            let x_end = ((x_right - 0.5).ceil() as i32).min(width);

            let py = y as f32 + 0.5;
            for x in x_start..x_end {
                let lambda = setup.weights(Vec2::new(x as f32 + 0.5, py));
                let inv_w = lambda[0] * setup.inv_w[0]
                    + lambda[1] * setup.inv_w[1]
                    + lambda[2] * setup.inv_w[2];
                let depth = 1.0 - inv_w;
                if buffer.test_and_set_depth(x, y, depth) {
                    buffer.set_pixel(x, y, shader.shade(lambda, inv_w));
                }
            }

            x1 += edge_1.inv_slope;
            x2 += edge_2.inv_slope;
        }
    }
}

impl Default for ScanlineRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;
    use crate::render::framebuffer::FAR_DEPTH;
    use crate::texture::PixelFormat;
    use approx::assert_relative_eq;

    const W: u32 = 32;
    const H: u32 = 32;
    const CLEAR: u32 = 0xFF000000;

    struct Target {
        color: Vec<u32>,
        depth: Vec<f32>,
    }

    impl Target {
        fn new() -> Self {
            Self {
                color: vec![CLEAR; (W * H) as usize],
                depth: vec![FAR_DEPTH; (W * H) as usize],
            }
        }

        fn draw(&mut self, triangle: &Triangle, texture: Option<&Texture>) {
            let mut fb = FrameBuffer::new(&mut self.color, &mut self.depth, W, H);
            ScanlineRasterizer::new().rasterize(triangle, texture, &mut fb);
        }

        fn pixel(&self, x: u32, y: u32) -> u32 {
            self.color[(y * W + x) as usize]
        }

        fn filled(&self) -> usize {
            self.color.iter().filter(|&&c| c != CLEAR).count()
        }
    }

    fn flat(points: [(f32, f32); 3], w: f32, color: u32) -> Triangle {
        Triangle::new(
            points.map(|(x, y)| Vec4::new(x, y, 0.0, w)),
            [Vec2::ZERO; 3],
            color,
            None,
        )
    }

    /// Records the weights of every shaded pixel.
    struct WeightRecorder(std::cell::RefCell<Vec<[f32; 3]>>);

    impl PixelShader for WeightRecorder {
        fn shade(&self, lambda: [f32; 3], _inv_w: f32) -> u32 {
            self.0.borrow_mut().push(lambda);
            0xFFFFFFFF
        }
    }

    #[test]
    fn covered_pixels_have_normalized_weights() {
        let mut target = Target::new();
        let triangle = flat([(3.0, 2.0), (29.0, 11.0), (9.0, 30.0)], 2.0, 0);
        let recorder = WeightRecorder(std::cell::RefCell::new(Vec::new()));
        let mut fb = FrameBuffer::new(&mut target.color, &mut target.depth, W, H);
        ScanlineRasterizer::new().fill_triangle(&triangle, &recorder, &mut fb);

        let weights = recorder.0.into_inner();
        assert!(!weights.is_empty());
        for lambda in weights {
            assert_relative_eq!(lambda[0] + lambda[1] + lambda[2], 1.0, epsilon = 1e-5);
            for weight in lambda {
                assert!(weight >= -1e-5, "weight {weight} in {lambda:?}");
            }
        }
    }

    #[test]
    fn sort_vertices_orders_by_y() {
        let sorted = ScanlineRasterizer::sort_vertices([
            Vec2::new(0.0, 9.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(2.0, 5.0),
        ]);
        assert_eq!(sorted.map(|v| v.y), [2.0, 5.0, 9.0]);
    }

    #[test]
    fn fills_axis_aligned_right_triangle() {
        let mut target = Target::new();
        target.draw(&flat([(0.0, 0.0), (8.0, 0.0), (0.0, 8.0)], 1.0, 0xFFFFFFFF), None);

        assert_eq!(target.pixel(0, 0), 0xFFFFFFFF);
        assert_eq!(target.pixel(6, 0), 0xFFFFFFFF);
        assert_eq!(target.pixel(0, 6), 0xFFFFFFFF);
        // Centre (0.5, 7.5) sits exactly on the hypotenuse
        assert_eq!(target.pixel(0, 7), CLEAR);
        // Centres strictly inside: 7 + 6 + ... + 1
        assert_eq!(target.filled(), 28);
    }

    #[test]
    fn either_winding_is_filled() {
        let mut cw = Target::new();
        cw.draw(&flat([(2.0, 2.0), (20.0, 4.0), (6.0, 18.0)], 1.0, 0xFFFFFFFF), None);
        let mut ccw = Target::new();
        ccw.draw(&flat([(2.0, 2.0), (6.0, 18.0), (20.0, 4.0)], 1.0, 0xFFFFFFFF), None);
        assert!(cw.filled() > 0);
        assert_eq!(cw.color, ccw.color);
    }

    #[test]
    fn shared_edge_is_not_drawn_twice() {
        let a = flat([(0.0, 0.0), (16.0, 0.0), (0.0, 16.0)], 1.0, 0xFFFF0000);
        let b = flat([(16.0, 0.0), (16.0, 16.0), (0.0, 16.0)], 1.0, 0xFF00FF00);
        let mut first = Target::new();
        first.draw(&a, None);
        let mut second = Target::new();
        second.draw(&b, None);

        // Every pixel in the 16x16 square is covered by exactly one of them
        for y in 0..16 {
            for x in 0..16 {
                let hits = [&first, &second]
                    .iter()
                    .filter(|t| t.pixel(x, y) != CLEAR)
                    .count();
                assert_eq!(hits, 1, "pixel ({x}, {y})");
            }
        }
        assert_eq!(first.filled() + second.filled(), 256);
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let near = flat([(0.0, 0.0), (30.0, 0.0), (0.0, 30.0)], 1.0, 0xFFFF0000);
        let far = flat([(0.0, 0.0), (30.0, 0.0), (0.0, 30.0)], 5.0, 0xFF0000FF);

        let mut near_first = Target::new();
        near_first.draw(&near, None);
        near_first.draw(&far, None);

        let mut far_first = Target::new();
        far_first.draw(&far, None);
        far_first.draw(&near, None);

        assert_eq!(near_first.pixel(5, 5), 0xFFFF0000);
        assert_eq!(far_first.pixel(5, 5), 0xFFFF0000);
        assert_eq!(near_first.color, far_first.color);
    }

    #[test]
    fn intersecting_triangles_resolve_per_pixel() {
        // Same screen footprint, depth ordering swaps from left to right
        let points = [(0.0, 0.0), (30.0, 0.0), (0.0, 30.0)].map(|(x, y)| Vec2::new(x, y));
        let red = Triangle::new(
            [
                Vec4::new(points[0].x, points[0].y, 0.0, 1.0),
                Vec4::new(points[1].x, points[1].y, 0.0, 4.0),
                Vec4::new(points[2].x, points[2].y, 0.0, 1.0),
            ],
            [Vec2::ZERO; 3],
            0xFFFF0000,
            None,
        );
        let blue = Triangle::new(
            [
                Vec4::new(points[0].x, points[0].y, 0.0, 4.0),
                Vec4::new(points[1].x, points[1].y, 0.0, 1.0),
                Vec4::new(points[2].x, points[2].y, 0.0, 4.0),
            ],
            [Vec2::ZERO; 3],
            0xFF0000FF,
            None,
        );
        let mut target = Target::new();
        target.draw(&red, None);
        target.draw(&blue, None);
        assert_eq!(target.pixel(1, 5), 0xFFFF0000);
        assert_eq!(target.pixel(25, 1), 0xFF0000FF);
    }

    #[test]
    fn degenerate_triangles_draw_nothing() {
        let mut target = Target::new();
        // Collinear
        target.draw(&flat([(0.0, 0.0), (10.0, 10.0), (20.0, 20.0)], 1.0, 0xFFFFFFFF), None);
        // Zero height
        target.draw(&flat([(0.0, 5.0), (10.0, 5.0), (20.0, 5.0)], 1.0, 0xFFFFFFFF), None);
        // Repeated vertex
        target.draw(&flat([(3.0, 3.0), (3.0, 3.0), (9.0, 1.0)], 1.0, 0xFFFFFFFF), None);
        assert_eq!(target.filled(), 0);
        assert!(target.depth.iter().all(|&d| d == FAR_DEPTH));
    }

    #[test]
    fn non_positive_w_is_skipped() {
        let mut target = Target::new();
        target.draw(&flat([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], 0.0, 0xFFFFFFFF), None);
        assert_eq!(target.filled(), 0);
    }

    #[test]
    fn off_screen_parts_are_clipped_to_bounds() {
        let mut target = Target::new();
        target.draw(
            &flat([(-100.0, -100.0), (200.0, -50.0), (-20.0, 300.0)], 1.0, 0xFFFFFFFF),
            None,
        );
        // Covers the whole buffer without touching memory outside it
        assert_eq!(target.filled(), (W * H) as usize);
    }

    #[test]
    fn flat_bottom_and_flat_top_inputs_fill() {
        let mut target = Target::new();
        target.draw(&flat([(8.0, 2.0), (2.0, 12.0), (14.0, 12.0)], 1.0, 0xFFFFFFFF), None);
        assert_eq!(target.pixel(8, 8), 0xFFFFFFFF);

        let mut target = Target::new();
        target.draw(&flat([(2.0, 2.0), (14.0, 2.0), (8.0, 12.0)], 1.0, 0xFFFFFFFF), None);
        assert_eq!(target.pixel(8, 4), 0xFFFFFFFF);
    }

    #[test]
    fn textured_triangle_samples_perspective_correct() {
        // 4x1 texture: columns are red, green, blue, white
        let texture = Texture::new(
            4,
            1,
            PixelFormat::Rgb8,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
        )
        .unwrap();

        // Near left edge, far right edge. Affine mapping would put u = 0.5 at
        // the horizontal midpoint; perspective pulls it toward the far side.
        let tri = Triangle::new(
            [
                Vec4::new(0.0, 0.0, 0.0, 1.0),
                Vec4::new(32.0, 0.0, 0.0, 4.0),
                Vec4::new(0.0, 32.0, 0.0, 1.0),
            ],
            [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0)],
            0xFFFFFFFF,
            None,
        );

        let mut target = Target::new();
        target.draw(&tri, Some(&texture));
        // At x = 16.5 on the top row affine u ~ 0.5 (blue), corrected u ~ 0.2 (red)
        assert_eq!(target.pixel(16, 0), 0xFFFF0000);
    }
}
