//! Low-level rendering primitives.
//!
//! Provides the [`Renderer`] struct which owns the color and depth buffers and
//! implements basic drawing operations like lines, rectangles, and wireframes.
//! Overlays drawn here write color only; they are not depth-tested.

use super::framebuffer::{FrameBuffer, FAR_DEPTH};
use super::rasterizer::{ScanlineRasterizer, Triangle};
use crate::colors;
use crate::texture::Texture;

/// Pixel count of a `width` x `height` buffer, computed without `u32` overflow.
fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
    rasterizer: ScanlineRasterizer,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = buffer_len(width, height);
        Self {
            color_buffer: vec![colors::BACKGROUND; size],
            depth_buffer: vec![FAR_DEPTH; size],
            width,
            height,
            rasterizer: ScanlineRasterizer::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let size = buffer_len(width, height);
        self.color_buffer = vec![colors::BACKGROUND; size];
        self.depth_buffer = vec![FAR_DEPTH; size];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    /// Clear the depth buffer to prepare for a new frame.
    #[inline]
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(FAR_DEPTH);
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let index = y as usize * self.width as usize + x as usize;
            self.color_buffer[index] = color;
        }
    }

    pub fn draw_grid(&mut self, spacing: i32, color: u32) {
        if spacing <= 0 {
            return;
        }
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if x % spacing == 0 || y % spacing == 0 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    #[inline]
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        for dy in 0..height {
            for dx in 0..width {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// Draws a line with the DDA algorithm, both endpoints included.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let side_length = dx.abs().max(dy.abs());
        if side_length == 0 {
            self.set_pixel(x0, y0, color);
            return;
        }

        let x_increment = dx as f32 / side_length as f32;
        let y_increment = dy as f32 / side_length as f32;
        let mut current_x = x0 as f32;
        let mut current_y = y0 as f32;

        for _ in 0..=side_length {
            self.set_pixel(current_x.round() as i32, current_y.round() as i32, color);
            current_x += x_increment;
            current_y += y_increment;
        }
    }

    pub fn draw_triangle_wireframe(&mut self, triangle: &Triangle, color: u32) {
        let [p0, p1, p2] = triangle.points;
        for (a, b) in [(p0, p1), (p1, p2), (p2, p0)] {
            self.draw_line(a.x as i32, a.y as i32, b.x as i32, b.y as i32, color);
        }
    }

    /// Draws a `size` x `size` square centred on each vertex.
    pub fn draw_vertex_markers(&mut self, triangle: &Triangle, size: i32, color: u32) {
        let half = size / 2;
        for p in triangle.points {
            self.draw_rect(p.x as i32 - half, p.y as i32 - half, size, size, color);
        }
    }

    /// Rasterizes a filled triangle with depth testing.
    pub fn fill_triangle(&mut self, triangle: &Triangle, texture: Option<&Texture>) {
        let mut buffer = FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        );
        self.rasterizer.rasterize(triangle, texture, &mut buffer);
    }

    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    /// Encoded per-pixel depth (`1 - 1/w`, [`FAR_DEPTH`] where nothing was drawn).
    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// The color buffer as raw bytes in native endianness, for upload to a
    /// presentation surface.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and stricter alignment than u8, and the
        // byte length covers exactly the initialised u32 storage.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }
}
