//! Rendering subsystem.
//!
//! - [`framebuffer`]: borrowed color + depth view with the depth test
//! - [`rasterizer`]: screen-space triangles, barycentrics and scanline fill
//! - [`renderer`]: owned buffers plus overlay primitives (grid, lines, markers)

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;

pub use framebuffer::{FrameBuffer, FAR_DEPTH};
pub use rasterizer::{barycentric_weights, ScanlineRasterizer, Triangle};
pub use renderer::Renderer;
