//! A CPU scanline rasterizer.
//!
//! Meshes are transformed into camera space, backface-culled, clipped against
//! the view frustum, projected, and filled scanline by scanline into a color
//! buffer with a per-pixel depth test and perspective-correct texturing.
//! SDL2 is used only by the optional `window` feature for display.
//!
//! # Quick Start
//!
//! ```
//! use scanrast::prelude::*;
//!
//! let mut engine = Engine::new(320, 240, EngineConfig::default());
//! let mut cube = Mesh::cube();
//! cube.transform_mut().set_position_xyz(0.0, 0.0, 5.0);
//! engine.add_mesh(cube);
//!
//! engine.update().unwrap();
//! engine.render();
//! assert_eq!(engine.frame_buffer().len(), 320 * 240 * 4);
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod clipper;
pub mod colors;
pub mod config;
pub mod cull;
pub mod engine;
pub mod error;
pub mod light;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod texture;
pub mod transform;
#[cfg(feature = "window")]
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use config::{EngineConfig, RenderMode};
pub use engine::Engine;
pub use error::{ClipError, LoadError, RenderError};
pub use mesh::Mesh;
pub use projection::Projection;
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use scanrast::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{Camera, CameraController, CameraInput};

    // Engine
    pub use crate::config::{EngineConfig, RenderMode};
    pub use crate::cull::CullMode;
    pub use crate::engine::{Engine, FrameStats};

    // Scene
    pub use crate::light::DirectionalLight;
    pub use crate::mesh::{Face, Mesh, TextureId};
    pub use crate::texture::{PixelFormat, Texture};

    // Projection
    pub use crate::projection::{Projection, ProjectionKind};

    // Transform
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::{Mat4, Vec2, Vec3, Vec4};

    // Window & Input
    #[cfg(feature = "window")]
    pub use crate::window::{FrameLimiter, Window, WindowEvent};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::clipper::{Frustum, Polygon};
    pub use crate::render::{FrameBuffer, ScanlineRasterizer, Triangle, FAR_DEPTH};
    pub use crate::texture::Texture;
}
