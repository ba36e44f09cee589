//! Engine configuration.

use crate::colors;
use crate::cull::CullMode;
use crate::math::Vec3;
use crate::projection::Projection;

/// Rendering mode presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Wireframe only (key: 1)
    Wireframe,
    /// Wireframe + vertices (key: 2)
    WireframeVertices,
    /// Flat-shaded fill only (key: 3)
    Filled,
    /// Flat-shaded fill + wireframe (key: 4)
    #[default]
    FilledWireframe,
    /// Textured fill only (key: 5)
    Textured,
    /// Textured fill + wireframe (key: 6)
    TexturedWireframe,
}

impl RenderMode {
    pub const ALL: [RenderMode; 6] = [
        RenderMode::Wireframe,
        RenderMode::WireframeVertices,
        RenderMode::Filled,
        RenderMode::FilledWireframe,
        RenderMode::Textured,
        RenderMode::TexturedWireframe,
    ];

    pub fn draws_fill(self) -> bool {
        !matches!(self, RenderMode::Wireframe | RenderMode::WireframeVertices)
    }

    pub fn draws_wireframe(self) -> bool {
        matches!(
            self,
            RenderMode::Wireframe
                | RenderMode::WireframeVertices
                | RenderMode::FilledWireframe
                | RenderMode::TexturedWireframe
        )
    }

    pub fn draws_vertices(self) -> bool {
        self == RenderMode::WireframeVertices
    }

    /// Whether filled triangles sample their mesh texture.
    pub fn uses_texture(self) -> bool {
        matches!(self, RenderMode::Textured | RenderMode::TexturedWireframe)
    }
}

/// Everything an [`Engine`](crate::engine::Engine) can be told before a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub render_mode: RenderMode,
    pub cull_mode: CullMode,
    pub projection: Projection,
    /// Direction the light travels, in camera space.
    pub light_direction: Vec3,
    /// Clear color, ARGB8888.
    pub background: u32,
    pub draw_grid: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::default(),
            cull_mode: CullMode::default(),
            projection: Projection::default(),
            light_direction: Vec3::FORWARD,
            background: colors::BACKGROUND,
            draw_grid: true,
        }
    }
}
