//! Core rendering engine.
//!
//! The [`Engine`] struct is the main entry point for the renderer. It owns the
//! scene (meshes, textures, camera), the configuration, and the per-frame
//! render list. A frame is two calls:
//!
//! 1. [`Engine::update`]: transform, cull, clip, triangulate, project and
//!    flat-shade every face into screen-space [`Triangle`]s.
//! 2. [`Engine::render`]: clear the buffers, rasterize the render list with
//!    depth testing, then draw the overlays the render mode asks for.

use log::{debug, warn};

use crate::camera::Camera;
use crate::clipper::{Frustum, Polygon};
use crate::colors;
use crate::config::{EngineConfig, RenderMode};
use crate::cull::{face_normal, CullMode};
use crate::error::RenderError;
use crate::light::DirectionalLight;
use crate::math::Vec3;
use crate::mesh::{Mesh, TextureId};
use crate::projection::Projection;
use crate::render::{Renderer, Triangle};
use crate::texture::Texture;

/// Upper bound on triangles queued in one frame.
pub const MAX_TRIANGLES_PER_FRAME: usize = 10_000;

const GRID_SPACING: i32 = 50;
const VERTEX_MARKER_SIZE: i32 = 4;

/// Counters from the last [`Engine::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Faces read from all meshes.
    pub faces: usize,
    /// Faces with collapsed vertices and no normal.
    pub degenerate: usize,
    /// Faces dropped by the cull mode.
    pub culled: usize,
    /// Faces entirely outside the frustum.
    pub clipped: usize,
    /// Triangles queued for rasterization.
    pub triangles: usize,
}

pub struct Engine {
    renderer: Renderer,
    meshes: Vec<Mesh>,
    textures: Vec<Texture>,
    camera: Camera,
    config: EngineConfig,
    frustum: Frustum,
    light: DirectionalLight,
    triangles_to_render: Vec<Triangle>,
}

impl Engine {
    /// Creates an engine rendering into a `width` x `height` buffer.
    ///
    /// A perspective projection takes the buffer's aspect ratio. An
    /// orthographic box is used exactly as given, the same as with
    /// [`Engine::set_projection`].
    pub fn new(width: u32, height: u32, config: EngineConfig) -> Self {
        let mut config = config;
        if height > 0 && matches!(config.projection, Projection::Perspective { .. }) {
            config.projection.set_aspect_ratio(width as f32 / height as f32);
        }

        Self {
            renderer: Renderer::new(width, height),
            meshes: Vec::new(),
            textures: Vec::new(),
            camera: Camera::default(),
            frustum: config.projection.frustum(),
            light: DirectionalLight::new(config.light_direction),
            config,
            triangles_to_render: Vec::new(),
        }
    }

    /// Adds a mesh to the scene and returns its index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut Mesh> {
        self.meshes.get_mut(index)
    }

    /// Stores a texture and returns the handle meshes refer to it by.
    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.config.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.config.render_mode
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.config.cull_mode = mode;
    }

    pub fn cull_mode(&self) -> CullMode {
        self.config.cull_mode
    }

    pub fn set_draw_grid(&mut self, draw_grid: bool) {
        self.config.draw_grid = draw_grid;
    }

    pub fn set_light_direction(&mut self, direction: Vec3) {
        self.light = DirectionalLight::new(direction);
        self.config.light_direction = self.light.direction;
    }

    pub fn projection(&self) -> &Projection {
        &self.config.projection
    }

    /// Replaces the projection and rebuilds the clipping frustum.
    pub fn set_projection(&mut self, projection: Projection) {
        self.config.projection = projection;
        self.frustum = projection.frustum();
        debug!("Projection set to {:?}", projection.kind());
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Reallocates the buffers and refits the projection to the new aspect
    /// ratio. An orthographic box keeps its vertical extent.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        if height > 0 {
            self.config
                .projection
                .set_aspect_ratio(width as f32 / height as f32);
        }
        self.frustum = self.config.projection.frustum();
        debug!("Resized to {width}x{height}");
    }

    pub fn width(&self) -> u32 {
        self.renderer.width()
    }

    pub fn height(&self) -> u32 {
        self.renderer.height()
    }

    /// Triangles queued by the last [`Engine::update`].
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles_to_render
    }

    /// Returns the rendered frame as bytes (ARGB8888 format)
    pub fn frame_buffer(&self) -> &[u8] {
        self.renderer.as_bytes()
    }

    pub fn color_buffer(&self) -> &[u32] {
        self.renderer.color_buffer()
    }

    /// Encoded depth of the last rendered frame, for debugging.
    pub fn depth_buffer(&self) -> &[f32] {
        self.renderer.depth_buffer()
    }

    /// Rebuilds the render list from the scene.
    ///
    /// Faces are transformed into camera space, culled, clipped against the
    /// frustum, fan-triangulated, projected and flat-shaded. If the list
    /// fills up, the triangles queued so far are kept and
    /// [`RenderError::TriangleCapacity`] is returned.
    pub fn update(&mut self) -> Result<FrameStats, RenderError> {
        self.triangles_to_render.clear();

        let view_matrix = self.camera.view_matrix();
        let kind = self.config.projection.kind();
        let projector = self
            .config
            .projection
            .projector(self.renderer.width(), self.renderer.height());
        let mut stats = FrameStats::default();
        let mut result = Ok(());

        'meshes: for mesh in &self.meshes {
            let world_view = view_matrix * mesh.transform().to_matrix();

            for face in mesh.faces() {
                stats.faces += 1;

                // Model Space --> Camera Space
                let vertices = mesh
                    .face_vertices(face)
                    .map(|v| world_view.transform_point(v));

                let Some(normal) = face_normal(&vertices) else {
                    stats.degenerate += 1;
                    continue;
                };
                if self.config.cull_mode.rejects(&vertices, normal, kind) {
                    stats.culled += 1;
                    continue;
                }

                let mut polygon = Polygon::from_triangle(vertices, face.uvs);
                if let Err(err) = polygon.clip(&self.frustum) {
                    warn!("Skipping face of mesh '{}': {err}", mesh.name());
                    continue;
                }
                if polygon.is_empty() {
                    stats.clipped += 1;
                    continue;
                }

                let color = self.light.shade(face.color, normal);

                for clipped in polygon.triangulate() {
                    if self.triangles_to_render.len() >= MAX_TRIANGLES_PER_FRAME {
                        warn!("Render list full at {MAX_TRIANGLES_PER_FRAME} triangles");
                        result = Err(RenderError::TriangleCapacity {
                            max: MAX_TRIANGLES_PER_FRAME,
                        });
                        break 'meshes;
                    }

                    let [Some(p0), Some(p1), Some(p2)] =
                        clipped.vertices.map(|v| projector.project(v))
                    else {
                        continue;
                    };
                    self.triangles_to_render.push(Triangle::new(
                        [p0, p1, p2],
                        clipped.texcoords,
                        color,
                        mesh.texture(),
                    ));
                }
            }
        }

        stats.triangles = self.triangles_to_render.len();
        debug!(
            "Frame: {} faces, {} degenerate, {} culled, {} clipped, {} triangles",
            stats.faces, stats.degenerate, stats.culled, stats.clipped, stats.triangles
        );
        result.map(|()| stats)
    }

    /// Render the current frame
    pub fn render(&mut self) {
        self.renderer.clear(self.config.background);
        self.renderer.clear_depth();

        if self.config.draw_grid {
            self.renderer.draw_grid(GRID_SPACING, colors::GRID);
        }

        let mode = self.config.render_mode;

        if mode.draws_fill() {
            for triangle in &self.triangles_to_render {
                // A missing texture falls back to the flat color
                let texture = triangle
                    .texture
                    .filter(|_| mode.uses_texture())
                    .and_then(|id| self.textures.get(id.0));
                self.renderer.fill_triangle(triangle, texture);
            }
        }

        for triangle in &self.triangles_to_render {
            if mode.draws_wireframe() {
                self.renderer
                    .draw_triangle_wireframe(triangle, colors::WIREFRAME);
            }
            if mode.draws_vertices() {
                self.renderer
                    .draw_vertex_markers(triangle, VERTEX_MARKER_SIZE, colors::VERTEX);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::mesh::Face;
    use crate::render::FAR_DEPTH;
    use crate::texture::PixelFormat;
    use approx::assert_relative_eq;

    const WIDTH: u32 = 64;
    const HEIGHT: u32 = 48;

    fn engine_with(mode: RenderMode) -> Engine {
        let config = EngineConfig {
            render_mode: mode,
            draw_grid: false,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(WIDTH, HEIGHT, config);
        let mut cube = Mesh::cube();
        cube.transform_mut().set_position_xyz(0.0, 0.0, 5.0);
        engine.add_mesh(cube);
        engine
    }

    fn center_index() -> usize {
        (HEIGHT / 2 * WIDTH + WIDTH / 2) as usize
    }

    fn lit(engine: &Engine) -> usize {
        engine
            .color_buffer()
            .iter()
            .filter(|&&c| c != colors::BACKGROUND)
            .count()
    }

    #[test]
    fn cube_in_front_of_camera_is_drawn() {
        let mut engine = engine_with(RenderMode::Filled);
        let stats = engine.update().unwrap();
        engine.render();

        assert_eq!(stats.faces, 12);
        assert!(lit(&engine) > 0);
        assert_eq!(engine.color_buffer()[center_index()], colors::FILL);
    }

    #[test]
    fn backface_culling_keeps_only_the_front_face() {
        let mut engine = engine_with(RenderMode::Filled);
        let stats = engine.update().unwrap();
        assert_eq!(stats.culled, 10);
        assert_eq!(engine.triangles().len(), 2);

        engine.set_cull_mode(CullMode::None);
        let stats = engine.update().unwrap();
        assert_eq!(stats.culled, 0);
        assert_eq!(engine.triangles().len(), 12);
    }

    #[test]
    fn depth_buffer_holds_encoded_depth_of_nearest_face() {
        let mut engine = engine_with(RenderMode::Filled);
        engine.set_cull_mode(CullMode::None);
        engine.update().unwrap();
        engine.render();

        // Front face sits at view depth 4, so 1 - 1/4
        assert_relative_eq!(engine.depth_buffer()[center_index()], 0.75, epsilon = 1e-4);
        assert_eq!(engine.depth_buffer()[0], FAR_DEPTH);
    }

    #[test]
    fn mesh_behind_camera_is_clipped_away() {
        let mut engine = engine_with(RenderMode::Filled);
        engine.set_cull_mode(CullMode::None);
        engine
            .mesh_mut(0)
            .unwrap()
            .transform_mut()
            .set_position_xyz(0.0, 0.0, -5.0);

        let stats = engine.update().unwrap();
        assert_eq!(stats.clipped, 12);
        assert!(engine.triangles().is_empty());
    }

    #[test]
    fn mesh_crossing_near_plane_is_clipped_not_dropped() {
        let mut engine = engine_with(RenderMode::Filled);
        engine.set_cull_mode(CullMode::None);
        engine
            .mesh_mut(0)
            .unwrap()
            .transform_mut()
            .set_position_xyz(0.0, 0.0, 0.5);

        engine.update().unwrap();
        assert!(!engine.triangles().is_empty());
        for triangle in engine.triangles() {
            for p in triangle.points {
                assert!(p.w >= engine.projection().z_near() - 1e-4);
            }
        }
    }

    #[test]
    fn missing_texture_falls_back_to_flat_color() {
        let mut flat = engine_with(RenderMode::Filled);
        flat.update().unwrap();
        flat.render();

        let mut textured = engine_with(RenderMode::Textured);
        textured
            .mesh_mut(0)
            .unwrap()
            .set_texture(Some(TextureId(7)));
        textured.update().unwrap();
        textured.render();

        assert_eq!(flat.color_buffer(), textured.color_buffer());
    }

    #[test]
    fn textured_mode_modulates_texels() {
        let mut engine = engine_with(RenderMode::Textured);
        let red = engine.add_texture(
            Texture::new(1, 1, PixelFormat::Rgb8, vec![255, 0, 0]).unwrap(),
        );
        engine.mesh_mut(0).unwrap().set_texture(Some(red));
        engine.update().unwrap();
        engine.render();
        assert_eq!(engine.color_buffer()[center_index()], 0xFFFF0000);

        // Same mesh in a flat mode ignores the texture
        engine.set_render_mode(RenderMode::Filled);
        engine.render();
        assert_eq!(engine.color_buffer()[center_index()], colors::FILL);
    }

    #[test]
    fn wireframe_mode_leaves_depth_untouched() {
        let mut engine = engine_with(RenderMode::Wireframe);
        engine.update().unwrap();
        engine.render();
        assert!(lit(&engine) > 0);
        assert!(engine.depth_buffer().iter().all(|&d| d == FAR_DEPTH));
    }

    #[test]
    fn orthographic_projection_draws_the_cube() {
        let mut engine = engine_with(RenderMode::Filled);
        engine.set_projection(Projection::orthographic_fit(
            4.0,
            WIDTH as f32 / HEIGHT as f32,
            0.1,
            100.0,
        ));
        engine.update().unwrap();
        engine.render();

        assert_eq!(engine.color_buffer()[center_index()], colors::FILL);
        assert!(engine.depth_buffer()[center_index()] < FAR_DEPTH);
    }

    #[test]
    fn full_render_list_reports_capacity() {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
            Vec3::new(1.0, 0.0, 5.0),
        ];
        let face = Face::new(0, 1, 2, [Vec2::ZERO; 3], colors::FILL);
        let faces = vec![face; MAX_TRIANGLES_PER_FRAME + 1];
        let mesh = Mesh::new("stack", vertices, faces).unwrap();

        let mut engine = Engine::new(WIDTH, HEIGHT, EngineConfig::default());
        engine.add_mesh(mesh);

        assert_eq!(
            engine.update(),
            Err(RenderError::TriangleCapacity {
                max: MAX_TRIANGLES_PER_FRAME
            })
        );
        assert_eq!(engine.triangles().len(), MAX_TRIANGLES_PER_FRAME);
    }

    #[test]
    fn explicit_orthographic_box_survives_construction() {
        let ortho = Projection::orthographic(-1.0, 1.0, 3.0, -3.0, 0.1, 10.0);
        let config = EngineConfig {
            projection: ortho,
            ..EngineConfig::default()
        };
        let built = Engine::new(WIDTH, HEIGHT, config);

        let mut switched = Engine::new(WIDTH, HEIGHT, EngineConfig::default());
        switched.set_projection(ortho);

        assert_eq!(*built.projection(), ortho);
        assert_eq!(built.projection(), switched.projection());
        assert_eq!(built.frustum(), switched.frustum());
    }

    #[test]
    fn perspective_takes_buffer_aspect_ratio_on_construction() {
        let config = EngineConfig {
            projection: Projection::from_degrees(60.0, 1.0, 0.1, 100.0),
            ..EngineConfig::default()
        };
        let engine = Engine::new(100, 50, config);
        match *engine.projection() {
            Projection::Perspective { aspect_ratio, .. } => {
                assert_relative_eq!(aspect_ratio, 2.0)
            }
            other => panic!("unexpected projection {other:?}"),
        }
    }

    #[test]
    fn resize_refits_buffers_and_aspect_ratio() {
        let mut engine = engine_with(RenderMode::Filled);
        engine.resize(100, 50);

        assert_eq!(engine.frame_buffer().len(), 100 * 50 * 4);
        match *engine.projection() {
            Projection::Perspective { aspect_ratio, .. } => {
                assert_relative_eq!(aspect_ratio, 2.0)
            }
            other => panic!("unexpected projection {other:?}"),
        }
    }
}
