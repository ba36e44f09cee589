//! Triangle meshes: vertex and face storage plus a world transform.

use std::io::BufRead;
use std::path::Path;

use crate::colors;
use crate::error::LoadError;
use crate::math::{Vec2, Vec3};
use crate::transform::Transform;

/// Handle to a texture registered with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// A triangle referencing three mesh vertices by 0-based index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    /// Texture coordinates for `a`, `b`, `c`; `v = 0` is the top image row.
    pub uvs: [Vec2; 3],
    /// Base color, ARGB8888.
    pub color: u32,
}

impl Face {
    pub const fn new(a: u32, b: u32, c: u32, uvs: [Vec2; 3], color: u32) -> Self {
        Self { a, b, c, uvs, color }
    }

    pub fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }
}

pub const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

const UV_LOWER: [Vec2; 3] = [Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
const UV_UPPER: [Vec2; 3] = [Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];

/// Cube faces, clockwise when seen from outside.
pub const CUBE_FACES: [Face; 12] = [
    // Front
    Face::new(0, 1, 2, UV_LOWER, colors::FILL),
    Face::new(0, 2, 3, UV_UPPER, colors::FILL),
    // Right
    Face::new(3, 2, 4, UV_LOWER, colors::FILL),
    Face::new(3, 4, 5, UV_UPPER, colors::FILL),
    // Back
    Face::new(5, 4, 6, UV_LOWER, colors::FILL),
    Face::new(5, 6, 7, UV_UPPER, colors::FILL),
    // Left
    Face::new(7, 6, 1, UV_LOWER, colors::FILL),
    Face::new(7, 1, 0, UV_UPPER, colors::FILL),
    // Top
    Face::new(1, 6, 4, UV_LOWER, colors::FILL),
    Face::new(1, 4, 2, UV_UPPER, colors::FILL),
    // Bottom
    Face::new(5, 7, 0, UV_LOWER, colors::FILL),
    Face::new(5, 0, 3, UV_UPPER, colors::FILL),
];

/// Vertex and face data with its own world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    transform: Transform,
    texture: Option<TextureId>,
}

impl Mesh {
    /// Creates a mesh, checking that it has faces and that every face index
    /// is in range.
    pub fn new(name: impl Into<String>, vertices: Vec<Vec3>, faces: Vec<Face>) -> Result<Self, LoadError> {
        let name = name.into();
        if faces.is_empty() {
            return Err(LoadError::EmptyMesh(name));
        }
        for (face_index, face) in faces.iter().enumerate() {
            if let Some(&index) = face
                .indices()
                .iter()
                .find(|&&i| i as usize >= vertices.len())
            {
                return Err(LoadError::FaceIndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        Ok(Self {
            name,
            vertices,
            faces,
            transform: Transform::default(),
            texture: None,
        })
    }

    /// The built-in 2x2x2 cube centred on the origin.
    pub fn cube() -> Self {
        Self {
            name: "cube".to_string(),
            vertices: CUBE_VERTICES.to_vec(),
            faces: CUBE_FACES.to_vec(),
            transform: Transform::default(),
            texture: None,
        }
    }

    /// Loads every object in an OBJ file and merges them into one mesh.
    ///
    /// Polygons are triangulated. Texture V is flipped so `v = 0` addresses
    /// the top row of the image; faces without texcoords get `(0, 0)`.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(path, &obj_load_options())?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "obj".to_string());
        let mesh = Self::from_models(name, &models)?;
        log::info!(
            "loaded {} ({} vertices, {} faces)",
            path.display(),
            mesh.vertices.len(),
            mesh.faces.len()
        );
        Ok(mesh)
    }

    /// Loads OBJ text from a reader. Material libraries are ignored.
    pub fn from_obj_reader<R: BufRead>(name: impl Into<String>, mut reader: R) -> Result<Self, LoadError> {
        let (models, _materials) = tobj::load_obj_buf(&mut reader, &obj_load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;
        Self::from_models(name.into(), &models)
    }

    fn from_models(name: String, models: &[tobj::Model]) -> Result<Self, LoadError> {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for model in models {
            let m = &model.mesh;
            let base = vertices.len() as u32;
            vertices.extend(
                m.positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2])),
            );

            let uv_at = |corner: usize| -> Vec2 {
                let Some(&ti) = m.texcoord_indices.get(corner) else {
                    return Vec2::ZERO;
                };
                let ti = ti as usize * 2;
                match m.texcoords.get(ti..ti + 2) {
                    Some(t) => Vec2::new(t[0], 1.0 - t[1]),
                    None => Vec2::ZERO,
                }
            };

            for (tri, idx) in m.indices.chunks_exact(3).enumerate() {
                let corner = tri * 3;
                faces.push(Face::new(
                    base + idx[0],
                    base + idx[1],
                    base + idx[2],
                    [uv_at(corner), uv_at(corner + 1), uv_at(corner + 2)],
                    colors::FILL,
                ));
            }
        }

        Self::new(name, vertices, faces)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Sets every face's base color.
    pub fn set_color(&mut self, color: u32) -> &mut Self {
        for face in &mut self.faces {
            face.color = color;
        }
        self
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn set_texture(&mut self, texture: Option<TextureId>) -> &mut Self {
        self.texture = texture;
        self
    }

    /// Vertex positions of a face, in model space.
    pub fn face_vertices(&self, face: &Face) -> [Vec3; 3] {
        face.indices().map(|i| self.vertices[i as usize])
    }
}

fn obj_load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}
