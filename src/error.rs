//! Error types.
//!
//! Degenerate geometry and numeric edge cases are not errors: the pipeline
//! skips the face, triangle, or pixel. What remains here are load failures and
//! capacity overflows, which indicate bad input files or a pipeline bug.

use thiserror::Error;

/// Failure to load a mesh or texture from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("failed to decode texture: {0}")]
    Image(#[from] image::ImageError),

    #[error("texture buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    TextureSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("mesh '{0}' has no faces")]
    EmptyMesh(String),

    #[error("face {face} references vertex {index}, but mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// A clipped polygon outgrew its fixed vertex storage.
///
/// Clipping a convex polygon against one plane adds at most one vertex, so a
/// triangle never needs more than `3 + 6` slots. Hitting this means the input
/// was not convex or the clipper is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClipError {
    #[error("clipped polygon exceeds {capacity} vertices")]
    VertexOverflow { capacity: usize },
}

/// Per-frame rendering failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("render list is full ({max} triangles); remaining faces were dropped")]
    TriangleCapacity { max: usize },
}
