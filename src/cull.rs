//! Backface culling in camera space.

use crate::math::Vec3;
use crate::projection::ProjectionKind;

/// Which faces are dropped before clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    /// Draw every face regardless of winding.
    None,
    /// Drop faces whose normal points away from the camera.
    #[default]
    Backface,
}

/// Unit normal of a camera-space face, `normalize(cross(v1 - v0, v2 - v0))`.
///
/// Returns `None` for collinear or collapsed vertices.
pub fn face_normal(vertices: &[Vec3; 3]) -> Option<Vec3> {
    let [v0, v1, v2] = *vertices;
    (v1 - v0).cross(v2 - v0).try_normalize()
}

/// True if the face points away from the camera.
///
/// The camera ray runs from the first vertex back to the eye at the origin in
/// perspective mode, and is the constant `-Z` direction in orthographic mode.
pub fn is_back_facing(vertices: &[Vec3; 3], normal: Vec3, kind: ProjectionKind) -> bool {
    let camera_ray = match kind {
        ProjectionKind::Perspective => Vec3::ZERO - vertices[0],
        ProjectionKind::Orthographic => Vec3::BACK,
    };
    normal.dot(camera_ray) < 0.0
}

impl CullMode {
    /// Applies the mode: true if the face should be skipped.
    pub fn rejects(self, vertices: &[Vec3; 3], normal: Vec3, kind: ProjectionKind) -> bool {
        match self {
            CullMode::None => false,
            CullMode::Backface => is_back_facing(vertices, normal, kind),
        }
    }
}
