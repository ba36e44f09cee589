//! View-space frustum planes.
//!
//! Planes are defined by a point and a normal pointing into the visible
//! half-space. A [`Frustum`] is a pure function of the projection parameters;
//! rebuild it when those change, never per triangle.

use crate::math::Vec3;

/// A plane defined by a point on the plane and its inward normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrustumPlane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl FrustumPlane {
    pub const fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// Returns the signed distance from a point to this plane.
    /// Positive = inside (same side as normal), Negative = outside.
    #[inline]
    pub fn signed_distance(&self, position: Vec3) -> f32 {
        (position - self.point).dot(self.normal)
    }
}

/// Index of each plane inside a [`Frustum`]. Also the clipping order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneId {
    Left = 0,
    Right = 1,
    Top = 2,
    Bottom = 3,
    Near = 4,
    Far = 5,
}

impl PlaneId {
    pub const ALL: [PlaneId; 6] = [
        PlaneId::Left,
        PlaneId::Right,
        PlaneId::Top,
        PlaneId::Bottom,
        PlaneId::Near,
        PlaneId::Far,
    ];
}

/// The six clip planes of the visible volume, in view space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    planes: [FrustumPlane; 6],
}

impl Frustum {
    /// Builds a perspective cone with its apex at the camera origin.
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `fov_x` - Horizontal field of view in radians
    /// * `z_near` - Near clipping plane distance
    /// * `z_far` - Far clipping plane distance
    pub fn perspective(fov_y: f32, fov_x: f32, z_near: f32, z_far: f32) -> Self {
        let (sin_x, cos_x) = (fov_x / 2.0).sin_cos();
        let (sin_y, cos_y) = (fov_y / 2.0).sin_cos();
        let origin = Vec3::ZERO;

        Self {
            planes: [
                FrustumPlane::new(origin, Vec3::new(cos_x, 0.0, sin_x)),
                FrustumPlane::new(origin, Vec3::new(-cos_x, 0.0, sin_x)),
                FrustumPlane::new(origin, Vec3::new(0.0, -cos_y, sin_y)),
                FrustumPlane::new(origin, Vec3::new(0.0, cos_y, sin_y)),
                FrustumPlane::new(Vec3::new(0.0, 0.0, z_near), Vec3::FORWARD),
                FrustumPlane::new(Vec3::new(0.0, 0.0, z_far), Vec3::BACK),
            ],
        }
    }

    /// Builds an axis-aligned box for orthographic projection.
    ///
    /// `top` is the larger Y bound (view space is Y-up).
    pub fn orthographic(
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        Self {
            planes: [
                FrustumPlane::new(Vec3::new(left, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
                FrustumPlane::new(Vec3::new(right, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
                FrustumPlane::new(Vec3::new(0.0, top, 0.0), Vec3::new(0.0, -1.0, 0.0)),
                FrustumPlane::new(Vec3::new(0.0, bottom, 0.0), Vec3::new(0.0, 1.0, 0.0)),
                FrustumPlane::new(Vec3::new(0.0, 0.0, z_near), Vec3::FORWARD),
                FrustumPlane::new(Vec3::new(0.0, 0.0, z_far), Vec3::BACK),
            ],
        }
    }

    #[inline]
    pub fn plane(&self, id: PlaneId) -> &FrustumPlane {
        &self.planes[id as usize]
    }

    /// Planes in clipping order: left, right, top, bottom, near, far.
    pub fn planes(&self) -> &[FrustumPlane; 6] {
        &self.planes
    }

    /// True if the point is strictly inside every plane.
    pub fn contains(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.signed_distance(point) > 0.0)
    }
}
