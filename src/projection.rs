//! Projection parameters and the screen-space projector.
//!
//! [`Projection`] is the single source of truth for the projection mode and
//! its parameters. It derives both the projection matrix and the view-space
//! [`Frustum`] used for clipping, so the two can never disagree.

use crate::clipper::Frustum;
use crate::math::{Mat4, Vec3, Vec4};

/// Added to `1 - z` when synthesizing `w` in orthographic mode, keeping the
/// reciprocal finite at the far plane.
pub const ORTHO_DEPTH_EPSILON: f32 = 1e-4;

/// Projection mode, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    Perspective,
    Orthographic,
}

/// Projection mode and parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width divided by height.
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        z_near: f32,
        z_far: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Self::from_degrees(60.0, 4.0 / 3.0, 0.1, 100.0)
    }
}

impl Projection {
    /// Creates a perspective projection.
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near clipping plane distance (must be > 0)
    /// * `z_far` - Far clipping plane distance (must be > z_near)
    pub fn perspective(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::Perspective {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Creates a perspective projection from degrees instead of radians.
    pub fn from_degrees(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::perspective(fov_y_degrees.to_radians(), aspect_ratio, z_near, z_far)
    }

    /// Creates an orthographic projection of an explicit view-space box.
    pub fn orthographic(
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        Self::Orthographic {
            left,
            right,
            top,
            bottom,
            z_near,
            z_far,
        }
    }

    /// Creates an orthographic box centred on the view axis, `height` units
    /// tall and `height * aspect_ratio` wide.
    pub fn orthographic_fit(height: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        let half_h = height / 2.0;
        let half_w = half_h * aspect_ratio;
        Self::orthographic(-half_w, half_w, half_h, -half_h, z_near, z_far)
    }

    pub fn kind(&self) -> ProjectionKind {
        match self {
            Self::Perspective { .. } => ProjectionKind::Perspective,
            Self::Orthographic { .. } => ProjectionKind::Orthographic,
        }
    }

    /// Returns the horizontal field of view in radians, for perspective mode.
    ///
    /// Computed from the vertical FOV and aspect ratio.
    pub fn fov_x(&self) -> Option<f32> {
        match *self {
            Self::Perspective {
                fov_y,
                aspect_ratio,
                ..
            } => Some(2.0 * (aspect_ratio * (fov_y / 2.0).tan()).atan()),
            Self::Orthographic { .. } => None,
        }
    }

    pub fn z_near(&self) -> f32 {
        match *self {
            Self::Perspective { z_near, .. } | Self::Orthographic { z_near, .. } => z_near,
        }
    }

    pub fn z_far(&self) -> f32 {
        match *self {
            Self::Perspective { z_far, .. } | Self::Orthographic { z_far, .. } => z_far,
        }
    }

    /// Updates the aspect ratio (typically called on window resize).
    ///
    /// For orthographic boxes the vertical extent is kept and the horizontal
    /// extent is recomputed around its centre.
    pub fn set_aspect_ratio(&mut self, new_aspect: f32) {
        match self {
            Self::Perspective { aspect_ratio, .. } => *aspect_ratio = new_aspect,
            Self::Orthographic {
                left,
                right,
                top,
                bottom,
                ..
            } => {
                let centre = (*left + *right) / 2.0;
                let half_w = (*top - *bottom).abs() / 2.0 * new_aspect;
                *left = centre - half_w;
                *right = centre + half_w;
            }
        }
    }

    /// Generates the projection matrix.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Self::Perspective {
                fov_y,
                aspect_ratio,
                z_near,
                z_far,
            } => Mat4::perspective_lh(fov_y, aspect_ratio, z_near, z_far),
            Self::Orthographic {
                left,
                right,
                top,
                bottom,
                z_near,
                z_far,
            } => Mat4::orthographic_lh(left, right, bottom, top, z_near, z_far),
        }
    }

    /// Builds the view-space clipping volume matching this projection.
    pub fn frustum(&self) -> Frustum {
        match *self {
            Self::Perspective {
                fov_y,
                z_near,
                z_far,
                ..
            } => {
                let fov_x = self.fov_x().unwrap_or(fov_y);
                Frustum::perspective(fov_y, fov_x, z_near, z_far)
            }
            Self::Orthographic {
                left,
                right,
                top,
                bottom,
                z_near,
                z_far,
            } => Frustum::orthographic(left, right, top, bottom, z_near, z_far),
        }
    }

    /// Creates a projector for a viewport of the given size.
    pub fn projector(&self, width: u32, height: u32) -> Projector {
        Projector {
            matrix: self.matrix(),
            kind: self.kind(),
            half_width: width as f32 / 2.0,
            half_height: height as f32 / 2.0,
        }
    }
}

/// Maps clipped camera-space vertices to screen space.
///
/// Output vertices are `(screen_x, screen_y, ndc_z, w)`. `w` is kept for
/// perspective-correct interpolation: the view depth in perspective mode,
/// a value synthesized from depth in orthographic mode so that `1 - 1/w`
/// stays a usable depth-buffer key in both.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    matrix: Mat4,
    kind: ProjectionKind,
    half_width: f32,
    half_height: f32,
}

impl Projector {
    /// Projects a camera-space point.
    ///
    /// Returns `None` for a perspective vertex at or behind the eye, which
    /// can only happen if the vertex skipped near-plane clipping.
    pub fn project(&self, point: Vec3) -> Option<Vec4> {
        let clip = self.matrix * Vec4::from(point);

        let (ndc, w) = match self.kind {
            ProjectionKind::Perspective => {
                if clip.w <= f32::EPSILON {
                    return None;
                }
                (clip.to_vec3() / clip.w, clip.w)
            }
            ProjectionKind::Orthographic => {
                let w = 1.0 / ((1.0 - clip.z) + ORTHO_DEPTH_EPSILON);
                (clip.to_vec3(), w)
            }
        };

        // Flip Y: screen space grows downward
        let x = ndc.x * self.half_width + self.half_width;
        let y = -ndc.y * self.half_height + self.half_height;
        Some(Vec4::new(x, y, ndc.z, w))
    }
}
