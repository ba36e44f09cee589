//! Lighting types for the renderer.

use crate::colors;
use crate::math::Vec3;

/// Lowest intensity a lit face can receive, so faces turned away from the
/// light stay visible.
pub const DEFAULT_AMBIENT_FLOOR: f32 = 0.1;

/// A directional light that illuminates the scene uniformly from a direction.
///
/// Directional lights are ideal for simulating distant light sources like the sun,
/// where all rays are effectively parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// The normalized direction the light is pointing (not where it comes from).
    pub direction: Vec3,
    pub ambient_floor: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::FORWARD)
    }
}

impl DirectionalLight {
    /// Create a new directional light pointing in the given direction.
    /// The direction will be normalized automatically.
    pub fn new(direction: Vec3) -> Self {
        DirectionalLight {
            direction: direction.try_normalize().unwrap_or(Vec3::FORWARD),
            ambient_floor: DEFAULT_AMBIENT_FLOOR,
        }
    }

    /// Calculate light intensity for flat shading.
    ///
    /// Returns `max(-direction . normal, ambient_floor)`, capped at 1.0. A
    /// floor above 1.0 lights every face fully; a NaN floor is ignored.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        // Negate direction: light pointing at surface = positive dot product
        (-self.direction)
            .dot(normal)
            .max(self.ambient_floor)
            .min(1.0)
    }

    /// Flat-shades a base color for a face with the given unit normal.
    pub fn shade(&self, color: u32, normal: Vec3) -> u32 {
        colors::scale(color, self.intensity(normal))
    }
}
