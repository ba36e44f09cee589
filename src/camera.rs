//! Fly camera
//!
//! # Coordinate System
//!
//! Uses a **left-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into screen)
//!
//! The camera looks along `direction`, which is derived from `yaw` (rotation
//! around +Y, positive = look right). The view matrix is a look-at toward
//! `position + direction` with world up.

use crate::math::{Mat4, Vec3};

/// Camera with a position and a yaw-derived view direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    direction: Vec3,
    /// Scratch displacement of the last forward/backward move.
    forward_velocity: Vec3,
    yaw: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// Creates a camera at the given position, looking along +Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            direction: Vec3::FORWARD,
            forward_velocity: Vec3::ZERO,
            yaw: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Returns the normalized view direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn forward_velocity(&self) -> Vec3 {
        self.forward_velocity
    }

    /// Returns the yaw angle in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Sets the yaw angle in radians and recomputes the view direction.
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw.rem_euclid(std::f32::consts::TAU);
        self.direction = Mat4::rotation_y(self.yaw).transform_point(Vec3::FORWARD);
    }

    /// Rotates the camera horizontally (around Y-axis).
    /// Positive values rotate right, negative values rotate left.
    pub fn rotate_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Moves the camera along its view direction.
    pub fn move_forward(&mut self, distance: f32) {
        self.forward_velocity = self.direction * distance;
        self.position = self.position + self.forward_velocity;
    }

    /// Moves the camera along world up.
    pub fn move_up(&mut self, distance: f32) {
        self.position.y += distance;
    }

    /// The point the camera looks at, one unit along its direction.
    pub fn target(&self) -> Vec3 {
        self.position + self.direction
    }

    /// Computes the world-to-camera matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.position, self.target(), Vec3::UP)
    }
}

/// Held movement keys, sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraInput {
    pub forward: bool,
    pub back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub up: bool,
    pub down: bool,
}

/// Speeds used to turn [`CameraInput`] into camera motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    /// Movement speed in units per second.
    pub move_speed: f32,
    /// Turn speed in radians per second.
    pub turn_speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            turn_speed: 1.0,
        }
    }
}

impl CameraController {
    /// Updates the camera based on input state.
    ///
    /// # Input Mapping
    /// - W/S: Move forward/backward
    /// - A/D: Turn left/right
    /// - Up/Down: Move up/down
    pub fn update(&self, camera: &mut Camera, input: &CameraInput, delta_time: f32) {
        let move_amount = self.move_speed * delta_time;
        let turn_amount = self.turn_speed * delta_time;

        if input.forward {
            camera.move_forward(move_amount);
        }
        if input.back {
            camera.move_forward(-move_amount);
        }
        if input.turn_right {
            camera.rotate_yaw(turn_amount);
        }
        if input.turn_left {
            camera.rotate_yaw(-turn_amount);
        }
        if input.up {
            camera.move_up(move_amount);
        }
        if input.down {
            camera.move_up(-move_amount);
        }
    }
}
