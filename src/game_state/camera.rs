//! # Camera
//!
//! First-person camera kinematics: position, yaw and pitch, moved by a
//! controller that accumulates input between ticks. The camera has no
//! rendering responsibilities here; its position feeds the streaming
//! scheduler and its forward vector feeds block targeting.

use cgmath::*;
use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use super::KeyInput;

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Represents a first-person camera in 3D space.
#[derive(Debug)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial position of the camera in world space
    /// * `yaw` - Initial yaw (horizontal rotation around Y axis)
    /// * `pitch` - Initial pitch (vertical rotation around X axis)
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Gets the camera's forward direction vector.
    ///
    /// # Returns
    /// A normalized 3D vector pointing in the direction the camera is facing
    pub fn forward(&self) -> Vector3<f32> {
        Vector3::new(
            self.pitch.cos() * self.yaw.cos(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.sin(),
        )
        .normalize()
    }

    /// Updates the camera's position and orientation from controller input.
    ///
    /// # Arguments
    /// * `controller` - The camera controller containing accumulated input
    /// * `dt` - Time elapsed since the last update
    pub fn update(&mut self, controller: &mut CameraController, dt: Duration) {
        let dt = dt.as_secs_f32();

        // Move forward/backward and left/right on the ground plane
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        self.position += forward
            * (controller.amount_forward - controller.amount_backward)
            * controller.speed
            * dt;
        self.position +=
            right * (controller.amount_right - controller.amount_left) * controller.speed * dt;

        // Move in/out along the view direction (scroll zoom)
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        let scrollward =
            Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize();
        self.position +=
            scrollward * controller.scroll * controller.speed * controller.sensitivity * dt;
        controller.scroll = 0.0;

        // Move up/down
        self.position.y += (controller.amount_up - controller.amount_down) * controller.speed * dt;

        // Rotate
        self.yaw += Rad(controller.rotate_horizontal) * controller.sensitivity * dt;
        self.pitch += Rad(-controller.rotate_vertical) * controller.sensitivity * dt;

        // Rotation deltas are consumed; movement amounts persist until the
        // key is released.
        controller.rotate_horizontal = 0.0;
        controller.rotate_vertical = 0.0;

        // Clamp pitch to prevent gimbal lock
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}

/// Handles camera movement and rotation based on user input.
///
/// This struct tracks the current state of movement keys and mouse input,
/// and applies them to the camera when updated.
#[derive(Debug)]
pub struct CameraController {
    // Movement amounts (normalized)
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,

    // Rotation amounts (in radians)
    rotate_horizontal: f32,
    rotate_vertical: f32,

    // Zoom/scroll amount
    scroll: f32,

    // Configuration
    speed: f32,
    sensitivity: f32,
}

impl CameraController {
    /// Creates a new camera controller with the given speed and sensitivity.
    ///
    /// # Arguments
    /// * `speed` - Base movement speed in units per second
    /// * `sensitivity` - Mouse look sensitivity multiplier
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            scroll: 0.0,
            speed,
            sensitivity,
        }
    }

    /// Records a movement key press or release.
    pub fn process_key(&mut self, key: KeyInput, pressed: bool) {
        let amount = if pressed { 1.0 } else { 0.0 };
        match key {
            KeyInput::MoveForward => self.amount_forward = amount,
            KeyInput::MoveBackward => self.amount_backward = amount,
            KeyInput::StrafeLeft => self.amount_left = amount,
            KeyInput::StrafeRight => self.amount_right = amount,
            KeyInput::Ascend => self.amount_up = amount,
            KeyInput::Descend => self.amount_down = amount,
            KeyInput::Hotbar(_) => {}
        }
    }

    /// Accumulates a mouse movement delta.
    pub fn process_mouse(&mut self, delta_x: f64, delta_y: f64) {
        self.rotate_horizontal += delta_x as f32;
        self.rotate_vertical += delta_y as f32;
    }

    /// Accumulates a scroll delta.
    pub fn process_scroll(&mut self, delta: f64) {
        self.scroll += delta as f32;
    }
}
