//! Orbit camera state around the board center
//!
//! The renderer owns the actual camera; the controller only holds a
//! [`CameraHandle`] to it. Handles are never serialized, so every controller
//! built from a snapshot or a save file starts unbound and has to be given a
//! handle again with [`PointCameraController::bind`].

use serde::{Deserialize, Serialize};

const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 30.0;
const MAX_PITCH: f32 = 90.0;
const MOVE_SPEED: f32 = 50.0;
const FRICTION: f32 = 0.8;

/// Opaque reference to a renderer-side camera
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CameraHandle(pub u32);

/// Serializable orientation of the orbit camera
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub sensitivity: f32,
    pub position: [f32; 3],
    pub pitch: f32,
    pub yaw: f32,
    pub point: [f32; 3],
    pub distance_to_point: f32,
    pub angle_around_point: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        let mut state = Self {
            sensitivity: 1.0,
            position: [0.0; 3],
            pitch: 47.0,
            yaw: 0.0,
            point: [0.0; 3],
            distance_to_point: 8.0,
            angle_around_point: 0.0,
        };
        state.recompute_position();
        state
    }
}

impl CameraState {
    /// Derive position and yaw from the orbit parameters
    fn recompute_position(&mut self) {
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        let horizontal = self.distance_to_point * pitch_cos;
        let vertical = self.distance_to_point * pitch_sin;
        let (angle_sin, angle_cos) = self.angle_around_point.to_radians().sin_cos();

        self.position = [
            self.point[0] - horizontal * angle_sin,
            self.point[1] + vertical,
            self.point[2] - horizontal * angle_cos,
        ];
        self.yaw = 180.0 - self.angle_around_point;
    }

    /// Orbit angle folded into `[0, 360)`
    pub fn normalized_angle(&self) -> f32 {
        self.angle_around_point.rem_euclid(360.0)
    }
}

/// Per-frame camera input
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraInput {
    pub mouse_wheel: f32,
    /// Mouse drag since last frame, only applied while `dragging`
    pub dx: f32,
    pub dy: f32,
    pub dragging: bool,
    /// -1, 0 or 1 on each axis from the keyboard
    pub horizontal: f32,
    pub vertical: f32,
}

/// Orbit controller bound to a renderer camera
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCameraController {
    state: CameraState,
    velocity: [f32; 3],
    camera: Option<CameraHandle>,
}

impl PointCameraController {
    pub fn new(state: CameraState) -> Self {
        Self { state, velocity: [0.0; 3], camera: None }
    }

    /// Attach the renderer camera this controller drives
    pub fn bind(&mut self, camera: CameraHandle) {
        self.camera = Some(camera);
    }

    pub fn camera(&self) -> Option<CameraHandle> {
        self.camera
    }

    pub fn is_bound(&self) -> bool {
        self.camera.is_some()
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Replace the orientation with a snapshot; the current binding is kept
    pub fn restore(&mut self, state: CameraState) {
        self.state = state;
        self.velocity = [0.0; 3];
        if self.camera.is_none() {
            tracing::debug!("camera state restored on an unbound controller");
        }
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.state.sensitivity = sensitivity;
    }

    /// Integrate one frame of input
    pub fn update(&mut self, input: &CameraInput, dt: f32) {
        let state = &mut self.state;
        let [velocity_x, velocity_y, velocity_zoom] = &mut self.velocity;

        let zoom_speed = 1.05 * state.distance_to_point;
        *velocity_zoom -= zoom_speed * input.mouse_wheel * 1.25 * dt;
        state.distance_to_point = (state.distance_to_point + *velocity_zoom).clamp(MIN_DISTANCE, MAX_DISTANCE);

        if input.dragging {
            *velocity_y -= MOVE_SPEED * 0.3 * state.sensitivity * input.dy * dt;
            *velocity_x += MOVE_SPEED * 0.3 * state.sensitivity * input.dx * dt;
        }
        *velocity_y += MOVE_SPEED * input.vertical * dt;
        *velocity_x += MOVE_SPEED * input.horizontal * dt;

        state.pitch = (state.pitch + *velocity_y).clamp(-MAX_PITCH, MAX_PITCH);
        state.angle_around_point += *velocity_x;

        *velocity_x *= FRICTION;
        *velocity_y *= FRICTION;
        *velocity_zoom *= FRICTION;

        state.recompute_position();
    }
}
