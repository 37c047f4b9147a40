use cgmath::{InnerSpace, Vector3};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use super::camera::{Camera, CameraId};

#[derive(Debug, Clone, Copy)]
pub struct OrbitBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for OrbitBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: None,
            min_pitch: -std::f32::consts::FRAC_PI_2 + 1e-3,
            max_pitch: std::f32::consts::FRAC_PI_2 - 1e-3,
            min_zoom: 0.01,
            max_zoom: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Rotate,
    Pan,
}

/// Orbit, pan and zoom a camera around a target with the mouse.
///
/// Window events only accumulate input; [`OrbitControls::apply`] moves the
/// camera once per tick.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub camera: CameraId,
    pub target: Vector3<f32>,
    pub enabled: bool,
    /// Radians per pixel
    pub rotate_speed: f32,
    /// Fraction of the distance per wheel line
    pub zoom_speed: f32,
    /// Fraction of the distance per pixel
    pub pan_speed: f32,
    pub bounds: OrbitBounds,
    drag: Option<DragMode>,
    shift_held: bool,
    cursor: Option<PhysicalPosition<f64>>,
    pending_rotate: (f32, f32),
    pending_pan: (f32, f32),
    pending_zoom: f32,
}

impl OrbitControls {
    pub fn new(camera: CameraId) -> Self {
        Self {
            camera,
            target: Vector3::new(0.0, 0.0, 0.0),
            enabled: true,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.002,
            bounds: OrbitBounds::default(),
            drag: None,
            shift_held: false,
            cursor: None,
            pending_rotate: (0.0, 0.0),
            pending_pan: (0.0, 0.0),
            pending_zoom: 0.0,
        }
    }

    pub fn with_target(mut self, x: f32, y: f32, z: f32) -> Self {
        self.target = Vector3::new(x, y, z);
        self
    }

    /// Accumulate input from a window event. Returns true if the event moved
    /// the camera and a redraw is wanted.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_held = modifiers.state().shift_key();
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                match (state, button) {
                    (ElementState::Pressed, MouseButton::Left) if self.enabled => {
                        self.drag = Some(if self.shift_held {
                            DragMode::Pan
                        } else {
                            DragMode::Rotate
                        });
                    }
                    (ElementState::Pressed, MouseButton::Right) if self.enabled => {
                        self.drag = Some(DragMode::Pan);
                    }
                    (ElementState::Released, MouseButton::Left | MouseButton::Right) => {
                        self.drag = None;
                    }
                    _ => {}
                }
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                let previous = self.cursor.replace(*position);
                let (Some(previous), Some(mode)) = (previous, self.drag) else {
                    return false;
                };
                let dx = (position.x - previous.x) as f32;
                let dy = (position.y - previous.y) as f32;
                self.push_drag(mode, dx, dy);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                false
            }
            WindowEvent::MouseWheel { delta, .. } if self.enabled => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 40.0,
                };
                self.pending_zoom += lines;
                true
            }
            _ => false,
        }
    }

    fn push_drag(&mut self, mode: DragMode, dx: f32, dy: f32) {
        match mode {
            DragMode::Rotate => {
                self.pending_rotate.0 += dx;
                self.pending_rotate.1 += dy;
            }
            DragMode::Pan => {
                self.pending_pan.0 += dx;
                self.pending_pan.1 += dy;
            }
        }
    }

    /// Queue a drag of `dx`, `dy` pixels
    pub fn rotate_by(&mut self, dx: f32, dy: f32) {
        self.push_drag(DragMode::Rotate, dx, dy);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.push_drag(DragMode::Pan, dx, dy);
    }

    /// Queue wheel lines; positive zooms in
    pub fn zoom_by(&mut self, lines: f32) {
        self.pending_zoom += lines;
    }

    pub fn has_pending_input(&self) -> bool {
        self.pending_rotate != (0.0, 0.0) || self.pending_pan != (0.0, 0.0) || self.pending_zoom != 0.0
    }

    /// Drop any accumulated input and drag state
    pub fn cancel(&mut self) {
        self.drag = None;
        self.cancel_pending();
    }

    /// Move the camera by the input accumulated since the last call.
    ///
    /// Returns false, leaving the camera untouched, when there was none.
    pub fn apply(&mut self, camera: &mut Camera) -> bool {
        if !self.enabled || !self.has_pending_input() {
            self.cancel_pending();
            return false;
        }
        let (rx, ry) = std::mem::take(&mut self.pending_rotate);
        let (px, py) = std::mem::take(&mut self.pending_pan);
        let zoom = std::mem::take(&mut self.pending_zoom);

        let offset = camera.position - self.target;
        let mut distance = offset.magnitude();
        if distance < f32::EPSILON {
            distance = 1.0;
        }
        let mut yaw = offset.x.atan2(offset.z);
        let mut pitch = offset.y.atan2(offset.x.hypot(offset.z));

        yaw -= rx * self.rotate_speed;
        pitch = (pitch + ry * self.rotate_speed).clamp(self.bounds.min_pitch, self.bounds.max_pitch);

        let scale = (1.0 - self.zoom_speed).powf(zoom);
        if camera.is_perspective() {
            distance = (distance * scale).clamp(
                self.bounds.min_distance.unwrap_or(f32::EPSILON),
                self.bounds.max_distance.unwrap_or(f32::MAX),
            );
        } else if zoom != 0.0 {
            camera.zoom = (camera.zoom / scale).clamp(self.bounds.min_zoom, self.bounds.max_zoom);
            camera.update_projection_matrix();
        }

        let direction = Vector3::new(yaw.sin() * pitch.cos(), pitch.sin(), yaw.cos() * pitch.cos());

        if (px, py) != (0.0, 0.0) {
            let forward = -direction;
            let right = forward.cross(Vector3::unit_y()).normalize();
            let up = right.cross(forward).normalize();
            let pan_scale = if camera.is_perspective() {
                distance * self.pan_speed
            } else {
                self.pan_speed * 5.0 / camera.zoom
            };
            self.target += (-right * px + up * py) * pan_scale;
        }

        camera.position = self.target + direction * distance;
        camera.look_at(self.target);
        true
    }

    fn cancel_pending(&mut self) {
        self.pending_rotate = (0.0, 0.0);
        self.pending_pan = (0.0, 0.0);
        self.pending_zoom = 0.0;
    }
}
