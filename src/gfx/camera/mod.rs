//! Cameras and orbit controls
//!
//! Cameras live in the [`World`](crate::world::World) and are referenced by
//! [`CameraId`]. [`OrbitControls`] are attached to a viewport and steer one
//! camera from mouse input.

pub mod camera;
pub mod camera_utils;
pub mod orbit_controls;

pub use camera::{Camera, CameraId, Projection};
pub use camera_utils::{CameraUniform, OPENGL_TO_WGPU_MATRIX};
pub use orbit_controls::{OrbitBounds, OrbitControls};
