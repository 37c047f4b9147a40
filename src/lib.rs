//! orbitview
//!
//! A small 3D scene playground on wgpu and winit: scene graphs, perspective
//! and orthographic cameras, orbit controls, several windows sharing one GPU
//! device, and an ImGui debug panel bound to live scene fields.

pub mod app;
pub mod config;
pub mod error;
pub mod frame;
pub mod gfx;
pub mod performance;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;
pub mod world;

pub use app::{OrbitviewApp, ResizePolicy, ViewportConfig};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use world::World;
