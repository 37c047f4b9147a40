//! # Prelude
//!
//! The types most demos need in one import:
//!
//! ```rust
//! use orbitview::prelude::*;
//!
//! let mut app = OrbitviewApp::new(AppConfig::default());
//! let scene = app.add_scene(Scene::new("main"));
//! let camera = app.add_camera(Camera::perspective("main", 75.0, 1.0, 0.1, 1000.0));
//! app.add_viewport(ViewportConfig::new("main", scene, camera));
//! ```

pub use crate::app::{OrbitviewApp, ResizePolicy, ViewportConfig};
pub use crate::config::AppConfig;
pub use crate::error::{Error, Result};
pub use crate::frame::{format_matrix, format_position_block, join_blocks, position_report, FrameContext, Spin};
pub use crate::gfx::camera::{Camera, CameraId, OrbitControls};
pub use crate::gfx::geometry::{
    BoxParams, GeometryParams, IcosahedronParams, PlaneParams, SphereParams, TorusKnotParams,
};
pub use crate::gfx::material::Material;
pub use crate::gfx::scene::{Light, Mesh, Node, NodeId, Scene, SceneId};
pub use crate::ui::bindings::{self, Axis};
pub use crate::ui::{Control, DebugPanel, Folder};
pub use crate::world::World;
