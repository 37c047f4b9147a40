//! Crate-level error type.

use std::path::PathBuf;

use crate::gfx::camera::CameraId;
use crate::gfx::scene::{NodeId, SceneId};

/// Errors produced by orbitview.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to create window surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("unknown scene {0:?}")]
    UnknownScene(SceneId),

    #[error("unknown camera {0:?}")]
    UnknownCamera(CameraId),

    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("node {0:?} is not a mesh")]
    NotAMesh(NodeId),

    #[error("making {child:?} a child of {parent:?} would create a cycle")]
    HierarchyCycle { child: NodeId, parent: NodeId },

    #[error("node {0:?} has no shape parameters to regenerate from")]
    NotParametric(NodeId),

    #[error("viewport '{0}' has no window; the app has not been resumed")]
    NoWindow(String),
}

pub type Result<T> = std::result::Result<T, Error>;
