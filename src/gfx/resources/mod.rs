//! GPU resource management
//!
//! Geometry buffers, depth textures and the global uniform bindings.

pub mod geometry_store;
pub mod global_bindings;
pub mod texture_resource;

pub use geometry_store::{GeometryBackend, GeometryId, GpuGeometry, GpuGeometryStore};
pub use global_bindings::{GlobalBindings, GlobalUBO, SceneLights};
pub use texture_resource::TextureResource;
