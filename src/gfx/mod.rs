//! # Graphics Module
//!
//! Everything needed to describe and draw a scene:
//!
//! - **Scene graph** ([`scene`]) - arena of groups, meshes and lights with
//!   parent-relative transforms
//! - **Cameras** ([`camera`]) - perspective and orthographic projections and
//!   the orbit controls that drive them
//! - **Geometry** ([`geometry`]) - procedural primitives built from shape records
//! - **Materials** ([`material`]) - basic and Lambert shading, wireframe
//! - **Rendering** ([`rendering`]) - one wgpu renderer per window over a shared device
//! - **Resources** ([`resources`]) - GPU geometry, global uniforms, depth buffer
//!
//! ```rust
//! use orbitview::gfx::{
//!     geometry::BoxParams,
//!     material::Material,
//!     scene::{Mesh, Node, Scene},
//! };
//!
//! let mut scene = Scene::new("main").with_background(0x333333);
//! let cube = scene.add(Node::mesh(
//!     "cube",
//!     Mesh::from_params(BoxParams::default(), Material::basic(0x00ff00).with_wireframe(true)),
//! ));
//! scene.add_axes_helper(5.0);
//! assert_eq!(scene.node(cube).unwrap().name, "cube");
//! ```

pub mod camera;
pub mod geometry;
pub mod material;
pub mod rendering;
pub mod resources;
pub mod scene;
