//! # Scene Graph
//!
//! Scenes hold a tree of [`Node`]s. Each node has a transform relative to its
//! parent and is a group, a [`Mesh`] or a [`Light`].
//!
//! ```no_run
//! use orbitview::gfx::{
//!     geometry::BoxParams,
//!     material::Material,
//!     scene::{Mesh, Node, Scene},
//! };
//!
//! let mut scene = Scene::new("main");
//! let cube = scene.add(Node::mesh(
//!     "cube",
//!     Mesh::from_params(BoxParams::default(), Material::basic(0x00ff00)),
//! ));
//! assert!(scene.world_position(cube).is_ok());
//! ```

pub mod light;
pub mod node;
pub mod scene;
pub mod vertex;

pub use light::Light;
pub use node::{Mesh, Node, NodeId, NodeKind, Transform};
pub use scene::{Scene, SceneId};
pub use vertex::Vertex3D;
