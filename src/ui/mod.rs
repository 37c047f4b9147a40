//! # User Interface
//!
//! Dear ImGui overlays drawn on the primary window:
//!
//! - [`UiManager`] glues ImGui to winit and wgpu
//! - [`DebugPanel`] shows folders of controls bound to the world; its edits
//!   are queued and applied at the start of the next tick
//! - [`bindings`] builds controls for the common fields
//!
//! ```no_run
//! use orbitview::ui::{bindings, DebugPanel};
//! # let (scene, cube) = (orbitview::gfx::scene::SceneId(0), orbitview::gfx::scene::NodeId(0));
//!
//! let mut panel = DebugPanel::new("Debug");
//! panel.add_folder(bindings::transform_folder("Cube", scene, cube));
//! ```

pub mod bindings;
pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{Control, ControlId, DebugPanel, EditPhase, Folder, PanelEdit, Value};
