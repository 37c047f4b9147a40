//! Core rendering functionality
//!
//! Draw lists, render pipelines and the per-window renderer.

pub mod draw_list;
pub mod pipeline_manager;
pub mod render_engine;

pub use draw_list::{collect_draws, DrawItem, DrawMode, ObjectUniform};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{GpuContext, Renderer};
