//! # Procedural Geometry Generation
//!
//! Builds the primitive shapes used by the demos (box, sphere, icosahedron,
//! torus knot, plane) from plain parameter records, plus the line geometry
//! of the axes helper.
//!
//! ## Usage
//!
//! ```rust
//! use orbitview::gfx::geometry::{BoxParams, GeometryParams};
//!
//! let params = GeometryParams::Box(BoxParams { width: 2.0, ..Default::default() });
//! let geometry = params.build();
//! assert_eq!(geometry.parameters, Some(params));
//! ```

pub mod params;
pub mod primitives;

use std::collections::HashSet;

pub use params::*;
pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// How the index list is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Lines,
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex colours. Empty means white.
    pub colors: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding) or line pairs
    pub indices: Vec<u32>,
    pub topology: Topology,
    /// The record this geometry was built from, if any.
    pub parameters: Option<GeometryParams>,
}

impl GeometryData {
    /// Create a new empty triangle geometry
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
            topology: Topology::Triangles,
            parameters: None,
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::Lines => 0,
        }
    }

    /// Interleave into the vertex format used by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                color: self.colors.get(i).copied().unwrap_or([1.0, 1.0, 1.0]),
            })
            .collect()
    }

    /// Line-list indices of every unique triangle edge, in first-seen order.
    ///
    /// Line geometry is returned unchanged.
    pub fn edge_indices(&self) -> Vec<u32> {
        if self.topology == Topology::Lines {
            return self.indices.clone();
        }

        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.push(a);
                    edges.push(b);
                }
            }
        }
        edges
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
