//! GPU geometry storage
//!
//! Meshes refer to their uploaded buffers through a [`GeometryId`]. The
//! buffers are not reclaimed when a mesh drops its id: whoever replaces a
//! mesh's geometry must call [`GeometryBackend::release`] first.

use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::gfx::geometry::{GeometryData, Topology};

/// Handle to geometry uploaded through a [`GeometryBackend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId {
    index: u32,
    generation: u32,
}

impl GeometryId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

/// Where mesh geometry lives on the GPU side
pub trait GeometryBackend {
    /// Upload geometry and return a handle to it
    fn upload(&mut self, geometry: &GeometryData) -> GeometryId;

    /// Free the buffers behind `id`. Stale ids are ignored.
    fn release(&mut self, id: GeometryId);
}

/// Buffers of one uploaded geometry
pub struct GpuGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    /// Line-list indices of the triangle edges, for wireframe drawing
    pub edge_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub edge_count: u32,
    pub topology: Topology,
}

impl GpuGeometry {
    fn destroy(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.edge_buffer.destroy();
    }
}

struct Slot {
    generation: u32,
    geometry: Option<GpuGeometry>,
}

/// wgpu implementation of [`GeometryBackend`], shared by every renderer
pub struct GpuGeometryStore {
    device: Arc<wgpu::Device>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl GpuGeometryStore {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            device,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn get(&self, id: GeometryId) -> Option<&GpuGeometry> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.geometry.as_ref())
    }

    /// Number of geometries currently holding GPU buffers
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.geometry.is_some()).count()
    }
}

impl GeometryBackend for GpuGeometryStore {
    fn upload(&mut self, geometry: &GeometryData) -> GeometryId {
        let vertices = geometry.to_vertices();
        let edges = geometry.edge_indices();

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let edge_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Edge Index Buffer"),
                contents: bytemuck::cast_slice(&edges),
                usage: wgpu::BufferUsages::INDEX,
            });

        let gpu = GpuGeometry {
            vertex_buffer,
            index_buffer,
            edge_buffer,
            index_count: geometry.indices.len() as u32,
            edge_count: edges.len() as u32,
            topology: geometry.topology,
        };

        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.geometry = Some(gpu);
                GeometryId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    geometry: Some(gpu),
                });
                GeometryId::new(self.slots.len() as u32 - 1, 0)
            }
        }
    }

    fn release(&mut self, id: GeometryId) {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return;
        };
        if slot.generation != id.generation {
            return;
        }
        if let Some(gpu) = slot.geometry.take() {
            gpu.destroy();
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            log::debug!("released geometry {:?}", id);
        }
    }
}

/// Backend that records uploads and releases without touching a GPU.
#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        Upload(GeometryId),
        Release(GeometryId),
    }

    #[derive(Default)]
    pub struct RecordingBackend {
        pub events: Vec<Event>,
        pub live: Vec<GeometryId>,
        next: u32,
    }

    impl GeometryBackend for RecordingBackend {
        fn upload(&mut self, _geometry: &GeometryData) -> GeometryId {
            let id = GeometryId::new(self.next, 0);
            self.next += 1;
            self.live.push(id);
            self.events.push(Event::Upload(id));
            id
        }

        fn release(&mut self, id: GeometryId) {
            self.live.retain(|live| *live != id);
            self.events.push(Event::Release(id));
        }
    }
}
