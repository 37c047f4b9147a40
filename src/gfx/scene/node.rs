use cgmath::{Matrix4, Rad, Vector3};

use crate::gfx::{
    geometry::{GeometryData, GeometryParams},
    material::Material,
    resources::geometry_store::{GeometryBackend, GeometryId},
};

use super::light::Light;

/// Index of a node within its [`Scene`](super::Scene)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Parent-relative position, Euler rotation (XYZ order, radians) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// T * Rx * Ry * Rz * S
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s // Order matters: T * R * S
    }
}

/// Renderable geometry plus its material
pub struct Mesh {
    pub geometry: GeometryData,
    /// Live shape record, edited by the debug panel and read on regeneration
    pub shape: Option<GeometryParams>,
    pub material: Material,
    gpu: Option<GeometryId>,
}

impl Mesh {
    pub fn new(geometry: GeometryData, material: Material) -> Self {
        Self {
            geometry,
            shape: None,
            material,
            gpu: None,
        }
    }

    /// Build from a shape record and keep the record for regeneration
    pub fn from_params(params: impl Into<GeometryParams>, material: Material) -> Self {
        let params = params.into();
        Self {
            geometry: params.build(),
            shape: Some(params),
            material,
            gpu: None,
        }
    }

    /// Handle of the uploaded geometry, if any
    pub fn gpu_geometry(&self) -> Option<GeometryId> {
        self.gpu
    }

    /// Upload the current geometry if it has no GPU buffers yet
    pub fn ensure_uploaded(&mut self, backend: &mut dyn GeometryBackend) -> GeometryId {
        match self.gpu {
            Some(id) => id,
            None => {
                let id = backend.upload(&self.geometry);
                self.gpu = Some(id);
                id
            }
        }
    }

    /// Swap in new geometry.
    ///
    /// The old GPU buffers are released before the new geometry is assigned.
    pub fn replace_geometry(&mut self, geometry: GeometryData, backend: &mut dyn GeometryBackend) {
        if let Some(old) = self.gpu.take() {
            backend.release(old);
        }
        self.gpu = Some(backend.upload(&geometry));
        self.geometry = geometry;
    }

    /// Release GPU buffers; the CPU-side geometry is kept
    pub fn release(&mut self, backend: &mut dyn GeometryBackend) {
        if let Some(id) = self.gpu.take() {
            backend.release(id);
        }
    }
}

pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Light(Light),
}

/// A scene graph node
pub struct Node {
    pub name: String,
    pub transform: Transform,
    /// Hides this node and its whole subtree
    pub visible: bool,
    pub kind: NodeKind,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl Node {
    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            visible: true,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self::with_kind(name, NodeKind::Mesh(mesh))
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::with_kind(name, NodeKind::Light(light))
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.scale = Vector3::new(x, y, z);
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }
}
