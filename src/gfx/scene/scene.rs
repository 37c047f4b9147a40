use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};

use crate::{
    error::{Error, Result},
    gfx::{
        geometry::generate_axes,
        material::Material,
        resources::geometry_store::GeometryBackend,
    },
};

use super::node::{Mesh, Node, NodeId};

/// Index of a scene within the [`World`](crate::world::World)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(pub usize);

/// A scene graph: an arena of nodes with parent-relative transforms
///
/// Nodes without a parent are children of the scene root. A node belongs to
/// exactly one scene.
pub struct Scene {
    pub name: String,
    /// Clear colour; falls back to the app's configured clear colour
    pub background: Option<[f32; 3]>,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: None,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn with_background(mut self, hex: u32) -> Self {
        self.background = Some(crate::gfx::material::hex_to_rgb(hex));
        self
    }

    /// Add a node under the scene root
    pub fn add(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        self.roots.push(id);
        id
    }

    /// Add a node as a child of `parent`
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.add(node);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Add an axes helper under the scene root
    pub fn add_axes_helper(&mut self, size: f32) -> NodeId {
        self.add(Self::axes_helper(size))
    }

    pub fn axes_helper(size: f32) -> Node {
        Node::mesh(
            "AxesHelper",
            Mesh::new(generate_axes(size), Material::basic(0xffffff).with_vertex_colors()),
        )
    }

    /// Re-parent `child`; `None` moves it back under the scene root.
    ///
    /// The child keeps its local transform.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<()> {
        self.node(child)?;
        if let Some(parent) = parent {
            self.node(parent)?;
            if self.is_ancestor_or_self(child, parent) {
                return Err(Error::HierarchyCycle { child, parent });
            }
        }

        match self.nodes[child.0].parent.take() {
            Some(old) => self.nodes[old.0].children.retain(|c| *c != child),
            None => self.roots.retain(|c| *c != child),
        }

        match parent {
            Some(parent) => {
                self.nodes[parent.0].children.push(child);
                self.nodes[child.0].parent = Some(parent);
            }
            None => self.roots.push(child),
        }
        Ok(())
    }

    /// True if `ancestor` is `node` or one of its ancestors
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(Error::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(Error::UnknownNode(id))
    }

    pub fn mesh_mut(&mut self, id: NodeId) -> Result<&mut Mesh> {
        self.node_mut(id)?
            .as_mesh_mut()
            .ok_or(Error::NotAMesh(id))
    }

    /// First node with the given name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Parent-to-root composition of local transforms
    pub fn world_matrix(&self, id: NodeId) -> Result<Matrix4<f32>> {
        let mut matrix = self.node(id)?.transform.matrix();
        let mut parent = self.nodes[id.0].parent;
        while let Some(p) = parent {
            let node = &self.nodes[p.0];
            matrix = node.transform.matrix() * matrix;
            parent = node.parent;
        }
        Ok(matrix)
    }

    pub fn world_position(&self, id: NodeId) -> Result<Vector3<f32>> {
        let p = self.world_matrix(id)? * Vector4::new(0.0, 0.0, 0.0, 1.0);
        Ok(p.truncate())
    }

    /// Visit every node whose whole ancestor chain is visible, depth first,
    /// with its world matrix
    pub fn traverse_visible<F>(&self, mut visit: F)
    where
        F: FnMut(NodeId, &Node, &Matrix4<f32>),
    {
        let mut stack: Vec<(NodeId, Matrix4<f32>)> = self
            .roots
            .iter()
            .rev()
            .map(|id| (*id, Matrix4::identity()))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            visit(id, node, &world);
            for child in node.children.iter().rev() {
                stack.push((*child, world));
            }
        }
    }

    /// Rebuild a mesh's geometry from its shape record.
    ///
    /// The previous GPU geometry is released before the new one is assigned.
    pub fn regenerate(&mut self, id: NodeId, backend: &mut dyn GeometryBackend) -> Result<()> {
        let mesh = self.mesh_mut(id)?;
        let params = mesh.shape.ok_or(Error::NotParametric(id))?;
        let geometry = params.build();
        mesh.replace_geometry(geometry, backend);
        log::debug!("regenerated {} geometry for {:?}", params.kind_name(), id);
        Ok(())
    }

    /// Upload every mesh that has no GPU geometry yet
    pub fn upload_pending(&mut self, backend: &mut dyn GeometryBackend) {
        for node in self.nodes.iter_mut() {
            if let Some(mesh) = node.as_mesh_mut() {
                mesh.ensure_uploaded(backend);
            }
        }
    }

    /// Release all GPU geometry owned by this scene
    pub fn release_all(&mut self, backend: &mut dyn GeometryBackend) {
        for node in self.nodes.iter_mut() {
            if let Some(mesh) = node.as_mesh_mut() {
                mesh.release(backend);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::{BoxParams, GeometryParams, IcosahedronParams, SphereParams},
        resources::geometry_store::recording::{Event, RecordingBackend},
    };

    fn assert_vec_close(actual: Vector3<f32>, expected: [f32; 3]) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < 1e-4,
                "{:?} != {:?}",
                actual,
                expected
            );
        }
    }

    fn three_level_chain() -> (Scene, [NodeId; 3]) {
        let mut scene = Scene::new("chain");
        let red = scene.add(Node::group("red").with_position(4.0, 0.0, 0.0));
        let green = scene
            .add_child(red, Node::group("green").with_position(4.0, 0.0, 0.0))
            .unwrap();
        let blue = scene
            .add_child(green, Node::group("blue").with_position(4.0, 0.0, 0.0))
            .unwrap();
        (scene, [red, green, blue])
    }

    #[test]
    fn test_world_position_composes_parent_chain() {
        let (scene, [red, green, blue]) = three_level_chain();

        assert_vec_close(scene.world_position(red).unwrap(), [4.0, 0.0, 0.0]);
        assert_vec_close(scene.world_position(green).unwrap(), [8.0, 0.0, 0.0]);
        assert_vec_close(scene.world_position(blue).unwrap(), [12.0, 0.0, 0.0]);
    }

    #[test]
    fn test_world_position_follows_parent_rotation_and_scale() {
        let (mut scene, [red, green, blue]) = three_level_chain();
        // Rotating the root 90° about y swings the children onto -z
        scene.node_mut(red).unwrap().transform.rotation.y = std::f32::consts::FRAC_PI_2;
        scene.node_mut(green).unwrap().transform.scale = Vector3::new(2.0, 2.0, 2.0);

        assert_vec_close(scene.world_position(red).unwrap(), [4.0, 0.0, 0.0]);
        assert_vec_close(scene.world_position(green).unwrap(), [4.0, 0.0, -4.0]);
        assert_vec_close(scene.world_position(blue).unwrap(), [4.0, 0.0, -12.0]);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let (mut scene, [red, _green, blue]) = three_level_chain();

        let err = scene.set_parent(red, Some(blue)).unwrap_err();
        assert!(matches!(err, Error::HierarchyCycle { .. }));
        assert!(matches!(
            scene.set_parent(red, Some(red)),
            Err(Error::HierarchyCycle { .. })
        ));
        // Unchanged
        assert_eq!(scene.node(red).unwrap().parent(), None);
    }

    #[test]
    fn test_set_parent_moves_between_parents() {
        let (mut scene, [red, green, blue]) = three_level_chain();

        scene.set_parent(blue, Some(red)).unwrap();
        assert_eq!(scene.node(red).unwrap().children(), &[green, blue]);
        assert!(scene.node(green).unwrap().children().is_empty());
        assert_vec_close(scene.world_position(blue).unwrap(), [8.0, 0.0, 0.0]);

        scene.set_parent(blue, None).unwrap();
        assert_eq!(scene.roots(), &[red, blue]);
        assert_vec_close(scene.world_position(blue).unwrap(), [4.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unknown_node() {
        let scene = Scene::new("empty");
        assert!(matches!(scene.node(NodeId(3)), Err(Error::UnknownNode(NodeId(3)))));
    }

    #[test]
    fn test_mesh_mut_on_group_is_not_a_mesh() {
        let mut scene = Scene::new("groups");
        let pivot = scene.add(Node::group("pivot"));

        assert!(matches!(scene.mesh_mut(pivot), Err(Error::NotAMesh(id)) if id == pivot));
        assert!(matches!(scene.mesh_mut(NodeId(7)), Err(Error::UnknownNode(NodeId(7)))));
    }

    #[test]
    fn test_traverse_skips_hidden_subtrees() {
        let (mut scene, [red, green, blue]) = three_level_chain();
        let other = scene.add(Node::group("other"));
        scene.node_mut(green).unwrap().visible = false;

        let mut visited = Vec::new();
        scene.traverse_visible(|id, _, _| visited.push(id));
        assert_eq!(visited, vec![red, other]);

        scene.node_mut(green).unwrap().visible = true;
        let mut worlds = Vec::new();
        scene.traverse_visible(|id, _, world| worlds.push((id, world.w.x)));
        assert_eq!(worlds, vec![(red, 4.0), (green, 8.0), (blue, 12.0), (other, 0.0)]);
    }

    #[test]
    fn test_regenerate_reflects_record() {
        let mut backend = RecordingBackend::default();
        let mut scene = Scene::new("shapes");
        let cube = scene.add(Node::mesh(
            "cube",
            Mesh::from_params(BoxParams::default(), Material::default()),
        ));
        scene.upload_pending(&mut backend);

        let record = BoxParams {
            width: 3.0,
            height: 0.5,
            depth: 2.0,
            width_segments: 4,
            height_segments: 2,
            depth_segments: 3,
        };
        scene.mesh_mut(cube).unwrap().shape = Some(GeometryParams::Box(record));
        scene.regenerate(cube, &mut backend).unwrap();

        let mesh = scene.node(cube).unwrap().as_mesh().unwrap();
        assert_eq!(mesh.geometry.parameters, Some(GeometryParams::Box(record)));
        assert_eq!(mesh.geometry.parameters, mesh.shape);
    }

    #[test]
    fn test_repeated_regeneration_does_not_leak() {
        let mut backend = RecordingBackend::default();
        let mut scene = Scene::new("shapes");
        let ball = scene.add(Node::mesh(
            "ball",
            Mesh::from_params(SphereParams::default(), Material::default()),
        ));
        let ico = scene.add(Node::mesh(
            "ico",
            Mesh::from_params(IcosahedronParams::default(), Material::default()),
        ));
        scene.upload_pending(&mut backend);

        for detail in 0..5 {
            scene.mesh_mut(ico).unwrap().shape = Some(GeometryParams::Icosahedron(
                IcosahedronParams { radius: 1.0, detail },
            ));
            scene.regenerate(ico, &mut backend).unwrap();
            scene.regenerate(ball, &mut backend).unwrap();
        }

        // one live geometry per mesh
        assert_eq!(backend.live.len(), 2);
        let ball_gpu = scene.node(ball).unwrap().as_mesh().unwrap().gpu_geometry();
        let ico_gpu = scene.node(ico).unwrap().as_mesh().unwrap().gpu_geometry();
        assert!(backend.live.contains(&ball_gpu.unwrap()));
        assert!(backend.live.contains(&ico_gpu.unwrap()));

        let releases = backend
            .events
            .iter()
            .filter(|e| matches!(e, Event::Release(_)))
            .count();
        assert_eq!(releases, 10);
        assert_eq!(backend.events.len(), 22);
    }

    #[test]
    fn test_regenerate_without_record_fails() {
        let mut backend = RecordingBackend::default();
        let mut scene = Scene::new("helpers");
        let axes = scene.add_axes_helper(5.0);

        let err = scene.regenerate(axes, &mut backend).unwrap_err();
        assert!(matches!(err, Error::NotParametric(id) if id == axes));
        assert!(backend.events.is_empty());
    }
}
