//! Flattening a scene into per-object draw commands

use cgmath::{Matrix, Matrix4, SquareMatrix};

use crate::gfx::{
    geometry::Topology,
    resources::geometry_store::GeometryId,
    scene::{NodeId, NodeKind, Scene},
};

/// Per-object uniforms. MUST match the `Object` struct in `shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, for normals
    pub normal: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x: lit, y: use vertex colours
    pub flags: [u32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Filled triangles from the index buffer
    Triangles,
    /// Line list from the index buffer
    Lines,
    /// Triangle edges as a line list, for wireframe materials
    Edges,
}

impl DrawMode {
    pub fn uses_line_pipeline(&self) -> bool {
        !matches!(self, DrawMode::Triangles)
    }
}

#[derive(Debug, Clone)]
pub struct DrawItem {
    pub node: NodeId,
    pub geometry: GeometryId,
    pub mode: DrawMode,
    /// Negative determinant: triangles wind clockwise on screen
    pub mirrored: bool,
    pub uniform: ObjectUniform,
}

/// Every visible mesh with uploaded geometry, in traversal order
pub fn collect_draws(scene: &Scene) -> Vec<DrawItem> {
    let mut draws = Vec::new();
    scene.traverse_visible(|id, node, world| {
        let NodeKind::Mesh(mesh) = &node.kind else {
            return;
        };
        let Some(geometry) = mesh.gpu_geometry() else {
            return;
        };

        let mode = match (mesh.geometry.topology, mesh.material.wireframe) {
            (Topology::Lines, _) => DrawMode::Lines,
            (Topology::Triangles, true) => DrawMode::Edges,
            (Topology::Triangles, false) => DrawMode::Triangles,
        };
        let normal = world
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(*world);
        let [r, g, b] = mesh.material.color;

        draws.push(DrawItem {
            node: id,
            geometry,
            mode,
            mirrored: world.determinant() < 0.0,
            uniform: ObjectUniform {
                model: (*world).into(),
                normal: normal.into(),
                color: [r, g, b, 1.0],
                flags: [
                    // lines carry no usable normals
                    (mesh.material.is_lit() && mode == DrawMode::Triangles) as u32,
                    mesh.material.vertex_colors as u32,
                    0,
                    0,
                ],
            },
        });
    });
    draws
}

pub fn model_matrix(item: &DrawItem) -> Matrix4<f32> {
    item.uniform.model.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::{BoxParams, SphereParams},
        material::Material,
        resources::geometry_store::recording::RecordingBackend,
        scene::{Mesh, Node},
    };

    fn scene_with_meshes() -> (Scene, [NodeId; 3]) {
        let mut scene = Scene::new("draws");
        let solid = scene.add(
            Node::mesh(
                "solid",
                Mesh::from_params(SphereParams::default(), Material::lambert(0xff0000)),
            )
            .with_position(1.0, 0.0, 0.0),
        );
        let wire = scene.add_child(
            solid,
            Node::mesh(
                "wire",
                Mesh::from_params(BoxParams::default(), Material::lambert(0x00ff00).with_wireframe(true)),
            )
            .with_position(0.0, 2.0, 0.0),
        )
        .unwrap();
        let axes = scene.add_axes_helper(5.0);
        (scene, [solid, wire, axes])
    }

    #[test]
    fn test_meshes_without_gpu_geometry_are_skipped() {
        let (scene, _) = scene_with_meshes();
        assert!(collect_draws(&scene).is_empty());
    }

    #[test]
    fn test_draw_modes_and_flags() {
        let (mut scene, [solid, wire, axes]) = scene_with_meshes();
        scene.upload_pending(&mut RecordingBackend::default());

        let draws = collect_draws(&scene);
        let modes: Vec<_> = draws.iter().map(|d| (d.node, d.mode)).collect();
        assert_eq!(
            modes,
            vec![
                (solid, DrawMode::Triangles),
                (wire, DrawMode::Edges),
                (axes, DrawMode::Lines)
            ]
        );
        assert_eq!(draws[0].uniform.flags[0], 1);
        assert_eq!(draws[1].uniform.flags[0], 0);
        assert_eq!(draws[2].uniform.flags[1], 1);
        assert_eq!(draws[0].uniform.color, [1.0, 0.0, 0.0, 1.0]);
        assert!(draws.iter().all(|d| !d.mirrored));
    }

    #[test]
    fn test_negative_scale_is_mirrored() {
        let (mut scene, [solid, _, _]) = scene_with_meshes();
        scene.upload_pending(&mut RecordingBackend::default());
        scene.node_mut(solid).unwrap().transform.scale.x = -1.0;

        let draws = collect_draws(&scene);
        assert!(draws[0].mirrored);
        // the child inherits the flip
        assert!(draws[1].mirrored);
        assert!(!draws[2].mirrored);
    }

    #[test]
    fn test_model_matrix_is_world_matrix() {
        let (mut scene, [_, wire, _]) = scene_with_meshes();
        scene.upload_pending(&mut RecordingBackend::default());

        let draws = collect_draws(&scene);
        let item = draws.iter().find(|d| d.node == wire).unwrap();
        assert_eq!(model_matrix(item), scene.world_matrix(wire).unwrap());
        let translation = model_matrix(item).w;
        assert_eq!((translation.x, translation.y), (1.0, 2.0));
    }

    #[test]
    fn test_hidden_parent_hides_children() {
        let (mut scene, [solid, _, axes]) = scene_with_meshes();
        scene.upload_pending(&mut RecordingBackend::default());
        scene.node_mut(solid).unwrap().visible = false;

        let nodes: Vec<_> = collect_draws(&scene).iter().map(|d| d.node).collect();
        assert_eq!(nodes, vec![axes]);
    }
}
