//! Ready-made panel controls for the common bindings: node transforms,
//! visibility, camera position and shape record fields.

use std::f32::consts::TAU;

use cgmath::Vector3;

use crate::{
    error::Error,
    gfx::{camera::CameraId, scene::{NodeId, SceneId}},
};

use super::panel::{Control, Folder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    fn get(&self, v: &Vector3<f32>) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    fn get_mut<'a>(&self, v: &'a mut Vector3<f32>) -> &'a mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
            Axis::Z => &mut v.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransformField {
    Position,
    Rotation,
    Scale,
}

fn transform_slider(
    scene: SceneId,
    node: NodeId,
    field: TransformField,
    axis: Axis,
    min: f32,
    max: f32,
) -> Control {
    Control::slider(
        axis.label(),
        min,
        max,
        move |world| {
            let t = &world.node(scene, node)?.transform;
            Ok(match field {
                TransformField::Position => axis.get(&t.position),
                TransformField::Rotation => axis.get(&t.rotation),
                TransformField::Scale => axis.get(&t.scale),
            })
        },
        move |world, value| {
            let t = &mut world.node_mut(scene, node)?.transform;
            let target = match field {
                TransformField::Position => &mut t.position,
                TransformField::Rotation => &mut t.rotation,
                TransformField::Scale => &mut t.scale,
            };
            *axis.get_mut(target) = value;
            Ok(())
        },
    )
}

pub fn position(scene: SceneId, node: NodeId, axis: Axis, min: f32, max: f32) -> Control {
    transform_slider(scene, node, TransformField::Position, axis, min, max)
}

/// Euler angle in radians over one full turn
pub fn rotation(scene: SceneId, node: NodeId, axis: Axis) -> Control {
    transform_slider(scene, node, TransformField::Rotation, axis, 0.0, TAU)
}

pub fn scale(scene: SceneId, node: NodeId, axis: Axis, min: f32, max: f32) -> Control {
    transform_slider(scene, node, TransformField::Scale, axis, min, max)
}

pub fn visible(scene: SceneId, node: NodeId) -> Control {
    Control::checkbox(
        "visible",
        move |world| Ok(world.node(scene, node)?.visible),
        move |world, value| {
            world.node_mut(scene, node)?.visible = value;
            Ok(())
        },
    )
}

/// Moves the camera eye; an aimed camera keeps its look-at target
pub fn camera_position(camera: CameraId, axis: Axis, min: f32, max: f32) -> Control {
    Control::slider(
        axis.label(),
        min,
        max,
        move |world| Ok(axis.get(&world.camera(camera)?.position)),
        move |world, value| {
            let camera = world.camera_mut(camera)?;
            let mut position = camera.position;
            *axis.get_mut(&mut position) = value;
            camera.set_position(position.x, position.y, position.z);
            Ok(())
        },
    )
}

/// Slider over one field of a mesh's shape record.
///
/// The record changes while dragging; the geometry is rebuilt once when the
/// gesture finishes.
pub fn shape_field(
    scene: SceneId,
    node: NodeId,
    field: &'static str,
    min: f32,
    max: f32,
) -> Control {
    Control::slider(
        field,
        min,
        max,
        move |world| {
            world
                .node(scene, node)?
                .as_mesh()
                .and_then(|mesh| mesh.shape)
                .and_then(|shape| shape.field(field))
                .ok_or(Error::NotParametric(node))
        },
        move |world, value| {
            let shape = world
                .scene_mut(scene)?
                .mesh_mut(node)?
                .shape
                .as_mut()
                .ok_or(Error::NotParametric(node))?;
            shape.set_field(field, value);
            Ok(())
        },
    )
    .on_finish_change(move |world, backend| world.scene_mut(scene)?.regenerate(node, backend))
}

/// Visibility plus Rotation, Position and Scale sub-folders for one node
pub fn transform_folder(name: impl Into<String>, scene: SceneId, node: NodeId) -> Folder {
    let mut rotation_folder = Folder::new("Rotation").open();
    let mut position_folder = Folder::new("Position").open();
    let mut scale_folder = Folder::new("Scale").open();
    for axis in Axis::ALL {
        rotation_folder = rotation_folder.control(rotation(scene, node, axis));
        position_folder = position_folder.control(position(scene, node, axis, -10.0, 10.0).step(0.1));
        scale_folder = scale_folder.control(scale(scene, node, axis, -5.0, 5.0));
    }
    Folder::new(name)
        .open()
        .control(visible(scene, node))
        .folder(rotation_folder)
        .folder(position_folder)
        .folder(scale_folder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::{
            camera::{Camera, OrbitControls},
            geometry::{GeometryParams, SphereParams},
            material::Material,
            resources::geometry_store::recording::RecordingBackend,
            scene::{Mesh, Node, Scene},
        },
        ui::panel::{DebugPanel, EditPhase, PanelEdit, Value},
        world::World,
    };

    fn setup() -> (World, SceneId, NodeId, CameraId) {
        let mut world = World::new();
        let mut scene = Scene::new("bindings");
        let ball = scene.add(Node::mesh(
            "ball",
            Mesh::from_params(SphereParams::default(), Material::lambert(0x3366ff)),
        ));
        let scene = world.add_scene(scene);
        let camera = world.add_camera(
            Camera::perspective("main", 75.0, 1.0, 0.1, 1000.0).with_position(0.0, 0.0, 2.0),
        );
        (world, scene, ball, camera)
    }

    fn finished(panel: &mut DebugPanel, path: &str, value: f32) {
        let control = panel.find(path).unwrap();
        panel.queue_edit(PanelEdit {
            control,
            value: Value::Number(value),
            phase: EditPhase::Finished,
        });
    }

    #[test]
    fn test_transform_folder_layout() {
        let (_, scene, ball, _) = setup();
        let mut panel = DebugPanel::new("Debug");
        panel.add_folder(transform_folder("Ball", scene, ball));

        assert_eq!(panel.control_count(), 10);
        for path in ["Ball/visible", "Ball/Rotation/x", "Ball/Position/y", "Ball/Scale/z"] {
            assert!(panel.find(path).is_some(), "{} missing", path);
        }
    }

    #[test]
    fn test_transform_sliders_write_fields() {
        let (mut world, scene, ball, _) = setup();
        let mut panel = DebugPanel::new("Debug");
        panel.add_folder(transform_folder("Ball", scene, ball));

        finished(&mut panel, "Ball/Position/y", 2.34);
        finished(&mut panel, "Ball/Rotation/z", 10.0);
        finished(&mut panel, "Ball/Scale/x", -2.0);
        panel.apply_pending(&mut world, &mut RecordingBackend::default());

        let t = world.node(scene, ball).unwrap().transform;
        assert!((t.position.y - 2.3).abs() < 1e-5);
        assert!((t.rotation.z - TAU).abs() < 1e-5);
        assert!((t.scale.x + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_camera_position_keeps_projection() {
        let (mut world, _, _, camera) = setup();
        let before = world.camera(camera).unwrap().projection_matrix();
        let mut panel = DebugPanel::new("Debug");
        panel.add_folder(Folder::new("Camera").control(camera_position(camera, Axis::Z, 0.0, 20.0)));

        finished(&mut panel, "Camera/z", 7.0);
        panel.apply_pending(&mut world, &mut RecordingBackend::default());

        let cam = world.camera(camera).unwrap();
        assert_eq!(cam.position.z, 7.0);
        assert_eq!(cam.projection_matrix(), before);
    }

    #[test]
    fn test_camera_z_onto_orbit_target_keeps_view_finite() {
        let (mut world, _, _, camera) = setup();
        let mut controls = OrbitControls::new(camera);
        controls.zoom_by(1.0);
        assert!(controls.apply(world.camera_mut(camera).unwrap()));

        let mut panel = DebugPanel::new("Debug");
        panel.add_folder(Folder::new("Camera").control(camera_position(camera, Axis::Z, 0.0, 20.0)));
        finished(&mut panel, "Camera/z", 0.0);
        panel.apply_pending(&mut world, &mut RecordingBackend::default());

        let cam = world.camera(camera).unwrap();
        assert_eq!(cam.position, cam.target);
        let view: [[f32; 4]; 4] = cam.view_projection_matrix().into();
        assert!(view.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_shape_field_regenerates_on_finish() {
        let (mut world, scene, ball, _) = setup();
        let mut backend = RecordingBackend::default();
        world.scene_mut(scene).unwrap().upload_pending(&mut backend);

        let mut panel = DebugPanel::new("Debug");
        panel.add_folder(
            Folder::new("Sphere").control(shape_field(scene, ball, "widthSegments", 3.0, 64.0).step(1.0)),
        );
        let control = panel.find("Sphere/widthSegments").unwrap();
        for (value, phase) in [
            (10.2, EditPhase::Changing),
            (12.7, EditPhase::Changing),
            (12.7, EditPhase::Finished),
        ] {
            panel.queue_edit(PanelEdit {
                control,
                value: Value::Number(value),
                phase,
            });
        }
        panel.apply_pending(&mut world, &mut backend);

        let mesh = world.node(scene, ball).unwrap().as_mesh().unwrap();
        let expected = GeometryParams::Sphere(SphereParams {
            width_segments: 13,
            ..Default::default()
        });
        assert_eq!(mesh.shape, Some(expected));
        assert_eq!(mesh.geometry.parameters, Some(expected));
        // one initial upload, one release and one upload for the single finish
        assert_eq!(backend.events.len(), 3);
        assert_eq!(backend.live.len(), 1);
    }
}
