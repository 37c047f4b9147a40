//! A box, a sphere and an icosahedron whose shape records are edited from
//! the debug panel. Each mesh is rebuilt once when a slider is released.

use std::f32::consts::{PI, TAU};

use orbitview::prelude::*;

fn main() -> anyhow::Result<()> {
    let mut app = OrbitviewApp::from_env()?;

    let mut scene = Scene::new("geometry").with_background(0x333333);
    scene.add_axes_helper(5.0);
    scene.add(Node::light("ambient", Light::ambient(0x404040, 0.5)));
    scene.add(Node::light("sky", Light::hemisphere(0xffffbb, 0x080820, 0.5)));
    scene.add(Node::light("key", Light::directional(0xffffff, 0.8)).with_position(5.0, 10.0, 7.5));

    let cube = scene.add(
        Node::mesh(
            "box",
            Mesh::from_params(BoxParams::default(), Material::lambert(0xff8800)),
        )
        .with_position(-3.0, 0.0, 0.0),
    );
    let ball = scene.add(Node::mesh(
        "sphere",
        Mesh::from_params(SphereParams::default(), Material::lambert(0x3388ff)),
    ));
    let gem = scene.add(
        Node::mesh(
            "icosahedron",
            Mesh::from_params(
                IcosahedronParams::default(),
                Material::lambert(0x88ff88).with_wireframe(true),
            ),
        )
        .with_position(3.0, 0.0, 0.0),
    );
    let scene = app.add_scene(scene);

    let camera = app.add_camera(
        Camera::perspective("main", 75.0, 1.0, 0.1, 1000.0).with_position(0.0, 2.0, 6.0),
    );
    app.add_viewport(
        ViewportConfig::new("main", scene, camera)
            .with_title("orbitview - geometry parameters")
            .with_orbit_controls(),
    );

    let mut panel = DebugPanel::new("Geometry");
    panel.add_folder(
        Folder::new("Box")
            .open()
            .control(bindings::shape_field(scene, cube, "width", 1.0, 30.0))
            .control(bindings::shape_field(scene, cube, "height", 1.0, 30.0))
            .control(bindings::shape_field(scene, cube, "depth", 1.0, 30.0))
            .control(bindings::shape_field(scene, cube, "widthSegments", 1.0, 30.0).step(1.0))
            .control(bindings::shape_field(scene, cube, "heightSegments", 1.0, 30.0).step(1.0))
            .control(bindings::shape_field(scene, cube, "depthSegments", 1.0, 30.0).step(1.0)),
    );
    panel.add_folder(
        Folder::new("Sphere")
            .open()
            .control(bindings::shape_field(scene, ball, "radius", 0.1, 30.0))
            .control(bindings::shape_field(scene, ball, "widthSegments", 3.0, 32.0).step(1.0))
            .control(bindings::shape_field(scene, ball, "heightSegments", 2.0, 32.0).step(1.0))
            .control(bindings::shape_field(scene, ball, "phiStart", 0.0, TAU))
            .control(bindings::shape_field(scene, ball, "phiLength", 0.0, TAU))
            .control(bindings::shape_field(scene, ball, "thetaStart", 0.0, PI))
            .control(bindings::shape_field(scene, ball, "thetaLength", 0.0, PI)),
    );
    panel.add_folder(
        Folder::new("Icosahedron")
            .open()
            .control(bindings::shape_field(scene, gem, "radius", 0.1, 10.0))
            .control(bindings::shape_field(scene, gem, "detail", 0.0, 5.0).step(1.0)),
    );
    app.set_panel(panel);

    app.add_spin(Spin::new(scene, cube, 0.0, 0.005, 0.0));
    app.add_spin(Spin::new(scene, gem, 0.005, 0.005, 0.0));

    app.run()?;
    Ok(())
}
