//! A green wireframe cube spinning in front of an orbiting perspective camera.

use orbitview::prelude::*;

fn main() -> anyhow::Result<()> {
    let mut app = OrbitviewApp::from_env()?;

    let mut scene = Scene::new("main");
    let cube = scene.add(Node::mesh(
        "cube",
        Mesh::from_params(BoxParams::default(), Material::basic(0x00ff00).with_wireframe(true)),
    ));
    let scene = app.add_scene(scene);

    let camera = app.add_camera(
        Camera::perspective("main", 75.0, 1.0, 0.1, 1000.0).with_position(0.0, 0.0, 2.0),
    );
    app.add_viewport(
        ViewportConfig::new("main", scene, camera)
            .with_title("orbitview - basic cube")
            .with_orbit_controls(),
    );
    app.add_spin(Spin::new(scene, cube, 0.01, 0.01, 0.0));

    app.run()?;
    Ok(())
}
