//! A debug panel bound to a cube's visibility, rotation, position and scale,
//! and to the camera distance.

use orbitview::prelude::*;

fn main() -> anyhow::Result<()> {
    let mut app = OrbitviewApp::from_env()?;

    let mut scene = Scene::new("main").with_background(0x333333);
    scene.add_axes_helper(5.0);
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
            .with_title("orbitview - debug panel")
            .with_orbit_controls(),
    );

    let mut panel = DebugPanel::new("Controls");
    panel.add_folder(bindings::transform_folder("Cube", scene, cube));
    panel.add_folder(
        Folder::new("Camera")
            .open()
            .control(bindings::camera_position(camera, Axis::Z, 0.0, 20.0)),
    );
    app.set_panel(panel);

    app.on_frame(move |ctx| {
        let matrix = ctx.world.scene(scene)?.world_matrix(cube)?;
        ctx.debug_text.push_str(&format!("Matrix\n{}", format_matrix(&matrix)));
        Ok(())
    });

    app.run()?;
    Ok(())
}
