//! Three spheres chained parent -> child -> grandchild, each offset by 4 on
//! X from its parent, with their local and world positions in the debug text.

use orbitview::prelude::*;

fn sphere(name: &str, hex: u32) -> Node {
    Node::mesh(
        name,
        Mesh::from_params(SphereParams::default(), Material::lambert(hex)),
    )
    .with_position(4.0, 0.0, 0.0)
}

fn main() -> anyhow::Result<()> {
    let mut app = OrbitviewApp::from_env()?;

    let mut scene = Scene::new("hierarchy").with_background(0x333333);
    scene.add_axes_helper(5.0);
    scene.add(Node::light("ambient", Light::ambient(0xffffff, 0.2)));
    scene.add(Node::light("sun", Light::directional(0xffffff, 1.0)).with_position(10.0, 10.0, 10.0));

    let parent = scene.add(sphere("parent", 0xff0000));
    let child = scene.add_child(parent, sphere("child", 0x00ff00))?;
    let grandchild = scene.add_child(child, sphere("grandchild", 0x0000ff))?;
    let scene = app.add_scene(scene);

    let camera = app.add_camera(
        Camera::perspective("main", 75.0, 1.0, 0.1, 1000.0)
            .with_position(4.0, 4.0, 20.0)
            .looking_at(8.0, 0.0, 0.0),
    );
    app.add_viewport(
        ViewportConfig::new("main", scene, camera)
            .with_title("orbitview - hierarchy")
            .with_controls(OrbitControls::new(camera).with_target(8.0, 0.0, 0.0)),
    );

    let mut panel = DebugPanel::new("Controls");
    for (name, node) in [("Parent", parent), ("Child", child), ("Grandchild", grandchild)] {
        let mut folder = Folder::new(name);
        for axis in Axis::ALL {
            folder = folder.control(bindings::position(scene, node, axis, -10.0, 10.0).step(0.01));
        }
        panel.add_folder(folder.open());
    }
    app.set_panel(panel);

    app.on_frame(move |ctx| {
        let report = position_report(ctx.world, scene, &[parent, child, grandchild])?;
        ctx.debug_text.push_str(&report);
        Ok(())
    });

    app.run()?;
    Ok(())
}
