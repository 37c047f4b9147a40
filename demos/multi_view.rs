//! Four fixed-size windows over two scenes: a perspective camera and three
//! orthographic ones looking from the top, the left and the front.

use orbitview::prelude::*;

const SIZE: u32 = 200;

fn knot(name: &str) -> Node {
    Node::mesh(
        name,
        Mesh::from_params(
            TorusKnotParams::default(),
            Material::basic(0x00ff00).with_wireframe(true),
        ),
    )
}

fn ortho(name: &str) -> Camera {
    Camera::orthographic(name, -1.0, 1.0, 1.0, -1.0, 0.1, 10.0)
}

fn main() -> anyhow::Result<()> {
    let mut app = OrbitviewApp::from_env()?;
    build(&mut app);
    app.run()?;
    Ok(())
}

fn build(app: &mut OrbitviewApp) {
    let mut first = Scene::new("first");
    let knot1 = first.add(knot("knot").with_scale(0.5, 0.5, 0.5));
    let first = app.add_scene(first);

    let mut second = Scene::new("second");
    let knot2 = second.add(knot("knot"));
    let second = app.add_scene(second);

    let perspective = app.add_camera(
        Camera::perspective("perspective", 75.0, 1.0, 0.1, 10.0).with_position(0.0, 0.0, 2.0),
    );
    let top = app.add_camera(ortho("top").with_position(0.0, 2.0, 0.0).looking_at(0.0, 0.0, 0.0));
    let left = app.add_camera(ortho("left").with_position(-2.0, 0.0, 0.0).looking_at(0.0, 0.0, 0.0));
    let front = app.add_camera(ortho("front").with_position(0.0, 0.0, 2.0));

    app.add_viewport(
        ViewportConfig::new("perspective", first, perspective)
            .with_fixed_size(SIZE, SIZE)
            .with_orbit_controls(),
    );
    app.add_viewport(
        ViewportConfig::new("top", first, top)
            .with_fixed_size(SIZE, SIZE)
            .with_orbit_controls(),
    );
    app.add_viewport(ViewportConfig::new("left", second, left).with_fixed_size(SIZE, SIZE));
    app.add_viewport(ViewportConfig::new("front", first, front).with_fixed_size(SIZE, SIZE));

    app.add_spin(Spin::new(first, knot1, 0.01, 0.01, 0.0));
    app.add_spin(Spin::new(second, knot2, 0.0, 0.01, 0.0));
}
