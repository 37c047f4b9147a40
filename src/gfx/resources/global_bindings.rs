//! Global uniform bindings for camera and scene lights
//!
//! One uniform buffer per renderer, bound to group 0 in every pipeline.

use cgmath::{InnerSpace, Vector3};

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        scene::{Light, NodeKind, Scene},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Directional lights beyond this count are ignored
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// MUST match the `Globals` struct in `shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    hemisphere_sky: [f32; 4],
    hemisphere_ground: [f32; 4],
    /// x: number of directional lights
    light_count: [u32; 4],
    directional_direction: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    directional_color: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
}

/// Lighting of one scene, pre-multiplied by intensity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneLights {
    pub ambient: [f32; 3],
    pub hemisphere_sky: [f32; 3],
    pub hemisphere_ground: [f32; 3],
    /// (direction the light travels, colour)
    pub directional: Vec<([f32; 3], [f32; 3])>,
}

fn scaled(color: [f32; 3], intensity: f32) -> [f32; 3] {
    [color[0] * intensity, color[1] * intensity, color[2] * intensity]
}

fn accumulate(into: &mut [f32; 3], color: [f32; 3]) {
    for (a, c) in into.iter_mut().zip(color) {
        *a += c;
    }
}

impl SceneLights {
    /// Gather the visible lights of `scene`.
    ///
    /// A directional light shines from its world position toward the origin.
    pub fn collect(scene: &Scene) -> Self {
        let mut lights = SceneLights::default();
        scene.traverse_visible(|id, node, world| {
            let NodeKind::Light(light) = &node.kind else {
                return;
            };
            match *light {
                Light::Ambient { color, intensity } => {
                    accumulate(&mut lights.ambient, scaled(color, intensity));
                }
                Light::Hemisphere {
                    sky,
                    ground,
                    intensity,
                } => {
                    accumulate(&mut lights.hemisphere_sky, scaled(sky, intensity));
                    accumulate(&mut lights.hemisphere_ground, scaled(ground, intensity));
                }
                Light::Directional { color, intensity } => {
                    if lights.directional.len() == MAX_DIRECTIONAL_LIGHTS {
                        log::warn!("directional light {:?} ignored, limit is {}", id, MAX_DIRECTIONAL_LIGHTS);
                        return;
                    }
                    let position = Vector3::new(world.w.x, world.w.y, world.w.z);
                    let direction = if position.magnitude2() > f32::EPSILON {
                        -position.normalize()
                    } else {
                        -Vector3::unit_y()
                    };
                    lights
                        .directional
                        .push((direction.into(), scaled(color, intensity)));
                }
            }
        });
        lights
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

pub fn global_ubo_content(camera: CameraUniform, lights: &SceneLights) -> GlobalUBOContent {
    let rgb = |c: [f32; 3]| [c[0], c[1], c[2], 0.0];
    let mut content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        ambient: rgb(lights.ambient),
        hemisphere_sky: rgb(lights.hemisphere_sky),
        hemisphere_ground: rgb(lights.hemisphere_ground),
        light_count: [lights.directional.len() as u32, 0, 0, 0],
        directional_direction: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
        directional_color: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
    };
    for (i, (direction, color)) in lights.directional.iter().enumerate() {
        content.directional_direction[i] = rgb(*direction);
        content.directional_color[i] = rgb(*color);
    }
    content
}

/// Layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Node;

    #[test]
    fn test_collect_lights() {
        let mut scene = Scene::new("lit");
        scene.add(Node::light("ambient", Light::ambient(0xffffff, 0.5)));
        scene.add(Node::light("hemi", Light::hemisphere(0xffffff, 0x000000, 0.3)));
        scene.add(Node::light("sun", Light::directional(0xffffff, 1.0)).with_position(0.0, 10.0, 0.0));

        let lights = SceneLights::collect(&scene);
        assert_eq!(lights.ambient, [0.5, 0.5, 0.5]);
        assert!((lights.hemisphere_sky[0] - 0.3).abs() < 1e-6);
        assert_eq!(lights.hemisphere_ground, [0.0, 0.0, 0.0]);
        assert_eq!(lights.directional.len(), 1);
        let (direction, _) = lights.directional[0];
        assert!((direction[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_directional_direction_follows_parent() {
        let mut scene = Scene::new("lit");
        let rig = scene.add(Node::group("rig").with_position(3.0, 0.0, 0.0));
        scene
            .add_child(rig, Node::light("sun", Light::directional(0xffffff, 1.0)).with_position(0.0, 0.0, 4.0))
            .unwrap();

        let lights = SceneLights::collect(&scene);
        let (direction, _) = lights.directional[0];
        assert!((direction[0] + 0.6).abs() < 1e-5);
        assert!((direction[2] + 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_hidden_and_excess_lights_are_skipped() {
        let mut scene = Scene::new("lit");
        for i in 0..6 {
            scene.add(Node::light(format!("sun{}", i), Light::directional(0xffffff, 1.0)));
        }
        let hidden = scene.add(Node::light("hidden", Light::ambient(0xffffff, 1.0)));
        scene.node_mut(hidden).unwrap().visible = false;

        let lights = SceneLights::collect(&scene);
        assert_eq!(lights.directional.len(), MAX_DIRECTIONAL_LIGHTS);
        assert_eq!(lights.ambient, [0.0, 0.0, 0.0]);

        let content = global_ubo_content(CameraUniform::default(), &lights);
        assert_eq!(content.light_count[0], MAX_DIRECTIONAL_LIGHTS as u32);
    }
}
