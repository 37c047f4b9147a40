//! WGPU renderers
//!
//! A single [`GpuContext`] owns the device, queue and geometry buffers. Each
//! window gets its own [`Renderer`] with a surface, depth buffer and uniform
//! buffers, and draws one scene from one camera per frame.

use std::sync::Arc;

use wgpu::{Device, Queue, TextureFormat};

use crate::{
    error::Result,
    gfx::{
        camera::Camera,
        resources::{
            geometry_store::GpuGeometryStore,
            global_bindings::{global_ubo_content, GlobalBindings, GlobalUBO, SceneLights},
            texture_resource::TextureResource,
        },
        scene::Scene,
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::DynamicUniformBuffer,
    },
};

use super::{
    draw_list::{collect_draws, DrawMode, ObjectUniform},
    pipeline_manager::{PipelineConfig, PipelineManager},
};

const TRIANGLES: &str = "Triangles";
const TRIANGLES_MIRRORED: &str = "TrianglesMirrored";
const LINES: &str = "Lines";

/// GPU state shared by every window
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
    pub geometry: GpuGeometryStore,
}

impl GpuContext {
    pub fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        })
    }

    /// Pick an adapter able to present to `surface` and open a device on it
    pub async fn new(instance: wgpu::Instance, surface: &wgpu::Surface<'_>) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("using {} ({:?})", info.name, info.backend);

        let device: Arc<Device> = Arc::new(device);
        Ok(Self {
            instance,
            adapter,
            geometry: GpuGeometryStore::new(device.clone()),
            device,
            queue: Arc::new(queue),
        })
    }
}

/// Renders into one window surface
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: Arc<Device>,
    queue: Arc<Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: BindGroupLayoutWithDesc,
    object_uniforms: DynamicUniformBuffer<ObjectUniform>,
    object_bind_group: wgpu::BindGroup,
}

impl Renderer {
    pub fn new(
        gpu: &GpuContext,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
        present_mode: wgpu::PresentMode,
    ) -> Self {
        let device = gpu.device.clone();
        let surface_capabilities = surface.get_capabilities(&gpu.adapter);
        // Colours are written as given, without an sRGB encode
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);
        let present_mode = if surface_capabilities.present_modes.contains(&present_mode) {
            present_mode
        } else {
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let object_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_dynamic(
                DynamicUniformBuffer::<ObjectUniform>::element_size(),
            ))
            .create(&device, "Object Bind Group Layout");
        let object_uniforms = DynamicUniformBuffer::new(&device, 64);
        let object_bind_group = BindGroupBuilder::new(&object_layout)
            .resource(object_uniforms.binding_resource())
            .create(&device, "Object Bind Group");

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("default", include_str!("shader.wgsl"));

        let base = PipelineConfig::default()
            .with_shader("default")
            .with_color_format(format)
            .with_depth_format(TextureResource::DEPTH_FORMAT)
            .with_bind_group_layouts(vec![
                global_bindings.bind_group_layout().clone(),
                object_layout.layout.clone(),
            ]);
        pipeline_manager.register_pipeline(TRIANGLES, base.clone().with_label(TRIANGLES));
        pipeline_manager.register_pipeline(
            TRIANGLES_MIRRORED,
            base.clone()
                .with_label(TRIANGLES_MIRRORED)
                .with_front_face(wgpu::FrontFace::Cw),
        );
        pipeline_manager.register_pipeline(
            LINES,
            base.with_label(LINES)
                .with_cull_mode(None)
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList),
        );
        pipeline_manager.create_all_pipelines();

        Self {
            surface,
            device,
            queue: gpu.queue.clone(),
            config,
            format,
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            object_uniforms,
            object_bind_group,
        }
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        true
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Draw `scene` from `camera`, then run `overlay` on the same frame.
    ///
    /// Returns the number of draw calls, or `None` if the frame was skipped.
    pub fn render<F>(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        geometry: &GpuGeometryStore,
        clear_color: [f32; 3],
        overlay: Option<F>,
    ) -> Option<u32>
    where
        F: FnOnce(&Device, &Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost or outdated, reconfiguring");
                self.reconfigure();
                return None;
            }
            Err(e) => {
                log::warn!("skipping frame: {}", e);
                return None;
            }
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let draws = collect_draws(scene);
        let uniforms: Vec<ObjectUniform> = draws.iter().map(|d| d.uniform).collect();
        if self.object_uniforms.write(&self.device, &self.queue, &uniforms) {
            self.object_bind_group = BindGroupBuilder::new(&self.object_layout)
                .resource(self.object_uniforms.binding_resource())
                .create(&self.device, "Object Bind Group");
        }

        let lights = SceneLights::collect(scene);
        self.global_ubo
            .update_content(&self.queue, global_ubo_content(camera.uniform(), &lights));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let [r, g, b] = scene.background.unwrap_or(clear_color);
        let mut draw_calls = 0;
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for (index, item) in draws.iter().enumerate() {
                let Some(gpu) = geometry.get(item.geometry) else {
                    continue;
                };
                let (index_buffer, count) = match item.mode {
                    DrawMode::Edges => (&gpu.edge_buffer, gpu.edge_count),
                    DrawMode::Triangles | DrawMode::Lines => (&gpu.index_buffer, gpu.index_count),
                };
                if count == 0 {
                    continue;
                }
                let pipeline_name = match (item.mode.uses_line_pipeline(), item.mirrored) {
                    (true, _) => LINES,
                    (false, false) => TRIANGLES,
                    (false, true) => TRIANGLES_MIRRORED,
                };
                let Some(pipeline) = self.pipeline_manager.pipeline(pipeline_name) else {
                    continue;
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(
                    1,
                    &self.object_bind_group,
                    &[self.object_uniforms.offset(index)],
                );
                render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..count, 0, 0..1);
                draw_calls += 1;
            }
        }

        if let Some(overlay) = overlay {
            overlay(&self.device, &self.queue, &mut encoder, &surface_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Some(draw_calls)
    }
}
