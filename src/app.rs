//! Application shell: windows, the event loop and the per-tick driver.
//!
//! Each [`ViewportConfig`] becomes one window that renders one scene from
//! one camera. All windows share a single GPU device. The first viewport is
//! the primary window and hosts the ImGui overlays (debug panel, stats and
//! debug text).
//!
//! Every `about_to_wait` runs one tick:
//!
//! 1. queued debug panel edits
//! 2. queued orbit input
//! 3. spins, then the frame callback
//! 4. upload of geometry that has no GPU buffers yet
//!
//! and then requests a redraw on every window, which renders each viewport.

use std::{sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    error::{Error, Result},
    frame::{FrameClock, FrameContext, Spin},
    gfx::{
        camera::{Camera, CameraId, OrbitControls},
        rendering::{GpuContext, Renderer},
        resources::GeometryBackend,
        scene::{Scene, SceneId},
    },
    performance::PerformanceMonitor,
    ui::{DebugPanel, UiManager},
    world::World,
};

/// User code run once per tick
pub type FrameCallback = Box<dyn FnMut(&mut FrameContext) -> Result<()>>;

/// How a viewport's camera aspect follows its window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Aspect is the window's width / height
    FollowWindow,
    /// The window is created non-resizable at this size and the aspect is
    /// always width / height
    Fixed(u32, u32),
}

impl ResizePolicy {
    /// Camera aspect for a window of the given size, or `None` for a
    /// zero-sized (minimised) window
    pub fn aspect_for(&self, width: u32, height: u32) -> Option<f32> {
        if width == 0 || height == 0 {
            return None;
        }
        match *self {
            ResizePolicy::FollowWindow => Some(width as f32 / height as f32),
            ResizePolicy::Fixed(w, h) if w > 0 && h > 0 => Some(w as f32 / h as f32),
            ResizePolicy::Fixed(..) => None,
        }
    }
}

pub struct ViewportConfig {
    /// Identifies the viewport in logs
    pub name: String,
    pub title: String,
    /// Initial window size in logical pixels; the config's default window
    /// size when unset
    pub size: Option<(u32, u32)>,
    pub scene: SceneId,
    pub camera: CameraId,
    pub orbit_controls: Option<OrbitControls>,
    pub resize: ResizePolicy,
}

impl ViewportConfig {
    pub fn new(name: impl Into<String>, scene: SceneId, camera: CameraId) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            size: None,
            scene,
            camera,
            orbit_controls: None,
            resize: ResizePolicy::FollowWindow,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Orbit the viewport's camera around the origin
    pub fn with_orbit_controls(mut self) -> Self {
        self.orbit_controls = Some(OrbitControls::new(self.camera));
        self
    }

    pub fn with_controls(mut self, controls: OrbitControls) -> Self {
        self.orbit_controls = Some(controls);
        self
    }

    /// Fixed aspect; also sets the window size
    pub fn with_fixed_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self.resize = ResizePolicy::Fixed(width, height);
        self
    }
}

/// A viewport and, once the app is running, its window and renderer
pub struct Viewport {
    pub config: ViewportConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            window: None,
            renderer: None,
        }
    }

    pub fn window(&self) -> Result<&Arc<Window>> {
        self.window
            .as_ref()
            .ok_or_else(|| Error::NoWindow(self.config.name.clone()))
    }

    fn window_id(&self) -> Option<WindowId> {
        self.window.as_ref().map(|window| window.id())
    }

    /// Update the camera for a window resize.
    ///
    /// Sets the aspect of a perspective camera per the resize policy and
    /// recomputes the projection. Returns `false` for zero-sized windows,
    /// which leave the camera untouched.
    pub fn handle_resize(&self, world: &mut World, width: u32, height: u32) -> Result<bool> {
        let Some(aspect) = self.config.resize.aspect_for(width, height) else {
            return Ok(false);
        };
        let camera = world.camera_mut(self.config.camera)?;
        camera.set_aspect(aspect);
        camera.update_projection_matrix();
        Ok(true)
    }
}

/// The application: a world, its viewports and the tick driver
pub struct OrbitviewApp {
    pub config: AppConfig,
    pub world: World,
    viewports: Vec<Viewport>,
    spins: Vec<Spin>,
    frame_callback: Option<FrameCallback>,
    panel: Option<DebugPanel>,
    gpu: Option<GpuContext>,
    ui: Option<UiManager>,
    clock: FrameClock,
    performance: PerformanceMonitor,
    draw_calls: u32,
    debug_text: String,
    fatal: Option<Error>,
}

impl OrbitviewApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            world: World::new(),
            viewports: Vec::new(),
            spins: Vec::new(),
            frame_callback: None,
            panel: None,
            gpu: None,
            ui: None,
            clock: FrameClock::new(),
            performance: PerformanceMonitor::new(),
            draw_calls: 0,
            debug_text: String::new(),
            fatal: None,
        }
    }

    /// App configured from the file named by `ORBITVIEW_CONFIG`, if any
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(AppConfig::from_env()?))
    }

    pub fn add_scene(&mut self, scene: Scene) -> SceneId {
        self.world.add_scene(scene)
    }

    pub fn add_camera(&mut self, camera: Camera) -> CameraId {
        self.world.add_camera(camera)
    }

    /// Add a window. The first viewport added is the primary window.
    pub fn add_viewport(&mut self, config: ViewportConfig) {
        self.viewports.push(Viewport::new(config));
    }

    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    pub fn add_spin(&mut self, spin: Spin) {
        self.spins.push(spin);
    }

    /// Run `callback` once per tick, after spins and before rendering
    pub fn on_frame<F>(&mut self, callback: F)
    where
        F: FnMut(&mut FrameContext) -> Result<()> + 'static,
    {
        self.frame_callback = Some(Box::new(callback));
    }

    /// Show `panel` on the primary window
    pub fn set_panel(&mut self, panel: DebugPanel) {
        self.panel = Some(panel);
    }

    pub fn panel_mut(&mut self) -> Option<&mut DebugPanel> {
        self.panel.as_mut()
    }

    pub fn debug_text(&self) -> &str {
        &self.debug_text
    }

    /// Open the windows and run until they are closed or Escape is pressed
    pub fn run(mut self) -> Result<()> {
        init_logging(&self.config.log_filter);

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        match self.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// One tick of the driver, in order: panel edits, orbit input, spins,
    /// the frame callback, pending geometry uploads.
    pub fn tick(&mut self, now: Instant, backend: &mut dyn GeometryBackend) {
        let (tick, elapsed, delta) = self.clock.advance(now);

        if let Some(panel) = self.panel.as_mut() {
            panel.apply_pending(&mut self.world, backend);
        }

        for viewport in &mut self.viewports {
            let Some(controls) = viewport.config.orbit_controls.as_mut() else {
                continue;
            };
            match self.world.camera_mut(controls.camera) {
                Ok(camera) => {
                    controls.apply(camera);
                }
                Err(e) => log::warn!("viewport '{}': {}", viewport.config.name, e),
            }
        }

        for spin in &self.spins {
            if let Err(e) = spin.step(&mut self.world) {
                log::warn!("spin: {}", e);
            }
        }

        self.debug_text.clear();
        if let Some(callback) = self.frame_callback.as_mut() {
            let mut context = FrameContext {
                world: &mut self.world,
                tick,
                elapsed,
                delta,
                backend: &mut *backend,
                debug_text: &mut self.debug_text,
            };
            if let Err(e) = callback(&mut context) {
                log::warn!("frame callback failed: {}", e);
            }
        }

        for scene in self.world.scenes_mut() {
            scene.upload_pending(backend);
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let instance = GpuContext::create_instance();

        let default_size = (self.config.default_window.width, self.config.default_window.height);
        let mut surfaces = Vec::with_capacity(self.viewports.len());
        for viewport in &mut self.viewports {
            let (width, height) = viewport.config.size.unwrap_or(default_size);
            let attributes = WindowAttributes::default()
                .with_title(viewport.config.title.clone())
                .with_inner_size(LogicalSize::new(width, height))
                .with_resizable(viewport.config.resize == ResizePolicy::FollowWindow);
            let window = Arc::new(event_loop.create_window(attributes)?);
            surfaces.push(instance.create_surface(window.clone())?);
            viewport.window = Some(window);
        }

        let Some(first) = surfaces.first() else {
            log::warn!("no viewports configured");
            event_loop.exit();
            return Ok(());
        };
        let gpu = pollster::block_on(GpuContext::new(instance, first))?;

        for (index, (viewport, surface)) in self.viewports.iter_mut().zip(surfaces).enumerate() {
            let window = viewport.window()?.clone();
            let size = window.inner_size();
            let renderer = Renderer::new(
                &gpu,
                surface,
                size.width,
                size.height,
                self.config.present_mode(),
            );

            if index == 0 {
                let mut ui = UiManager::new(
                    &gpu.device,
                    &gpu.queue,
                    renderer.format(),
                    &window,
                    self.config.ui_font_size,
                );
                ui.update_display_size(size.width, size.height);
                self.ui = Some(ui);
            }

            viewport.handle_resize(&mut self.world, size.width, size.height)?;
            viewport.renderer = Some(renderer);
            log::info!(
                "viewport '{}' ready at {}x{}",
                viewport.config.name,
                size.width,
                size.height
            );
        }

        self.gpu = Some(gpu);
        Ok(())
    }

    fn resize_viewport(&mut self, index: usize, width: u32, height: u32) {
        let viewport = &mut self.viewports[index];
        match viewport.handle_resize(&mut self.world, width, height) {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => log::warn!("viewport '{}': {}", viewport.config.name, e),
        }
        if let Some(renderer) = viewport.renderer.as_mut() {
            renderer.resize(width, height);
        }
        if index == 0 {
            if let Some(ui) = self.ui.as_mut() {
                ui.update_display_size(width, height);
            }
        }
        log::debug!(
            "viewport '{}' resized to {}x{}",
            self.viewports[index].config.name,
            width,
            height
        );
        self.render_viewport(index);
    }

    fn render_viewport(&mut self, index: usize) {
        let Self {
            config,
            world,
            viewports,
            panel,
            gpu,
            ui,
            performance,
            draw_calls,
            debug_text,
            ..
        } = self;
        let Some(gpu) = gpu.as_ref() else {
            return;
        };
        let viewport = &mut viewports[index];
        let (Some(window), Some(renderer)) = (viewport.window.clone(), viewport.renderer.as_mut())
        else {
            return;
        };
        let world: &World = world;
        let (scene, camera) = match (
            world.scene(viewport.config.scene),
            world.camera(viewport.config.camera),
        ) {
            (Ok(scene), Ok(camera)) => (scene, camera),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("viewport '{}': {}", viewport.config.name, e);
                return;
            }
        };

        let show_stats = config.show_stats;
        let performance: &PerformanceMonitor = performance;
        let debug_text: &str = debug_text;
        let overlay = ui.as_mut().filter(|_| index == 0).map(|ui| {
            move |device: &wgpu::Device,
                  queue: &wgpu::Queue,
                  encoder: &mut wgpu::CommandEncoder,
                  view: &wgpu::TextureView| {
                let built = ui.update_logic(&window, |frame| {
                    if let Some(panel) = panel.as_mut() {
                        panel.draw(frame, world);
                    }
                    if show_stats {
                        performance.render_overlay(frame);
                    }
                    if !debug_text.is_empty() {
                        draw_debug_text(frame, debug_text);
                    }
                });
                if built.is_some() {
                    ui.render_display_only(device, queue, encoder, view);
                }
            }
        });

        if let Some(count) = renderer.render(scene, camera, &gpu.geometry, config.clear_color, overlay) {
            *draw_calls += count;
        }
    }
}

fn draw_debug_text(ui: &imgui::Ui, text: &str) {
    let display_size = ui.io().display_size;
    ui.window("Debug##debug_text")
        .position([10.0, display_size[1] - 10.0], imgui::Condition::Always)
        .position_pivot([0.0, 1.0])
        .always_auto_resize(true)
        .no_inputs()
        .bg_alpha(0.5)
        .build(|| {
            ui.text(text);
        });
}

fn init_logging(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already initialised");
    }
}

impl ApplicationHandler for OrbitviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            log::error!("failed to start: {}", e);
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(index) = self
            .viewports
            .iter()
            .position(|viewport| viewport.window_id() == Some(window_id))
        else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::info!("exit requested from '{}'", self.viewports[index].config.name);
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(size) => {
                self.resize_viewport(index, size.width, size.height);
                return;
            }
            WindowEvent::RedrawRequested => {
                self.render_viewport(index);
                return;
            }
            _ => {}
        }

        let mut captured = false;
        if index == 0 {
            if let (Some(ui), Some(window)) = (self.ui.as_mut(), self.viewports[0].window.as_ref()) {
                captured = ui.handle_event(window, &event);
            }
        }
        if captured {
            return;
        }
        if let Some(controls) = self.viewports[index].config.orbit_controls.as_mut() {
            controls.handle_window_event(&event);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let Some(mut gpu) = self.gpu.take() else {
            return;
        };

        self.performance.end_frame();
        self.performance.set_draw_calls(self.draw_calls);
        self.performance.begin_frame();
        self.draw_calls = 0;

        self.tick(Instant::now(), &mut gpu.geometry);
        self.gpu = Some(gpu);

        for viewport in &self.viewports {
            if let Some(window) = viewport.window.as_ref() {
                window.request_redraw();
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = self.gpu.as_mut() {
            for scene in self.world.scenes_mut() {
                scene.release_all(&mut gpu.geometry);
            }
            log::info!("released geometry, {} buffers still live", gpu.geometry.live_count());
        }
    }
}
