use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use lorenz_physics::{spawn_in_cube, Particle};
use lorenz_renderer::{PointRenderer, TransformMatrices};
use lorenz_simulation::{AttractorSimulation, GpuError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes, WindowId},
};

mod config;
mod error;
mod frame_loop;
mod input;
mod stats;

use config::Config;
use error::{AppError, Result};
use frame_loop::{FrameBackend, FrameLoop, FrameOutcome, Phase};
use input::{Controls, KeyTracker};

/// Surface texture and encoder for the frame being recorded
struct InFlight {
    output: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    simulation: AttractorSimulation,
    renderer: PointRenderer,

    frame: Option<InFlight>,
}

impl GpuState {
    async fn new(window: Arc<Window>, app_config: &Config, particles: &[Particle]) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(GpuError::from)?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(GpuError::from)?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        // Large particle counts need more than the default 128 MiB binding
        let adapter_limits = adapter.limits();
        let required_limits = wgpu::Limits {
            max_storage_buffer_binding_size: adapter_limits.max_storage_buffer_binding_size,
            max_buffer_size: adapter_limits.max_buffer_size,
            ..wgpu::Limits::default()
        };

        // Create device and queue
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(GpuError::from)?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| GpuError::UnsupportedSurface {
                adapter: adapter.get_info().name,
            })?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: app_config.present_mode(),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let simulation = AttractorSimulation::new(
            &device,
            queue.clone(),
            particles,
            &app_config.lorenz_params(),
            app_config.updates_per_frame,
        )
        .await?;

        let renderer = PointRenderer::new(&device, &config, app_config.samples).await?;

        Ok(Self {
            surface,
            device,
            queue,
            config,
            simulation,
            renderer,
            frame: None,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.renderer.resize(&self.device, &self.config);
        }
    }
}

impl FrameBackend for GpuState {
    type Error = wgpu::SurfaceError;

    fn apply_transform(&mut self, matrices: &TransformMatrices) {
        self.renderer.update_transform(&self.queue, matrices);
    }

    fn set_updates_per_frame(&mut self, updates_per_frame: u32) {
        self.simulation.set_updates_per_frame(updates_per_frame);
    }

    fn begin_frame(&mut self) -> std::result::Result<(), Self::Error> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.frame = Some(InFlight {
            output,
            view,
            encoder,
        });
        Ok(())
    }

    fn dispatch_integration(&mut self) {
        if let Some(frame) = &mut self.frame {
            self.simulation.encode_step(&mut frame.encoder);
        }
    }

    fn render(&mut self) {
        if let Some(frame) = &mut self.frame {
            self.renderer.encode(
                &self.device,
                &mut frame.encoder,
                &frame.view,
                self.simulation.next_buffer(),
                self.simulation.particle_count(),
            );
        }
    }

    fn swap(&mut self) {
        self.simulation.swap();
    }

    fn present(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.queue.submit(std::iter::once(frame.encoder.finish()));
            frame.output.present();
        }
    }
}

struct App {
    config: Config,
    controls: Controls,
    particles: Vec<Particle>,

    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,

    frame_loop: FrameLoop,
    keys: KeyTracker,
    error: Option<AppError>,
}

impl App {
    fn new(config: Config, particles: Vec<Particle>) -> Self {
        Self {
            controls: Controls::from(&config),
            frame_loop: FrameLoop::new(config.scale, config.updates_per_frame),
            config,
            particles,
            window: None,
            gpu_state: None,
            keys: KeyTracker::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        self.error = Some(err);
        self.frame_loop.shutdown();
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Arc::new(event_loop.create_window(window_attributes(&self.config))?);
        let mut gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            &self.config,
            &self.particles,
        ))?;

        // Positions live on the GPU from here on
        self.particles = Vec::new();

        self.frame_loop.start(&mut gpu_state);
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
            return;
        };

        let input = self.keys.take_input(&self.controls);
        match self.frame_loop.frame(input, gpu_state) {
            Ok(FrameOutcome::Presented) => {
                let stats = self.frame_loop.stats();
                window.set_title(&format!(
                    "attractors - {:.0} FPS ({:.2}ms) - {} particles",
                    stats.rolling_fps(),
                    stats.rolling_frame_time_ms(),
                    gpu_state.simulation.particle_count()
                ));
            }
            Ok(FrameOutcome::Quit) => event_loop.exit(),
            Ok(FrameOutcome::Inactive) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                gpu_state.resize(window.inner_size());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(
                    event_loop,
                    AppError::Surface(wgpu::SurfaceError::OutOfMemory),
                );
            }
            Err(e) => log::warn!("Skipping frame: {e}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            // Same path as Escape: the frame loop sees the quit before dispatching
            WindowEvent::CloseRequested => {
                self.keys.request_quit();
                self.redraw(event_loop);
                if self.frame_loop.phase() != Phase::ShuttingDown {
                    self.frame_loop.shutdown();
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::Focused(false) => self.keys.release_all(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.keys.handle_key(code, event.state.is_pressed());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// `--width`/`--height` are physical pixels, independent of the display scale
fn window_attributes(config: &Config) -> WindowAttributes {
    Window::default_attributes()
        .with_title("attractors")
        .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
}

fn run(config: Config) -> Result<FrameLoop> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let particles = spawn_in_cube(&mut rng, config.particles as usize, config.volume);
    log::info!(
        "Spawned {} particles in [-{v}, {v})^3",
        particles.len(),
        v = config.volume
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, particles);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(app.frame_loop),
    }
}

fn main() -> ExitCode {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    println!("attractors: {} particles", config.particles);

    match run(config) {
        Ok(frame_loop) => {
            println!("Average FPS: {:.1}", frame_loop.stats().average_fps());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
