//! Native window host: builder and winit application.
//!
//! ```ignore
//! Backdrop::new()
//!     .with_config(BackdropConfig::load("backdrop.json")?)
//!     .with_size(1280.0, 720.0)
//!     .run()?;
//! ```
//!
//! `RedrawRequested` is the display-synchronized callback. The widget's loop
//! re-arms it through [`FrameScheduler`] once per frame, and redraws are held
//! back while the window is occluded.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::animation::FrameScheduler;
use crate::config::BackdropConfig;
use crate::error::BackdropError;
use crate::gpu::{GpuCanvas, GpuState};
use crate::input::{native_pointer_event, MouseAdapter, NativePointerEvent, TouchAdapter};
use crate::profile::Viewport;
use crate::spawn::SpawnContext;
use crate::widget::NeuralNetworkWidget;

/// A particle-network backdrop in its own window.
///
/// Use method chaining to configure, then call `.run()` to start.
pub struct Backdrop {
    config: BackdropConfig,
    seed: Option<u64>,
    size: LogicalSize<f64>,
    title: String,
}

impl Backdrop {
    pub fn new() -> Self {
        Self {
            config: BackdropConfig::default(),
            seed: None,
            size: LogicalSize::new(1280.0, 720.0),
            title: "Neural Backdrop".to_string(),
        }
    }

    pub fn with_config(mut self, config: BackdropConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed the particle spawner for a reproducible layout.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = LogicalSize::new(width, height);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), BackdropError> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        // Frames are requested one at a time by the widget's loop.
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

/// Arms the next `RedrawRequested`.
struct RedrawScheduler {
    window: Option<Arc<Window>>,
    pending: bool,
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

struct App {
    settings: Backdrop,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    widget: Option<NeuralNetworkWidget<GpuCanvas>>,
    scheduler: RedrawScheduler,
    occluded: bool,
    started: Instant,
    first_frame: bool,
    error: Option<BackdropError>,
}

impl App {
    fn new(settings: Backdrop) -> Self {
        Self {
            settings,
            window: None,
            gpu_state: None,
            widget: None,
            scheduler: RedrawScheduler {
                window: None,
                pending: false,
            },
            occluded: false,
            started: Instant::now(),
            first_frame: true,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), BackdropError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(self.settings.size);

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone()))?;

        let viewport = logical_viewport(window.inner_size(), window.scale_factor());
        let canvas = GpuCanvas::new(viewport.width as u32, viewport.height as u32);
        let config = self.settings.config.clone();
        let spawn = match self.settings.seed {
            Some(seed) => SpawnContext::with_seed(&config.simulation, seed),
            None => SpawnContext::new(&config.simulation),
        };

        self.scheduler.window = Some(window.clone());
        let mut widget = NeuralNetworkWidget::with_spawn(canvas, viewport, config, spawn);
        widget.start(&mut self.scheduler);

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        self.widget = Some(widget);
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(widget) = &mut self.widget {
            widget.dispose();
            tracing::info!(frames = widget.frames(), "backdrop closed");
        }
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.occluded {
            return;
        }
        let (Some(widget), Some(gpu_state)) = (&mut self.widget, &mut self.gpu_state) else {
            return;
        };

        self.scheduler.pending = false;
        if !widget.frame(&mut self.scheduler) {
            return;
        }

        let mut out_of_memory = false;
        match gpu_state.render(widget.canvas(), self.settings.config.visuals.background) {
            Ok(()) => {
                if self.first_frame {
                    self.first_frame = false;
                    let stats = widget.last_stats();
                    tracing::info!(
                        elapsed_ms = self.started.elapsed().as_millis() as u64,
                        particles = stats.particles,
                        connections = stats.connections,
                        "first frame presented"
                    );
                }
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory; exiting");
                out_of_memory = true;
            }
            Err(e) => tracing::warn!(error = ?e, "frame skipped"),
        }
        if out_of_memory {
            self.shutdown(event_loop);
        }
    }
}

fn logical_viewport(size: PhysicalSize<u32>, scale_factor: f64) -> Viewport {
    let logical = size.to_logical::<f32>(scale_factor);
    Viewport::new(logical.width, logical.height)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                tracing::error!(error = %e, "failed to start backdrop");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let scale_factor = self
            .window
            .as_ref()
            .map(|w| w.scale_factor())
            .unwrap_or(1.0);

        if let (Some(widget), Some(pointer)) =
            (&mut self.widget, native_pointer_event(&event, scale_factor))
        {
            match pointer {
                NativePointerEvent::Mouse(mouse) => {
                    widget.feed_pointer(&MouseAdapter, &mouse);
                }
                NativePointerEvent::Touch(touch) => {
                    widget.set_touch_capable();
                    widget.feed_pointer(&TouchAdapter, &touch);
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                if let Some(widget) = &mut self.widget {
                    if physical_size.width > 0 && physical_size.height > 0 {
                        widget.resize(logical_viewport(physical_size, scale_factor));
                    }
                }
            }
            WindowEvent::Occluded(occluded) => {
                self.occluded = occluded;
                tracing::debug!(occluded, "window visibility changed");
                if !occluded && self.scheduler.pending {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
