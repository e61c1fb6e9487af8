use std::time::Duration;

use anyhow::{bail, Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::paint::Color;
use crate::render::shapes::ShapeRenderer;
use crate::scene::{DrawCmd, DrawList};

use super::{Platform, ViewEvent};

/// Upper bound on pump rounds while waiting for the platform to resume the app.
const WINDOW_CREATE_ROUNDS: usize = 100;
const WINDOW_CREATE_TIMEOUT: Duration = Duration::from_millis(20);

/// Window creation parameters for [`WinitPlatform::open`].
#[derive(Debug, Clone)]
pub struct WindowSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[self_referencing]
struct WindowSurface {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// `Platform` backed by a winit window and a wgpu surface.
///
/// The event loop is pumped (never handed over), so the caller keeps
/// control of the loop and its pacing.
pub struct WinitPlatform {
    // Field order is drop order: surface, then window, then the event loop.
    surface: Option<WindowSurface>,
    renderer: ShapeRenderer,
    frame: DrawList,
    clear: Color,
    pump: EventPump,
    event_loop: EventLoop<()>,
}

impl WinitPlatform {
    /// Initializes the windowing system, opens the window and binds a GPU surface to it.
    ///
    /// Fails when no display is available, the window cannot be created, or no
    /// compatible GPU adapter exists.
    pub fn open(spec: WindowSpec, gpu_init: GpuInit) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to initialize the windowing system")?;

        let attributes = Window::default_attributes()
            .with_title(spec.title.clone())
            .with_inner_size(PhysicalSize::new(spec.width, spec.height))
            .with_resizable(false);

        let mut pump = EventPump::new(attributes);
        let window = pump.wait_for_window(&mut event_loop)?;
        log::info!("opened {}x{} window \"{}\"", spec.width, spec.height, spec.title);

        let surface = WindowSurface::try_new(window, |w| pollster::block_on(Gpu::new(w, gpu_init)))
            .context("failed to initialize the GPU surface")?;

        Ok(Self {
            surface: Some(surface),
            renderer: ShapeRenderer::new(),
            frame: DrawList::new(),
            clear: Color::black(),
            pump,
            event_loop,
        })
    }

    fn render_frame(&mut self) -> Result<()> {
        let Some(surface) = self.surface.as_mut() else {
            bail!("present called after shutdown");
        };

        let (renderer, frame, clear) = (&mut self.renderer, &self.frame, self.clear);

        surface.with_mut(|fields| {
            let gpu = fields.gpu;

            let mut gpu_frame = match gpu.begin_frame() {
                Ok(f) => f,
                Err(err) => {
                    return match gpu.recover(&err) {
                        SurfaceErrorAction::Fatal => {
                            log::error!("fatal surface error: {err}");
                            Err(anyhow::anyhow!("failed to acquire frame: {err}"))
                        }
                        action => {
                            log::warn!("skipping frame after surface error: {err} ({action:?})");
                            Ok(())
                        }
                    };
                }
            };

            renderer.render(gpu, &mut gpu_frame, clear, frame);

            fields.window.pre_present_notify();
            gpu.submit(gpu_frame);
            Ok(())
        })
    }
}

impl Platform for WinitPlatform {
    fn poll_events(&mut self, out: &mut Vec<ViewEvent>) {
        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.pump)
        {
            // The loop is gone; nothing else will ever close the window.
            log::warn!("event loop exited with code {code}");
            self.pump.events.push(ViewEvent::CloseRequested);
        }

        for event in self.pump.events.drain(..) {
            if let ViewEvent::Resized { width, height } = event {
                if let Some(surface) = self.surface.as_mut() {
                    surface.with_gpu_mut(|gpu| gpu.resize(PhysicalSize::new(width, height)));
                }
            }
            out.push(event);
        }
    }

    fn fill(&mut self, color: Color) {
        // A fill covers everything recorded before it.
        self.clear = color;
        self.frame.clear();
    }

    fn draw(&mut self, cmd: &DrawCmd) {
        self.frame.push(cmd.clone());
    }

    fn present(&mut self) -> Result<()> {
        let result = self.render_frame();
        self.frame.clear();
        result
    }

    fn shutdown(&mut self) {
        if self.surface.take().is_some() {
            self.renderer = ShapeRenderer::new();
            log::debug!("window and GPU surface released");
        }
    }
}

/// `ApplicationHandler` fed by `pump_app_events`; buffers what the view cares about.
struct EventPump {
    attributes: Option<WindowAttributes>,
    window: Option<Window>,
    window_id: Option<WindowId>,
    create_error: Option<winit::error::OsError>,
    events: Vec<ViewEvent>,
}

impl EventPump {
    fn new(attributes: WindowAttributes) -> Self {
        Self {
            attributes: Some(attributes),
            window: None,
            window_id: None,
            create_error: None,
            events: Vec::new(),
        }
    }

    /// Pumps until `resumed` has created the window.
    fn wait_for_window(&mut self, event_loop: &mut EventLoop<()>) -> Result<Window> {
        for _ in 0..WINDOW_CREATE_ROUNDS {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(WINDOW_CREATE_TIMEOUT), self)
            {
                bail!("event loop exited with code {code} before the window was created");
            }
            if let Some(err) = self.create_error.take() {
                return Err(err).context("failed to create window");
            }
            if let Some(window) = self.window.take() {
                return Ok(window);
            }
        }
        bail!("windowing system did not resume the application")
    }
}

impl ApplicationHandler for EventPump {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attributes) = self.attributes.take() else { return };

        match event_loop.create_window(attributes) {
            Ok(window) => {
                self.window_id = Some(window.id());
                self.window = Some(window);
            }
            Err(err) => self.create_error = Some(err),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.window_id != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.events.push(ViewEvent::CloseRequested),
            WindowEvent::Resized(size) => self.events.push(ViewEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Focused(focused) => self.events.push(ViewEvent::Focused(focused)),
            _ => {}
        }
    }
}
