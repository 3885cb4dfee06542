// Window module - Host window and frame presentation
//
// The window is created with winit and presented through the pixels crate.
// Window events are translated into HostEvents and queued on the frontend;
// the emulation itself runs in slices from `about_to_wait`, optionally paced
// so one emulated second takes about one host second.

use super::sink::DisplaySink;
use super::surface::{create_surface, BitDepth, PixelSurface};
use crate::device::{Device, LCD_COLS, LCD_ROWS};
use crate::emulator::{Frontend, FrontendConfig, MAX_SCALE};
use crate::error::{FrontendError, Result};
use crate::input::translate_window_event;
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Window configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    /// Scale factor (1x to 8x)
    pub scale: u32,
    /// Surface bit depth
    pub bit_depth: BitDepth,
    /// Window title
    pub title: String,
    /// Emulation slices per host second
    pub slice_hz: u32,
    /// Pace emulation to the wall clock
    pub throttle: bool,
}

impl WindowConfig {
    /// Create a window configuration from the default frontend settings
    pub fn new() -> Self {
        Self::from_config(&FrontendConfig::default())
    }

    /// Derive the window settings from the frontend configuration
    ///
    /// One emulation slice runs per render tick period.
    pub fn from_config(config: &FrontendConfig) -> Self {
        Self {
            scale: config.video.scale.clamp(1, MAX_SCALE),
            bit_depth: config.video.bit_depth,
            title: config.video.title.clone(),
            slice_hz: config.timing.render_hz.max(1),
            throttle: config.timing.throttle,
        }
    }

    /// Set the scale factor
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(1, MAX_SCALE);
        self
    }

    /// Set the surface bit depth
    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    /// Set the window title
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set how many emulation slices run per host second
    pub fn with_slice_rate(mut self, slice_hz: u32) -> Self {
        self.slice_hz = slice_hz.max(1);
        self
    }

    /// Enable or disable wall-clock pacing
    pub fn with_throttle(mut self, throttle: bool) -> Self {
        self.throttle = throttle;
        self
    }

    /// Window width in pixels
    pub fn window_width(&self) -> u32 {
        LCD_ROWS as u32 * self.scale
    }

    /// Window height in pixels
    pub fn window_height(&self) -> u32 {
        LCD_COLS as u32 * self.scale
    }

    /// Host time budget for one emulation slice
    pub fn slice_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.slice_hz as u64)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Display sink backed by a window
pub struct WindowSink {
    surface: Box<dyn PixelSurface>,
    pixels: Pixels<'static>,
}

impl WindowSink {
    /// Attach a pixel surface of the configured size and depth to `window`
    ///
    /// # Errors
    /// `SurfaceCreation` if the GPU surface or pixel buffer cannot be created
    pub fn new(window: Arc<Window>, config: &WindowConfig) -> Result<Self> {
        let (width, height) = (config.window_width(), config.window_height());
        let surface = create_surface(width as usize, height as usize, config.bit_depth)?;

        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(width, height, surface_texture)
            .map_err(|e| FrontendError::SurfaceCreation(e.to_string()))?;

        Ok(Self { surface, pixels })
    }

    /// Follow a change of the window's inner size
    pub fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }
        self.pixels
            .resize_surface(size.width, size.height)
            .map_err(|e| FrontendError::Present(e.to_string()))
    }
}

impl DisplaySink for WindowSink {
    fn lock(&mut self) -> Result<&mut dyn PixelSurface> {
        Ok(self.surface.as_mut())
    }

    fn present(&mut self) -> Result<()> {
        self.surface.write_rgba(self.pixels.frame_mut());
        self.pixels
            .render()
            .map_err(|e| FrontendError::Present(e.to_string()))
    }

    fn surface(&self) -> &dyn PixelSurface {
        self.surface.as_ref()
    }
}

/// Application handler hosting the frontend in a window
pub struct FrontendWindow<D: Device> {
    config: FrontendConfig,
    window_config: WindowConfig,
    device: Option<D>,
    frontend: Option<Frontend<D, WindowSink>>,
    last_slice: Instant,
    error: Option<FrontendError>,
}

impl<D: Device> FrontendWindow<D> {
    /// Create the handler; the window is created when the event loop resumes
    pub fn new(config: FrontendConfig, device: D) -> Self {
        Self {
            window_config: WindowConfig::from_config(&config),
            config,
            device: Some(device),
            frontend: None,
            last_slice: Instant::now(),
            error: None,
        }
    }

    /// The running frontend, once the window exists
    pub fn frontend(&self) -> Option<&Frontend<D, WindowSink>> {
        self.frontend.as_ref()
    }

    /// Take the fatal error that ended the event loop, if any
    pub fn take_error(&mut self) -> Option<FrontendError> {
        self.error.take()
    }

    fn create_frontend(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.window_config.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.window_config.window_width(),
                self.window_config.window_height(),
            ))
            .with_resizable(true);

        let window = event_loop
            .create_window(attributes)
            .map_err(|e| FrontendError::SurfaceCreation(e.to_string()))?;
        // The pixels surface keeps the window alive from here on
        let sink = WindowSink::new(Arc::new(window), &self.window_config)?;
        let device = self
            .device
            .take()
            .ok_or_else(|| FrontendError::SurfaceCreation("device already attached".to_string()))?;

        self.frontend = Some(Frontend::new(device, sink, &self.config)?);
        self.last_slice = Instant::now();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: FrontendError) {
        tracing::error!(%error, "fatal frontend error");
        self.error = Some(error);
        event_loop.exit();
    }

    /// Check if the next emulation slice is due
    fn should_run_slice(&mut self) -> bool {
        if !self.window_config.throttle {
            return true;
        }
        if self.last_slice.elapsed() >= self.window_config.slice_duration() {
            self.last_slice = Instant::now();
            true
        } else {
            false
        }
    }
}

impl<D: Device> ApplicationHandler for FrontendWindow<D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.frontend.is_some() {
            return;
        }

        if let Err(e) = self.create_frontend(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        tracing::info!(
            width = self.window_config.window_width(),
            height = self.window_config.window_height(),
            scale = self.window_config.scale,
            depth = %self.window_config.bit_depth,
            "window created"
        );
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(frontend) = self.frontend.as_mut() else {
            return;
        };

        if let WindowEvent::Resized(size) = event {
            if let Err(e) = frontend.sink_mut().resize(size) {
                tracing::warn!(error = %e, "surface resize failed");
            }
        }

        if let Some(host_event) = translate_window_event(&event) {
            frontend.push_event(host_event);
        }

        if frontend.is_stopped() {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.frontend.is_none() {
            return;
        }

        if self.should_run_slice() {
            let Some(frontend) = self.frontend.as_mut() else {
                return;
            };
            let slice = frontend.device().clock_rate() / self.window_config.slice_hz as u64;
            if let Err(e) = frontend.run_for(slice) {
                self.fail(event_loop, e);
                return;
            }
        }

        if self.frontend.as_ref().is_some_and(|f| f.is_stopped()) {
            tracing::info!("stopping event loop");
            event_loop.exit();
        } else if self.window_config.throttle {
            event_loop.set_control_flow(ControlFlow::WaitUntil(
                self.last_slice + self.window_config.slice_duration(),
            ));
        } else {
            event_loop.set_control_flow(ControlFlow::Poll);
        }
    }
}

/// Create the window and run `device` until the user quits
///
/// # Errors
/// Window or surface creation failure, or a fatal render error
pub fn run_window<D: Device>(config: FrontendConfig, device: D) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = FrontendWindow::new(config, device);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
