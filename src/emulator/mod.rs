// Emulator module - Runloop coordinating the device and the frontend
//
// This module provides the Frontend, which owns the emulated device, the
// display sink and the tick scheduler. One runloop iteration steps the CPU up
// to the next timer deadline and then fires the due render and input ticks,
// all on the calling thread.

mod config;
mod scheduler;
mod screenshot;

pub use config::{
    FrontendConfig, KeymapConfig, ScreenshotConfig, TimingConfig, VideoConfig,
    DEFAULT_CONFIG_FILE, MAX_SCALE,
};
pub use scheduler::TickScheduler;
pub use screenshot::save_screenshot;

use crate::device::{Device, LCD_COLS, LCD_ROWS};
use crate::display::{DirtyFlag, DisplaySink, HeadlessSink, RefreshController, STARTUP_FILL};
use crate::error::Result;
use crate::input::{EventQueue, HostEvent, InputPump};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Which periodic callback a scheduler timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickTarget {
    /// RefreshController tick
    Refresh,
    /// InputPump tick
    Input,
}

/// Process-level shutdown request
///
/// Clones share state, so a handle can be given to a signal handler or
/// another thread.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Create a signal that has not been raised
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the runloop to stop
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a stop was requested
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Frontend runloop
///
/// Owns everything the render and input ticks touch, so no state is shared
/// through globals.
pub struct Frontend<D: Device, S: DisplaySink> {
    device: D,
    sink: S,
    scheduler: TickScheduler<TickTarget>,
    refresh: RefreshController,
    pump: InputPump,
    events: EventQueue,
    dirty: DirtyFlag,
    stop: StopSignal,
    screenshot_dir: PathBuf,
}

impl<D: Device, S: DisplaySink> Frontend<D, S> {
    /// Wire a device to a display sink
    ///
    /// Installs the LCD change hook, registers the render and input timers
    /// and fills the sink with the startup color.
    ///
    /// # Errors
    /// Invalid timer rates or key names in `config`, or a sink that cannot be
    /// locked or presented
    pub fn new(mut device: D, mut sink: S, config: &FrontendConfig) -> Result<Self> {
        let dirty = DirtyFlag::new();
        let hook_flag = dirty.clone();
        device
            .lcd_mut()
            .add_change_hook(Box::new(move || hook_flag.mark()));

        let mut scheduler = TickScheduler::new(device.clock_rate());
        scheduler.add_timer(config.timing.render_hz, TickTarget::Refresh)?;
        scheduler.add_timer(config.timing.input_hz, TickTarget::Input)?;

        let pump =
            InputPump::new(config.build_keymap()?).with_screenshot_key(config.screenshot_key()?);

        {
            let surface = sink.lock()?;
            let color = surface.map_rgb(STARTUP_FILL);
            surface.fill(color);
        }
        sink.present()?;

        tracing::debug!(
            clock_rate = device.clock_rate(),
            render_hz = config.timing.render_hz,
            input_hz = config.timing.input_hz,
            timers = scheduler.timer_count(),
            bindings = pump.keymap().len(),
            "frontend initialized"
        );

        Ok(Self {
            device,
            sink,
            scheduler,
            refresh: RefreshController::new(config.scale_factor(), dirty.clone()),
            pump,
            events: EventQueue::new(),
            dirty,
            stop: StopSignal::new(),
            screenshot_dir: config.screenshot.directory.clone(),
        })
    }

    /// Queue a host event for the next input tick
    pub fn push_event(&mut self, event: HostEvent) {
        self.events.push(event);
    }

    /// The emulated device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the emulated device
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// The display sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the display sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The shared dirty flag
    pub fn dirty_flag(&self) -> &DirtyFlag {
        &self.dirty
    }

    /// A handle to the stop signal
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Render passes completed so far
    pub fn render_count(&self) -> u64 {
        self.refresh.render_count()
    }

    /// Emulated cycles elapsed
    pub fn cycles(&self) -> u64 {
        self.scheduler.now()
    }

    /// Whether the runloop should stop
    pub fn is_stopped(&self) -> bool {
        self.stop.is_requested() || self.device.is_stopped()
    }

    /// One runloop iteration
    ///
    /// Runs the CPU until the next timer deadline, then fires every due
    /// tick. A stop raised by one tick prevents the remaining ticks.
    ///
    /// # Errors
    /// Fatal render failures (display mismatch, present failure)
    pub fn runloop_tick(&mut self) -> Result<()> {
        if self.is_stopped() {
            return Ok(());
        }

        let budget = self.scheduler.cycles_until_next();
        // A device that executes nothing still lets time pass
        let ran = self.device.run_cycles(budget).max(1);
        self.scheduler.advance(ran);

        for target in self.scheduler.take_due() {
            if self.is_stopped() {
                break;
            }

            match target {
                TickTarget::Refresh => {
                    self.refresh.on_tick(self.device.lcd(), &mut self.sink)?;
                }
                TickTarget::Input => {
                    let outcome = self.pump.on_tick(
                        &mut self.events,
                        self.device.keypad(),
                        &self.dirty,
                        &self.stop,
                    );
                    if outcome.screenshot {
                        self.take_screenshot();
                    }
                }
            }
        }

        Ok(())
    }

    /// Run for `cycles` emulated cycles or until stopped
    pub fn run_for(&mut self, cycles: u64) -> Result<()> {
        let target = self.scheduler.now().saturating_add(cycles);
        while !self.is_stopped() && self.scheduler.now() < target {
            self.runloop_tick()?;
        }
        Ok(())
    }

    /// Run until a quit event or the device stops
    pub fn run_until_stopped(&mut self) -> Result<()> {
        while !self.is_stopped() {
            self.runloop_tick()?;
        }
        Ok(())
    }

    /// Mark the display dirty and render immediately
    pub fn force_refresh(&mut self) -> Result<bool> {
        self.dirty.mark();
        self.refresh.on_tick(self.device.lcd(), &mut self.sink)
    }

    /// Save the current surface to the screenshot directory
    ///
    /// Failures are logged, not propagated.
    pub fn take_screenshot(&mut self) -> Option<PathBuf> {
        match save_screenshot(self.sink.surface(), &self.screenshot_dir) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "screenshot failed");
                None
            }
        }
    }
}

/// Run a device without a window for `seconds` of emulated time
///
/// Renders one final frame and writes it as a PNG into `output_dir`.
///
/// # Returns
///
/// The path of the written screenshot
pub fn run_headless<D: Device>(
    device: D,
    config: &FrontendConfig,
    seconds: u64,
    output_dir: &Path,
) -> Result<PathBuf> {
    let scale = config.scale_factor().get();
    let sink = HeadlessSink::new(LCD_ROWS * scale, LCD_COLS * scale, config.video.bit_depth)?;
    let mut frontend = Frontend::new(device, sink, config)?;

    let cycles = frontend.device().clock_rate().saturating_mul(seconds);
    tracing::info!(seconds, cycles, "running headless");
    frontend.run_for(cycles)?;
    frontend.force_refresh()?;

    tracing::info!(
        frames = frontend.render_count(),
        presents = frontend.sink().present_count(),
        "headless run finished"
    );
    save_screenshot(frontend.sink().surface(), output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DemoDevice, Scancode};
    use crate::display::{BitDepth, PixelSurface, PIXEL_ON};
    use winit::keyboard::KeyCode;

    fn demo_frontend() -> Frontend<DemoDevice, HeadlessSink> {
        let config = FrontendConfig::default();
        let sink = HeadlessSink::new(96 * 4, 64 * 4, BitDepth::Bits16).unwrap();
        Frontend::new(DemoDevice::new(false), sink, &config).unwrap()
    }

    #[test]
    fn test_stop_signal_shared() {
        let signal = StopSignal::new();
        let other = signal.clone();
        assert!(!signal.is_requested());
        other.request();
        assert!(signal.is_requested());
    }

    #[test]
    fn test_startup_fill_presented() {
        let frontend = demo_frontend();
        let surface = frontend.sink().surface();
        assert_eq!(frontend.sink().present_count(), 1);
        assert_eq!(surface.get_pixel(0, 0), Some(surface.map_rgb(STARTUP_FILL)));
        assert!(!frontend.dirty_flag().is_set());
    }

    #[test]
    fn test_one_second_renders_and_stays_bounded() {
        let mut frontend = demo_frontend();
        let clock = frontend.device().clock_rate();
        frontend.run_for(clock).unwrap();

        // The demo redraws at 30 Hz; render ticks run at 60 Hz
        assert!(frontend.render_count() >= 1);
        assert!(frontend.render_count() <= 60);
        assert!(frontend.cycles() >= clock);
    }

    #[test]
    fn test_key_event_reaches_device() {
        let mut frontend = demo_frontend();
        frontend.push_event(HostEvent::KeyDown(KeyCode::Enter));
        let clock = frontend.device().clock_rate();
        frontend.run_for(clock / 50).unwrap();
        assert!(frontend.device().keypad_state().is_pressed(Scancode(0x10)));

        frontend.push_event(HostEvent::KeyUp(KeyCode::Enter));
        frontend.run_for(clock / 50).unwrap();
        assert!(!frontend.device().keypad_state().is_pressed(Scancode(0x10)));
    }

    #[test]
    fn test_quit_stops_runloop() {
        let mut frontend = demo_frontend();
        frontend.push_event(HostEvent::Quit);
        frontend.run_until_stopped().unwrap();
        assert!(frontend.is_stopped());

        let cycles = frontend.cycles();
        frontend.runloop_tick().unwrap();
        assert_eq!(frontend.cycles(), cycles);
    }

    #[test]
    fn test_force_refresh_draws_border() {
        let mut frontend = demo_frontend();
        frontend.run_for(1).unwrap();
        assert!(frontend.force_refresh().unwrap());

        let surface = frontend.sink().surface();
        assert_eq!(surface.get_pixel(0, 0), Some(surface.map_rgb(PIXEL_ON)));
    }
}
