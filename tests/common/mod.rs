// Common test utilities for frontend integration tests
//
// This module provides a scripted device (a BwLcd plus a key matrix that
// records every press and release) and helpers for inspecting headless
// render output.

#![allow(dead_code)]

use ti_lcd_frontend::device::{BwLcd, Device, KeyMatrix, LcdController, Scancode};
use ti_lcd_frontend::display::{BitDepth, HeadlessSink, PixelSurface, Rgb};
use ti_lcd_frontend::emulator::{Frontend, FrontendConfig};

/// Clock rate used by the scripted device, chosen so 60 Hz and 100 Hz
/// periods are exact
pub const TEST_CLOCK_RATE: u64 = 600_000;

/// One call made on the key matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press(Scancode),
    Release(Scancode),
}

/// Key matrix that logs calls in order
#[derive(Debug, Default)]
pub struct RecordingKeypad {
    pub actions: Vec<KeyAction>,
}

impl KeyMatrix for RecordingKeypad {
    fn press(&mut self, scancode: Scancode) {
        self.actions.push(KeyAction::Press(scancode));
    }

    fn release(&mut self, scancode: Scancode) {
        self.actions.push(KeyAction::Release(scancode));
    }
}

/// Device whose LCD contents are set directly by the test
pub struct ScriptedDevice {
    pub lcd: BwLcd,
    pub keypad: RecordingKeypad,
    pub cycles: u64,
    /// Extra cycles reported by every `run_cycles` call, like a CPU finishing
    /// a long instruction past its budget
    pub overshoot: u64,
    /// Flip cell (0, 0) on every `run_cycles` call
    pub animate: bool,
}

impl ScriptedDevice {
    /// A device with the display powered on and every cell off
    pub fn new() -> Self {
        let mut lcd = BwLcd::new();
        lcd.set_display_on(true);
        Self {
            lcd,
            keypad: RecordingKeypad::default(),
            cycles: 0,
            overshoot: 0,
            animate: false,
        }
    }
}

impl Device for ScriptedDevice {
    fn clock_rate(&self) -> u64 {
        TEST_CLOCK_RATE
    }

    fn run_cycles(&mut self, cycles: u64) -> u64 {
        if self.animate {
            let on = self.lcd.sample(0, 0);
            self.lcd.set_cell(0, 0, !on);
        }
        let ran = cycles + self.overshoot;
        self.cycles += ran;
        ran
    }

    fn lcd(&self) -> &dyn LcdController {
        &self.lcd
    }

    fn lcd_mut(&mut self) -> &mut dyn LcdController {
        &mut self.lcd
    }

    fn keypad(&mut self) -> &mut dyn KeyMatrix {
        &mut self.keypad
    }
}

/// Headless sink sized for the full LCD at `scale`
pub fn headless_sink(scale: usize) -> HeadlessSink {
    HeadlessSink::new(96 * scale, 64 * scale, BitDepth::Bits32).unwrap()
}

/// Frontend over a scripted device with default configuration
pub fn scripted_frontend() -> Frontend<ScriptedDevice, HeadlessSink> {
    frontend_with(ScriptedDevice::new())
}

/// Frontend over `device` with default configuration
pub fn frontend_with(device: ScriptedDevice) -> Frontend<ScriptedDevice, HeadlessSink> {
    let config = FrontendConfig::default();
    Frontend::new(device, headless_sink(4), &config).unwrap()
}

/// Cycles in one render period of the scripted device
pub fn render_period() -> u64 {
    TEST_CLOCK_RATE / 60
}

/// Whether the surface pixel at `(x, y)` has color `rgb`
pub fn pixel_is(surface: &dyn PixelSurface, x: usize, y: usize, rgb: Rgb) -> bool {
    surface.get_pixel(x, y) == Some(surface.map_rgb(rgb))
}

/// Count surface pixels with color `rgb`
pub fn count_pixels(surface: &dyn PixelSurface, rgb: Rgb) -> usize {
    let target = surface.map_rgb(rgb);
    (0..surface.height())
        .flat_map(|y| (0..surface.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| surface.get_pixel(x, y) == Some(target))
        .count()
}
