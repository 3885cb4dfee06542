// Device module - Interfaces to the emulated calculator
//
// The CPU core, memory-mapped units and flash live outside this crate. The
// frontend only needs:
// - read access to the monochrome LCD controller plus a change hook
// - press/release on the key matrix
// - a way to step the CPU by a number of clock cycles
//
// A small reference implementation (BwLcd, KeypadMatrix, DemoDevice) lets the
// frontend run and be tested without an external core.

mod demo;
mod keypad;
mod lcd;

pub use demo::{DemoDevice, DEMO_CLOCK_RATE};
pub use keypad::{KeypadMatrix, Scancode, KEYPAD_GROUPS};
pub use lcd::{BwLcd, LCD_COLS, LCD_ROWS};

/// Callback invoked whenever the LCD controller's visible state changes
pub type ChangeHook = Box<dyn FnMut()>;

/// Read side of a monochrome LCD controller
///
/// Cells are addressed as `(row, col)` with `row` running along the 96-cell
/// axis and `col` along the 64-cell axis that the shift register rotates.
pub trait LcdController {
    /// Grid dimensions as `(rows, cols)`
    fn dimensions(&self) -> (usize, usize);

    /// Raw stored bit for a cell, ignoring the display-enable flag
    fn sample(&self, row: usize, col: usize) -> bool;

    /// Whether the panel is powered and showing its contents
    fn display_on(&self) -> bool;

    /// Current value of the Z (shift) register, in `[0, cols)`
    fn z_shift(&self) -> usize;

    /// Register a hook fired on every state mutation
    fn add_change_hook(&mut self, hook: ChangeHook);

    /// Effective pixel value: always off while the display is disabled
    fn read_screen(&self, row: usize, col: usize) -> bool {
        self.display_on() && self.sample(row, col)
    }
}

/// Write side of the device's physical key matrix
pub trait KeyMatrix {
    /// Hold down the key at `scancode`
    fn press(&mut self, scancode: Scancode);

    /// Release the key at `scancode`
    fn release(&mut self, scancode: Scancode);
}

/// An emulated calculator as seen from the frontend
pub trait Device {
    /// Emulated CPU clock in Hz; timer rates are expressed against it
    fn clock_rate(&self) -> u64;

    /// Execute roughly `cycles` clock cycles and return how many actually ran
    ///
    /// Implementations may overshoot by the length of one instruction.
    fn run_cycles(&mut self, cycles: u64) -> u64;

    /// The LCD controller
    fn lcd(&self) -> &dyn LcdController;

    /// Mutable LCD controller access, used to install change hooks
    fn lcd_mut(&mut self) -> &mut dyn LcdController;

    /// The key matrix
    fn keypad(&mut self) -> &mut dyn KeyMatrix;

    /// Whether the device halted on its own
    fn is_stopped(&self) -> bool {
        false
    }
}
