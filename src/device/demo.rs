// Demo device - stand-in for a real emulation core
//
// Burns clock cycles without executing code, and every 1/30 s of emulated
// time redraws the LCD with a border and the live key-matrix state (one block
// per key). With scrolling enabled the Z register advances eight times per
// emulated second.

use super::{BwLcd, Device, KeyMatrix, KeypadMatrix, LcdController, KEYPAD_GROUPS, LCD_COLS, LCD_ROWS};

/// Clock rate of the TI-84 Plus SE in fast mode
pub const DEMO_CLOCK_RATE: u64 = 15_000_000;

const FRAME_CYCLES: u64 = DEMO_CLOCK_RATE / 30;
const SCROLL_CYCLES: u64 = DEMO_CLOCK_RATE / 8;

/// Reference device that visualizes its own key matrix
pub struct DemoDevice {
    lcd: BwLcd,
    keypad: KeypadMatrix,
    scroll: bool,
    cycles: u64,
    next_frame: u64,
    next_scroll: u64,
}

impl DemoDevice {
    /// Create a powered-on demo device
    pub fn new(scroll: bool) -> Self {
        let mut lcd = BwLcd::new();
        lcd.set_display_on(true);

        Self {
            lcd,
            keypad: KeypadMatrix::new(),
            scroll,
            cycles: 0,
            next_frame: 0,
            next_scroll: SCROLL_CYCLES,
        }
    }

    /// Total cycles executed so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Current key-matrix state
    pub fn keypad_state(&self) -> &KeypadMatrix {
        &self.keypad
    }

    fn draw_frame(&mut self) {
        for row in 0..LCD_ROWS {
            for col in 0..LCD_COLS {
                let border = row == 0 || row == LCD_ROWS - 1 || col == 0 || col == LCD_COLS - 1;
                self.lcd.set_cell(row, col, border || self.key_cell(row, col));
            }
        }
    }

    // Keys are laid out as 8x8 blocks of 8x5 cells: groups along the long
    // axis, key bits along the short one.
    fn key_cell(&self, row: usize, col: usize) -> bool {
        if !(8..88).contains(&row) || !(8..56).contains(&col) {
            return false;
        }
        let (group, row_in_block) = ((row - 8) / 10, (row - 8) % 10);
        let (bit, col_in_block) = ((col - 8) / 6, (col - 8) % 6);
        if row_in_block >= 8 || col_in_block >= 5 || group >= KEYPAD_GROUPS {
            return false;
        }
        self.keypad.group_state(group) & (1 << bit) != 0
    }
}

impl Default for DemoDevice {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Device for DemoDevice {
    fn clock_rate(&self) -> u64 {
        DEMO_CLOCK_RATE
    }

    fn run_cycles(&mut self, cycles: u64) -> u64 {
        self.cycles += cycles;

        if self.cycles >= self.next_frame {
            self.draw_frame();
            while self.next_frame <= self.cycles {
                self.next_frame += FRAME_CYCLES;
            }
        }

        if self.scroll && self.cycles >= self.next_scroll {
            let z = self.lcd.z_shift() + 1;
            self.lcd.set_z(z);
            while self.next_scroll <= self.cycles {
                self.next_scroll += SCROLL_CYCLES;
            }
        }

        cycles
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
