// Monochrome LCD controller model
//
// A T6A04-style grid of 96 x 64 bits. Each row along the 96-cell axis is
// packed into one u64, bit `col` holding the cell at that column.

use super::{ChangeHook, LcdController};

/// Cells along the long (horizontal on screen) axis
pub const LCD_ROWS: usize = 96;

/// Cells along the short axis, the one rotated by the Z register
pub const LCD_COLS: usize = 64;

/// Bit-packed monochrome LCD state
pub struct BwLcd {
    cells: [u64; LCD_ROWS],
    display_on: bool,
    z: usize,
    hooks: Vec<ChangeHook>,
}

impl BwLcd {
    /// Create a powered-down LCD with every cell cleared
    pub fn new() -> Self {
        Self {
            cells: [0; LCD_ROWS],
            display_on: false,
            z: 0,
            hooks: Vec::new(),
        }
    }

    /// Set a single cell; coordinates outside the grid are ignored
    pub fn set_cell(&mut self, row: usize, col: usize, on: bool) {
        if row >= LCD_ROWS || col >= LCD_COLS {
            return;
        }

        let before = self.cells[row];
        if on {
            self.cells[row] |= 1 << col;
        } else {
            self.cells[row] &= !(1 << col);
        }

        if self.cells[row] != before {
            self.notify();
        }
    }

    /// Clear every cell
    pub fn clear(&mut self) {
        if self.cells.iter().any(|&row| row != 0) {
            self.cells = [0; LCD_ROWS];
            self.notify();
        }
    }

    /// Power the panel on or off
    pub fn set_display_on(&mut self, on: bool) {
        if self.display_on != on {
            self.display_on = on;
            self.notify();
        }
    }

    /// Write the Z register; the value wraps modulo 64
    pub fn set_z(&mut self, z: usize) {
        let z = z % LCD_COLS;
        if self.z != z {
            self.z = z;
            self.notify();
        }
    }

    fn notify(&mut self) {
        for hook in self.hooks.iter_mut() {
            hook();
        }
    }
}

impl Default for BwLcd {
    fn default() -> Self {
        Self::new()
    }
}

impl LcdController for BwLcd {
    fn dimensions(&self) -> (usize, usize) {
        (LCD_ROWS, LCD_COLS)
    }

    fn sample(&self, row: usize, col: usize) -> bool {
        row < LCD_ROWS && col < LCD_COLS && self.cells[row] & (1 << col) != 0
    }

    fn display_on(&self) -> bool {
        self.display_on
    }

    fn z_shift(&self) -> usize {
        self.z
    }

    fn add_change_hook(&mut self, hook: ChangeHook) {
        self.hooks.push(hook);
    }
}
