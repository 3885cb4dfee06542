// Key matrix model
//
// The TI-84 Plus SE keyboard is an 8x8 matrix. A scancode packs the group
// (matrix row) in the high nibble and the key bit in the low nibble, so 0x41
// is group 4, bit 1.

use super::KeyMatrix;
use std::fmt;

/// Number of key groups in the matrix
pub const KEYPAD_GROUPS: usize = 8;

/// One physical key position in the device's key matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scancode(pub u8);

impl Scancode {
    /// Matrix group (high nibble)
    pub fn group(self) -> usize {
        (self.0 >> 4) as usize
    }

    /// Key bit within the group (low nibble)
    pub fn bit(self) -> u8 {
        self.0 & 0x0F
    }

    /// Whether the scancode addresses a real key in an 8x8 matrix
    pub fn is_valid(self) -> bool {
        self.group() < KEYPAD_GROUPS && self.bit() < 8
    }
}

impl fmt::Display for Scancode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Key matrix state, one byte per group with a set bit per held key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeypadMatrix {
    groups: [u8; KEYPAD_GROUPS],
}

impl KeypadMatrix {
    /// Create a matrix with every key released
    pub fn new() -> Self {
        Self::default()
    }

    /// Held-key bits for one group
    pub fn group_state(&self, group: usize) -> u8 {
        self.groups.get(group).copied().unwrap_or(0)
    }

    /// Whether the key at `scancode` is held
    pub fn is_pressed(&self, scancode: Scancode) -> bool {
        scancode.is_valid() && self.groups[scancode.group()] & (1 << scancode.bit()) != 0
    }

    /// Release every key
    pub fn release_all(&mut self) {
        self.groups = [0; KEYPAD_GROUPS];
    }
}

impl KeyMatrix for KeypadMatrix {
    fn press(&mut self, scancode: Scancode) {
        if scancode.is_valid() {
            self.groups[scancode.group()] |= 1 << scancode.bit();
        }
    }

    fn release(&mut self, scancode: Scancode) {
        if scancode.is_valid() {
            self.groups[scancode.group()] &= !(1 << scancode.bit());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scancode_fields() {
        let code = Scancode(0x65);
        assert_eq!(code.group(), 6);
        assert_eq!(code.bit(), 5);
        assert!(code.is_valid());
        assert_eq!(code.to_string(), "0x65");
    }

    #[test]
    fn test_invalid_scancodes() {
        assert!(!Scancode(0x80).is_valid());
        assert!(!Scancode(0x08).is_valid());
    }

    #[test]
    fn test_press_release() {
        let mut keypad = KeypadMatrix::new();
        keypad.press(Scancode(0x41));
        keypad.press(Scancode(0x42));
        assert!(keypad.is_pressed(Scancode(0x41)));
        assert_eq!(keypad.group_state(4), 0b0000_0110);

        keypad.release(Scancode(0x41));
        assert!(!keypad.is_pressed(Scancode(0x41)));
        assert_eq!(keypad.group_state(4), 0b0000_0100);
    }

    #[test]
    fn test_invalid_press_ignored() {
        let mut keypad = KeypadMatrix::new();
        keypad.press(Scancode(0xF0));
        assert_eq!(keypad, KeypadMatrix::new());
    }

    #[test]
    fn test_release_all() {
        let mut keypad = KeypadMatrix::new();
        keypad.press(Scancode(0x00));
        keypad.press(Scancode(0x77));
        keypad.release_all();
        assert_eq!(keypad.group_state(0), 0);
        assert_eq!(keypad.group_state(7), 0);
    }
}
