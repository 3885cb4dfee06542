// Key map - Host keyboard keys to calculator scancodes
//
// The map is built once at startup from a static table (optionally extended
// by the configuration file) and is read-only afterwards.

use crate::device::Scancode;
use crate::error::{FrontendError, Result};
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Default bindings for the TI-84 Plus SE key matrix
const DEFAULT_BINDINGS: &[(KeyCode, u8)] = &[
    // D-pad
    (KeyCode::ArrowDown, 0x00),
    (KeyCode::ArrowLeft, 0x01),
    (KeyCode::ArrowRight, 0x02),
    (KeyCode::ArrowUp, 0x03),
    (KeyCode::Enter, 0x10),
    (KeyCode::Space, 0x40),
    // CLEAR
    (KeyCode::Backspace, 0x16),
    // 2nd
    (KeyCode::ShiftLeft, 0x65),
    // ALPHA
    (KeyCode::ControlLeft, 0x57),
    (KeyCode::Digit0, 0x40),
    (KeyCode::Digit1, 0x41),
    (KeyCode::Digit2, 0x31),
    (KeyCode::Digit3, 0x21),
    (KeyCode::Digit4, 0x42),
    (KeyCode::Digit5, 0x32),
    (KeyCode::Digit6, 0x22),
    (KeyCode::Digit7, 0x43),
    (KeyCode::Digit8, 0x33),
    (KeyCode::Digit9, 0x23),
    // MATH, APPS, PRGM, x^-1, SIN, COS, TAN
    (KeyCode::KeyA, 0x56),
    (KeyCode::KeyB, 0x46),
    (KeyCode::KeyC, 0x36),
    (KeyCode::KeyD, 0x55),
    (KeyCode::KeyE, 0x45),
    (KeyCode::KeyF, 0x35),
    (KeyCode::KeyG, 0x25),
    // +
    (KeyCode::Equal, 0x47),
    (KeyCode::NumpadAdd, 0x47),
    // -
    (KeyCode::Minus, 0x20),
    (KeyCode::NumpadSubtract, 0x20),
    // DEL
    (KeyCode::Delete, 0x67),
    // MODE
    (KeyCode::Escape, 0x66),
];

/// Immutable host-key to scancode table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: HashMap<KeyCode, Scancode>,
}

impl KeyMap {
    /// Key map with the default calculator bindings
    pub fn new() -> Self {
        Self::from_bindings(
            DEFAULT_BINDINGS
                .iter()
                .map(|&(key, code)| (key, Scancode(code))),
        )
    }

    /// Key map with no bindings at all
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Build a key map from explicit pairs; later pairs win
    pub fn from_bindings<I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (KeyCode, Scancode)>,
    {
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    /// Add or replace one binding while building the map
    pub fn with_binding(mut self, key: KeyCode, scancode: Scancode) -> Self {
        self.bindings.insert(key, scancode);
        self
    }

    /// Apply named overrides, e.g. from a configuration file
    ///
    /// # Errors
    /// `UnknownKey` if a name is not a recognized key
    pub fn with_named_overrides<'a, I>(mut self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, u8)>,
    {
        for (name, code) in overrides {
            let key = parse_key_name(name)?;
            self.bindings.insert(key, Scancode(code));
        }
        Ok(self)
    }

    /// Scancode bound to `key`, if any
    #[inline]
    pub fn lookup(&self, key: KeyCode) -> Option<Scancode> {
        self.bindings.get(&key).copied()
    }

    /// Number of bound keys
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the map has no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over all bindings in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (KeyCode, Scancode)> + '_ {
        self.bindings.iter().map(|(&key, &code)| (key, code))
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Name of a key as used in configuration files (e.g. "KeyX", "F9")
pub fn key_name(key: KeyCode) -> String {
    format!("{:?}", key)
}

/// Parse a configuration key name
///
/// # Errors
/// `UnknownKey` for names outside the supported set
pub fn parse_key_name(name: &str) -> Result<KeyCode> {
    let key = match name {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Digit0" => KeyCode::Digit0,
        "Digit1" => KeyCode::Digit1,
        "Digit2" => KeyCode::Digit2,
        "Digit3" => KeyCode::Digit3,
        "Digit4" => KeyCode::Digit4,
        "Digit5" => KeyCode::Digit5,
        "Digit6" => KeyCode::Digit6,
        "Digit7" => KeyCode::Digit7,
        "Digit8" => KeyCode::Digit8,
        "Digit9" => KeyCode::Digit9,
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        "F3" => KeyCode::F3,
        "F4" => KeyCode::F4,
        "F5" => KeyCode::F5,
        "F6" => KeyCode::F6,
        "F7" => KeyCode::F7,
        "F8" => KeyCode::F8,
        "F9" => KeyCode::F9,
        "F10" => KeyCode::F10,
        "F11" => KeyCode::F11,
        "F12" => KeyCode::F12,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "Enter" => KeyCode::Enter,
        "Space" => KeyCode::Space,
        "Tab" => KeyCode::Tab,
        "Escape" => KeyCode::Escape,
        "Backspace" => KeyCode::Backspace,
        "Delete" => KeyCode::Delete,
        "Insert" => KeyCode::Insert,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Minus" => KeyCode::Minus,
        "Equal" => KeyCode::Equal,
        "Comma" => KeyCode::Comma,
        "Period" => KeyCode::Period,
        "Slash" => KeyCode::Slash,
        "Semicolon" => KeyCode::Semicolon,
        "Quote" => KeyCode::Quote,
        "BracketLeft" => KeyCode::BracketLeft,
        "BracketRight" => KeyCode::BracketRight,
        "NumpadAdd" => KeyCode::NumpadAdd,
        "NumpadSubtract" => KeyCode::NumpadSubtract,
        "NumpadMultiply" => KeyCode::NumpadMultiply,
        "NumpadDivide" => KeyCode::NumpadDivide,
        "NumpadEnter" => KeyCode::NumpadEnter,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "AltLeft" => KeyCode::AltLeft,
        "AltRight" => KeyCode::AltRight,
        _ => return Err(FrontendError::UnknownKey(name.to_string())),
    };
    Ok(key)
}
