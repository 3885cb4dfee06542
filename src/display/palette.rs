// LCD palette
//
// The panel only has three visible states: the bezel/background area, a lit
// pixel and an unlit but addressable pixel. A fourth color fills the surface
// before the first frame arrives.

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGBA bytes with full opacity
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xFF]
    }
}

/// Fill color behind the LCD grid
pub const BACKGROUND: Rgb = Rgb::new(0xC6, 0xE6, 0xC6);

/// A pixel the controller reports as lit
pub const PIXEL_ON: Rgb = Rgb::new(0x00, 0x00, 0x00);

/// A pixel the controller reports as unlit
pub const PIXEL_OFF: Rgb = Rgb::new(0x99, 0xB1, 0x99);

/// Shown until the first render pass completes
pub const STARTUP_FILL: Rgb = Rgb::new(0xFF, 0x00, 0x00);
