// Pixel surface - Row-major pixel buffer with a configurable bit depth
//
// Each supported depth is a PixelFormat; Surface<F> is generic over it so the
// per-pixel byte layout is resolved at compile time and the renderer only
// ever talks to the PixelSurface trait object chosen at creation.

use super::palette::Rgb;
use crate::error::{FrontendError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Supported surface bit depths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BitDepth {
    /// 8 bpp, RGB 3-3-2
    Bits8,
    /// 16 bpp, RGB 5-6-5
    Bits16,
    /// 24 bpp, packed RGB, little-endian byte order
    Bits24,
    /// 32 bpp, XRGB 8-8-8-8
    Bits32,
}

impl BitDepth {
    /// Bits per pixel
    pub fn bits(self) -> u8 {
        match self {
            BitDepth::Bits8 => 8,
            BitDepth::Bits16 => 16,
            BitDepth::Bits24 => 24,
            BitDepth::Bits32 => 32,
        }
    }

    /// Bytes per pixel
    pub fn bytes_per_pixel(self) -> usize {
        self.bits() as usize / 8
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = String;

    fn try_from(bits: u8) -> std::result::Result<Self, Self::Error> {
        match bits {
            8 => Ok(BitDepth::Bits8),
            16 => Ok(BitDepth::Bits16),
            24 => Ok(BitDepth::Bits24),
            32 => Ok(BitDepth::Bits32),
            _ => Err(format!("unsupported bit depth {} (expected 8, 16, 24 or 32)", bits)),
        }
    }
}

impl From<BitDepth> for u8 {
    fn from(depth: BitDepth) -> Self {
        depth.bits()
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bpp", self.bits())
    }
}

/// Byte layout of one pixel
pub trait PixelFormat {
    /// Depth this format implements
    const DEPTH: BitDepth;

    /// Bytes per pixel
    const BYTES: usize;

    /// Convert an RGB color to the native pixel value
    fn map_rgb(color: Rgb) -> u32;

    /// Convert a native pixel value back to RGB (lossy for narrow formats)
    fn unmap(value: u32) -> Rgb;

    /// Store `value` into a `BYTES`-long slice
    fn write(dst: &mut [u8], value: u32);

    /// Load a native value from a `BYTES`-long slice
    fn read(src: &[u8]) -> u32;
}

/// 8 bpp RGB 3-3-2
pub struct Rgb332;

/// 16 bpp RGB 5-6-5
pub struct Rgb565;

/// 24 bpp packed RGB
pub struct Rgb888;

/// 32 bpp XRGB
pub struct Xrgb8888;

// Expand an n-bit channel back to 8 bits
fn expand(value: u32, bits: u32) -> u8 {
    let max = (1 << bits) - 1;
    ((value & max) * 255 / max) as u8
}

impl PixelFormat for Rgb332 {
    const DEPTH: BitDepth = BitDepth::Bits8;
    const BYTES: usize = 1;

    fn map_rgb(color: Rgb) -> u32 {
        ((color.r as u32 >> 5) << 5) | ((color.g as u32 >> 5) << 2) | (color.b as u32 >> 6)
    }

    fn unmap(value: u32) -> Rgb {
        Rgb::new(expand(value >> 5, 3), expand(value >> 2, 3), expand(value, 2))
    }

    fn write(dst: &mut [u8], value: u32) {
        dst[0] = value as u8;
    }

    fn read(src: &[u8]) -> u32 {
        src[0] as u32
    }
}

impl PixelFormat for Rgb565 {
    const DEPTH: BitDepth = BitDepth::Bits16;
    const BYTES: usize = 2;

    fn map_rgb(color: Rgb) -> u32 {
        ((color.r as u32 >> 3) << 11) | ((color.g as u32 >> 2) << 5) | (color.b as u32 >> 3)
    }

    fn unmap(value: u32) -> Rgb {
        Rgb::new(expand(value >> 11, 5), expand(value >> 5, 6), expand(value, 5))
    }

    fn write(dst: &mut [u8], value: u32) {
        dst[..2].copy_from_slice(&(value as u16).to_le_bytes());
    }

    fn read(src: &[u8]) -> u32 {
        u16::from_le_bytes([src[0], src[1]]) as u32
    }
}

impl PixelFormat for Rgb888 {
    const DEPTH: BitDepth = BitDepth::Bits24;
    const BYTES: usize = 3;

    fn map_rgb(color: Rgb) -> u32 {
        ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32
    }

    fn unmap(value: u32) -> Rgb {
        Rgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    fn write(dst: &mut [u8], value: u32) {
        dst[0] = value as u8;
        dst[1] = (value >> 8) as u8;
        dst[2] = (value >> 16) as u8;
    }

    fn read(src: &[u8]) -> u32 {
        src[0] as u32 | (src[1] as u32) << 8 | (src[2] as u32) << 16
    }
}

impl PixelFormat for Xrgb8888 {
    const DEPTH: BitDepth = BitDepth::Bits32;
    const BYTES: usize = 4;

    fn map_rgb(color: Rgb) -> u32 {
        ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32
    }

    fn unmap(value: u32) -> Rgb {
        Rgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    fn write(dst: &mut [u8], value: u32) {
        dst[..4].copy_from_slice(&value.to_le_bytes());
    }

    fn read(src: &[u8]) -> u32 {
        u32::from_le_bytes([src[0], src[1], src[2], src[3]])
    }
}

/// A lockable pixel buffer the renderer draws into
///
/// Colors are native pixel values obtained from `map_rgb`. Writes outside
/// the surface are dropped.
pub trait PixelSurface {
    /// Width in pixels
    fn width(&self) -> usize;

    /// Height in pixels
    fn height(&self) -> usize;

    /// Pixel format depth
    fn depth(&self) -> BitDepth;

    /// Native value for an RGB color
    fn map_rgb(&self, color: Rgb) -> u32;

    /// Store one pixel
    fn set_pixel(&mut self, x: usize, y: usize, color: u32);

    /// Set every pixel to `color`
    fn fill(&mut self, color: u32);

    /// Native value at a pixel, `None` outside the surface
    fn get_pixel(&self, x: usize, y: usize) -> Option<u32>;

    /// RGB color at a pixel, `None` outside the surface
    fn rgb_at(&self, x: usize, y: usize) -> Option<Rgb>;

    /// Raw pixel bytes, `height` rows of `width * bytes_per_pixel`
    fn as_bytes(&self) -> &[u8];

    /// Convert the whole surface into tightly packed RGBA8888
    ///
    /// # Panics
    /// Panics if `output` is shorter than `width * height * 4`
    fn write_rgba(&self, output: &mut [u8]);
}

/// Surface storing pixels in format `F`
pub struct Surface<F: PixelFormat> {
    width: usize,
    height: usize,
    pitch: usize,
    pixels: Vec<u8>,
    format: PhantomData<F>,
}

impl<F: PixelFormat> Surface<F> {
    /// Allocate a zeroed surface
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FrontendError::SurfaceCreation(format!(
                "surface dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }

        let pitch = width.checked_mul(F::BYTES);
        let len = pitch.and_then(|pitch| pitch.checked_mul(height));
        let (Some(pitch), Some(len)) = (pitch, len) else {
            return Err(FrontendError::SurfaceCreation(format!(
                "{}x{} surface at {} is too large",
                width,
                height,
                F::DEPTH
            )));
        };

        Ok(Self {
            width,
            height,
            pitch,
            pixels: vec![0; len],
            format: PhantomData,
        })
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.pitch + x * F::BYTES)
    }
}

impl<F: PixelFormat> PixelSurface for Surface<F> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn depth(&self) -> BitDepth {
        F::DEPTH
    }

    fn map_rgb(&self, color: Rgb) -> u32 {
        F::map_rgb(color)
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if let Some(offset) = self.offset(x, y) {
            F::write(&mut self.pixels[offset..offset + F::BYTES], color);
        }
    }

    fn fill(&mut self, color: u32) {
        if F::BYTES == 1 {
            self.pixels.fill(color as u8);
            return;
        }
        for pixel in self.pixels.chunks_exact_mut(F::BYTES) {
            F::write(pixel, color);
        }
    }

    fn get_pixel(&self, x: usize, y: usize) -> Option<u32> {
        self.offset(x, y)
            .map(|offset| F::read(&self.pixels[offset..offset + F::BYTES]))
    }

    fn rgb_at(&self, x: usize, y: usize) -> Option<Rgb> {
        self.get_pixel(x, y).map(F::unmap)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn write_rgba(&self, output: &mut [u8]) {
        assert!(
            output.len() >= self.width * self.height * 4,
            "Output buffer too small for RGBA conversion"
        );

        for (pixel, rgba) in self
            .pixels
            .chunks_exact(F::BYTES)
            .zip(output.chunks_exact_mut(4))
        {
            rgba.copy_from_slice(&F::unmap(F::read(pixel)).to_rgba());
        }
    }
}

/// Create a surface of the requested depth
///
/// # Errors
/// Returns `FrontendError::SurfaceCreation` for empty or oversized surfaces
pub fn create_surface(width: usize, height: usize, depth: BitDepth) -> Result<Box<dyn PixelSurface>> {
    Ok(match depth {
        BitDepth::Bits8 => Box::new(Surface::<Rgb332>::new(width, height)?),
        BitDepth::Bits16 => Box::new(Surface::<Rgb565>::new(width, height)?),
        BitDepth::Bits24 => Box::new(Surface::<Rgb888>::new(width, height)?),
        BitDepth::Bits32 => Box::new(Surface::<Xrgb8888>::new(width, height)?),
    })
}
