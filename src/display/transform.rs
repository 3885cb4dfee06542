// Display transform - LCD cell addresses to destination pixel blocks
//
// The controller's Z register rotates the 64-cell axis: cell (row, col) shows
// the stored bit at column (col + Z) mod 64. Placement on the surface uses
// the unshifted column, and the axes are swapped on the way out: the 96-cell
// row axis runs along destination x, the 64-cell column axis along y.

use super::surface::PixelSurface;
use crate::device::LCD_COLS;
use std::num::NonZeroUsize;

/// Uniform magnification applied to both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScaleFactor(NonZeroUsize);

impl ScaleFactor {
    /// 1:1 scale
    pub const ONE: ScaleFactor = ScaleFactor(NonZeroUsize::MIN);

    /// Create a scale factor; zero is rejected
    pub fn new(scale: usize) -> Option<Self> {
        NonZeroUsize::new(scale).map(ScaleFactor)
    }

    /// The factor as a plain integer
    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// Destination rectangle covered by one LCD cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRect {
    /// Left edge in surface pixels
    pub x: usize,
    /// Top edge in surface pixels
    pub y: usize,
    /// Edge length in pixels
    pub size: usize,
}

/// Maps LCD cells onto a scaled destination surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTransform {
    scale: ScaleFactor,
}

impl DisplayTransform {
    /// Create a transform at the given magnification
    pub fn new(scale: ScaleFactor) -> Self {
        Self { scale }
    }

    /// The magnification in use
    pub fn scale(&self) -> ScaleFactor {
        self.scale
    }

    /// Column actually sampled for `col` under shift register `z`
    #[inline]
    pub fn effective_col(col: usize, z: usize) -> usize {
        (col + z) % LCD_COLS
    }

    /// Destination block for cell `(row, col)`
    #[inline]
    pub fn block(&self, row: usize, col: usize) -> BlockRect {
        let size = self.scale.get();
        BlockRect {
            x: row * size,
            y: col * size,
            size,
        }
    }

    /// Fill `rect` with `color`, clipping against the surface edges
    pub fn plot_block(surface: &mut dyn PixelSurface, rect: BlockRect, color: u32) {
        let x_end = (rect.x + rect.size).min(surface.width());
        let y_end = (rect.y + rect.size).min(surface.height());

        for y in rect.y..y_end {
            for x in rect.x..x_end {
                surface.set_pixel(x, y, color);
            }
        }
    }
}
