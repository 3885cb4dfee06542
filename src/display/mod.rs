// Display module - LCD rendering onto a host pixel surface
//
// This module provides:
// - Pixel surfaces in 8, 16, 24 and 32 bpp formats
// - The cell-to-pixel transform (Z shift, axis swap, magnification)
// - The dirty-flag driven refresh controller
// - Display sinks for a winit/pixels window or an offscreen buffer

pub mod palette;
pub mod refresh;
pub mod sink;
pub mod surface;
pub mod transform;
pub mod window;

pub use palette::{Rgb, BACKGROUND, PIXEL_OFF, PIXEL_ON, STARTUP_FILL};
pub use refresh::{DirtyFlag, RefreshController};
pub use sink::{DisplaySink, HeadlessSink};
pub use surface::{create_surface, BitDepth, PixelFormat, PixelSurface, Surface};
pub use transform::{BlockRect, DisplayTransform, ScaleFactor};
pub use window::{run_window, FrontendWindow, WindowConfig, WindowSink};
