// Display sinks - Where rendered surfaces end up
//
// A sink owns the PixelSurface and knows how to flush it to the host. The
// window sink lives in window.rs; HeadlessSink keeps frames in memory for
// tests and the headless run mode.

use super::surface::{create_surface, BitDepth, PixelSurface};
use crate::error::Result;

/// Destination for rendered frames
pub trait DisplaySink {
    /// Take exclusive access to the surface for one render pass
    ///
    /// The returned borrow is the lock; it must be dropped before `present`.
    fn lock(&mut self) -> Result<&mut dyn PixelSurface>;

    /// Flush the surface to the host display
    fn present(&mut self) -> Result<()>;

    /// Read-only view of the surface
    fn surface(&self) -> &dyn PixelSurface;
}

/// In-memory sink that counts presented frames
pub struct HeadlessSink {
    surface: Box<dyn PixelSurface>,
    locks: u64,
    presents: u64,
}

impl HeadlessSink {
    /// Create a headless sink with a freshly allocated surface
    pub fn new(width: usize, height: usize, depth: BitDepth) -> Result<Self> {
        Ok(Self::with_surface(create_surface(width, height, depth)?))
    }

    /// Wrap an existing surface
    pub fn with_surface(surface: Box<dyn PixelSurface>) -> Self {
        Self {
            surface,
            locks: 0,
            presents: 0,
        }
    }

    /// Number of times the surface was locked
    pub fn lock_count(&self) -> u64 {
        self.locks
    }

    /// Number of frames presented
    pub fn present_count(&self) -> u64 {
        self.presents
    }
}

impl DisplaySink for HeadlessSink {
    fn lock(&mut self) -> Result<&mut dyn PixelSurface> {
        self.locks += 1;
        Ok(self.surface.as_mut())
    }

    fn present(&mut self) -> Result<()> {
        self.presents += 1;
        Ok(())
    }

    fn surface(&self) -> &dyn PixelSurface {
        self.surface.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_sink_counters() {
        let mut sink = HeadlessSink::new(96, 64, BitDepth::Bits16).unwrap();
        assert_eq!(sink.lock_count(), 0);
        assert_eq!(sink.present_count(), 0);

        sink.lock().unwrap().fill(0x1234);
        sink.present().unwrap();

        assert_eq!(sink.lock_count(), 1);
        assert_eq!(sink.present_count(), 1);
        assert_eq!(sink.surface().get_pixel(95, 63), Some(0x1234));
    }
}
