// Refresh controller - Dirty-flag driven LCD redraw
//
// The LCD controller marks the shared DirtyFlag every time its state changes.
// On each render tick the controller checks the flag; if set, it repaints the
// whole 96x64 grid in one locked pass, presents, and only then clears the
// flag. Any number of marks between ticks collapse into a single render.

use super::palette::{BACKGROUND, PIXEL_OFF, PIXEL_ON};
use super::sink::DisplaySink;
use super::transform::{DisplayTransform, ScaleFactor};
use crate::device::{LcdController, LCD_COLS, LCD_ROWS};
use crate::error::{FrontendError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Coalescing "display needs repainting" marker
///
/// Clones share the same flag, so one handle can live in the LCD change hook
/// while another sits in the refresh controller.
#[derive(Debug, Clone, Default)]
pub struct DirtyFlag(Arc<AtomicBool>);

impl DirtyFlag {
    /// Create a clear flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a repaint
    pub fn mark(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a repaint is pending
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Acknowledge a completed repaint
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Renders the LCD into a display sink whenever it is dirty
pub struct RefreshController {
    transform: DisplayTransform,
    dirty: DirtyFlag,
    renders: u64,
}

impl RefreshController {
    /// Create a controller drawing at `scale`, watching `dirty`
    pub fn new(scale: ScaleFactor, dirty: DirtyFlag) -> Self {
        Self {
            transform: DisplayTransform::new(scale),
            dirty,
            renders: 0,
        }
    }

    /// The flag this controller clears after each render
    pub fn dirty_flag(&self) -> &DirtyFlag {
        &self.dirty
    }

    /// Number of completed render passes
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Render tick
    ///
    /// Returns `Ok(true)` if a frame was rendered and presented, `Ok(false)`
    /// if the display was clean and the sink was not touched.
    ///
    /// # Errors
    /// `DisplayMismatch` if the controller is not a 96x64 grid; any lock or
    /// present failure from the sink. The flag stays set on error.
    pub fn on_tick(&mut self, lcd: &dyn LcdController, sink: &mut dyn DisplaySink) -> Result<bool> {
        if !self.dirty.is_set() {
            return Ok(false);
        }

        let (rows, cols) = lcd.dimensions();
        if (rows, cols) != (LCD_ROWS, LCD_COLS) {
            return Err(FrontendError::DisplayMismatch {
                rows,
                cols,
                expected_rows: LCD_ROWS,
                expected_cols: LCD_COLS,
            });
        }

        {
            let surface = sink.lock()?;
            let background = surface.map_rgb(BACKGROUND);
            let on = surface.map_rgb(PIXEL_ON);
            let off = surface.map_rgb(PIXEL_OFF);

            surface.fill(background);

            let z = lcd.z_shift();
            for col in 0..LCD_COLS {
                let sampled_col = DisplayTransform::effective_col(col, z);
                for row in 0..LCD_ROWS {
                    let color = if lcd.read_screen(row, sampled_col) { on } else { off };
                    DisplayTransform::plot_block(surface, self.transform.block(row, col), color);
                }
            }
        }

        sink.present()?;
        self.dirty.clear();
        self.renders += 1;

        tracing::trace!(frame = self.renders, z = lcd.z_shift(), "LCD frame presented");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{BwLcd, ChangeHook};
    use crate::display::sink::HeadlessSink;
    use crate::display::surface::BitDepth;

    struct OddLcd;

    impl LcdController for OddLcd {
        fn dimensions(&self) -> (usize, usize) {
            (120, 64)
        }
        fn sample(&self, _row: usize, _col: usize) -> bool {
            false
        }
        fn display_on(&self) -> bool {
            true
        }
        fn z_shift(&self) -> usize {
            0
        }
        fn add_change_hook(&mut self, _hook: ChangeHook) {}
    }

    fn setup(scale: usize) -> (RefreshController, HeadlessSink) {
        let scale = ScaleFactor::new(scale).unwrap();
        let sink = HeadlessSink::new(96 * scale.get(), 64 * scale.get(), BitDepth::Bits32).unwrap();
        (RefreshController::new(scale, DirtyFlag::new()), sink)
    }

    #[test]
    fn test_dirty_flag_shared_between_clones() {
        let flag = DirtyFlag::new();
        let hook_side = flag.clone();
        assert!(!flag.is_set());
        hook_side.mark();
        assert!(flag.is_set());
        flag.clear();
        assert!(!hook_side.is_set());
    }

    #[test]
    fn test_clean_tick_touches_nothing() {
        let (mut refresh, mut sink) = setup(1);
        let lcd = BwLcd::new();
        assert!(!refresh.on_tick(&lcd, &mut sink).unwrap());
        assert_eq!(sink.lock_count(), 0);
        assert_eq!(sink.present_count(), 0);
    }

    #[test]
    fn test_dirty_tick_renders_and_clears() {
        let (mut refresh, mut sink) = setup(2);
        let lcd = BwLcd::new();
        refresh.dirty_flag().mark();

        assert!(refresh.on_tick(&lcd, &mut sink).unwrap());
        assert!(!refresh.dirty_flag().is_set());
        assert_eq!(sink.present_count(), 1);
        assert_eq!(refresh.render_count(), 1);
    }

    #[test]
    fn test_display_off_renders_all_off() {
        let (mut refresh, mut sink) = setup(1);
        let mut lcd = BwLcd::new();
        lcd.set_cell(10, 10, true);
        refresh.dirty_flag().mark();
        refresh.on_tick(&lcd, &mut sink).unwrap();

        let off = sink.surface().map_rgb(PIXEL_OFF);
        assert_eq!(sink.surface().get_pixel(10, 10), Some(off));
    }

    #[test]
    fn test_z_shift_moves_image_up() {
        let (mut refresh, mut sink) = setup(1);
        let mut lcd = BwLcd::new();
        lcd.set_display_on(true);
        lcd.set_cell(5, 10, true);
        lcd.set_z(4);
        refresh.dirty_flag().mark();
        refresh.on_tick(&lcd, &mut sink).unwrap();

        // stored column 10 shows up at destination column 10 - Z
        let on = sink.surface().map_rgb(PIXEL_ON);
        assert_eq!(sink.surface().get_pixel(5, 6), Some(on));
        assert_ne!(sink.surface().get_pixel(5, 10), Some(on));
    }

    #[test]
    fn test_dimension_mismatch_is_fatal() {
        let (mut refresh, mut sink) = setup(1);
        refresh.dirty_flag().mark();
        let result = refresh.on_tick(&OddLcd, &mut sink);

        assert!(matches!(
            result,
            Err(FrontendError::DisplayMismatch { rows: 120, cols: 64, .. })
        ));
        assert_eq!(sink.lock_count(), 0);
        assert!(refresh.dirty_flag().is_set());
    }
}
