// Input pump - Drains host events into the emulated key matrix
//
// Runs on its own scheduler tick. Every call empties the event queue in
// arrival order without waiting for more. Key events are forwarded one by
// one (no coalescing), redraw requests mark the display dirty and a quit
// request raises the stop signal and ends the batch.

use super::events::{EventSource, HostEvent};
use super::keymap::KeyMap;
use crate::device::KeyMatrix;
use crate::display::DirtyFlag;
use crate::emulator::StopSignal;
use winit::keyboard::KeyCode;

/// Summary of one pump tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpOutcome {
    /// Events taken from the queue
    pub events: usize,
    /// Press/release operations delivered to the device
    pub key_events: usize,
    /// A quit request was seen
    pub quit: bool,
    /// The screenshot hotkey was pressed
    pub screenshot: bool,
}

/// Polls host input once per tick
pub struct InputPump {
    keymap: KeyMap,
    screenshot_key: Option<KeyCode>,
}

impl InputPump {
    /// Create a pump translating keys through `keymap`
    pub fn new(keymap: KeyMap) -> Self {
        Self {
            keymap,
            screenshot_key: None,
        }
    }

    /// Reserve a host key for taking screenshots
    ///
    /// The hotkey is never forwarded to the device, even if the key map
    /// binds it.
    pub fn with_screenshot_key(mut self, key: KeyCode) -> Self {
        self.screenshot_key = Some(key);
        self
    }

    /// The key map in use
    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Input tick
    pub fn on_tick(
        &mut self,
        events: &mut dyn EventSource,
        keypad: &mut dyn KeyMatrix,
        dirty: &DirtyFlag,
        stop: &StopSignal,
    ) -> PumpOutcome {
        let mut outcome = PumpOutcome::default();

        while let Some(event) = events.poll_event() {
            outcome.events += 1;

            match event {
                HostEvent::KeyDown(key) if Some(key) == self.screenshot_key => {
                    outcome.screenshot = true;
                }
                HostEvent::KeyUp(key) if Some(key) == self.screenshot_key => {}
                HostEvent::KeyDown(key) => {
                    if let Some(scancode) = self.keymap.lookup(key) {
                        tracing::trace!(?key, %scancode, "key press");
                        keypad.press(scancode);
                        outcome.key_events += 1;
                    }
                }
                HostEvent::KeyUp(key) => {
                    if let Some(scancode) = self.keymap.lookup(key) {
                        tracing::trace!(?key, %scancode, "key release");
                        keypad.release(scancode);
                        outcome.key_events += 1;
                    }
                }
                HostEvent::RedrawRequest => dirty.mark(),
                HostEvent::Quit => {
                    tracing::info!("quit requested");
                    stop.request();
                    outcome.quit = true;
                    break;
                }
                HostEvent::Other => {}
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{KeypadMatrix, Scancode};
    use crate::input::events::EventQueue;

    struct Harness {
        pump: InputPump,
        queue: EventQueue,
        keypad: KeypadMatrix,
        dirty: DirtyFlag,
        stop: StopSignal,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                pump: InputPump::new(KeyMap::new()).with_screenshot_key(KeyCode::F9),
                queue: EventQueue::new(),
                keypad: KeypadMatrix::new(),
                dirty: DirtyFlag::new(),
                stop: StopSignal::new(),
            }
        }

        fn tick(&mut self) -> PumpOutcome {
            self.pump
                .on_tick(&mut self.queue, &mut self.keypad, &self.dirty, &self.stop)
        }
    }

    #[test]
    fn test_empty_queue() {
        let mut h = Harness::new();
        assert_eq!(h.tick(), PumpOutcome::default());
    }

    #[test]
    fn test_key_down_presses() {
        let mut h = Harness::new();
        h.queue.push(HostEvent::KeyDown(KeyCode::Digit1));
        let outcome = h.tick();
        assert_eq!(outcome.key_events, 1);
        assert!(h.keypad.is_pressed(Scancode(0x41)));
        assert!(h.queue.is_empty());
    }

    #[test]
    fn test_unmapped_key_ignored() {
        let mut h = Harness::new();
        h.queue.push(HostEvent::KeyDown(KeyCode::KeyZ));
        h.queue.push(HostEvent::Other);
        let outcome = h.tick();
        assert_eq!(outcome.events, 2);
        assert_eq!(outcome.key_events, 0);
        assert_eq!(h.keypad, KeypadMatrix::new());
    }

    #[test]
    fn test_redraw_marks_dirty() {
        let mut h = Harness::new();
        h.queue.push(HostEvent::RedrawRequest);
        h.tick();
        assert!(h.dirty.is_set());
    }

    #[test]
    fn test_quit_stops_batch() {
        let mut h = Harness::new();
        h.queue.push(HostEvent::Quit);
        h.queue.push(HostEvent::KeyDown(KeyCode::Enter));
        let outcome = h.tick();
        assert!(outcome.quit);
        assert!(h.stop.is_requested());
        assert!(!h.keypad.is_pressed(Scancode(0x10)));
    }

    #[test]
    fn test_screenshot_hotkey_not_forwarded() {
        let mut h = Harness::new();
        h.pump = InputPump::new(KeyMap::new().with_binding(KeyCode::F9, Scancode(0x11)))
            .with_screenshot_key(KeyCode::F9);
        h.queue.push(HostEvent::KeyDown(KeyCode::F9));
        h.queue.push(HostEvent::KeyUp(KeyCode::F9));
        let outcome = h.tick();
        assert!(outcome.screenshot);
        assert_eq!(outcome.key_events, 0);
        assert!(!h.keypad.is_pressed(Scancode(0x11)));
    }
}
