// Input pump tests
//
// Feed host events through an InputPump into a recording key matrix and
// check what the device sees.

mod common;

use common::{KeyAction, RecordingKeypad};
use ti_lcd_frontend::device::Scancode;
use ti_lcd_frontend::display::DirtyFlag;
use ti_lcd_frontend::emulator::StopSignal;
use ti_lcd_frontend::input::{EventQueue, HostEvent, InputPump, KeyMap};
use winit::keyboard::KeyCode;

struct Harness {
    pump: InputPump,
    queue: EventQueue,
    keypad: RecordingKeypad,
    dirty: DirtyFlag,
    stop: StopSignal,
}

impl Harness {
    fn new() -> Self {
        Self {
            pump: InputPump::new(KeyMap::new()).with_screenshot_key(KeyCode::F9),
            queue: EventQueue::new(),
            keypad: RecordingKeypad::default(),
            dirty: DirtyFlag::new(),
            stop: StopSignal::new(),
        }
    }

    fn feed(&mut self, events: impl IntoIterator<Item = HostEvent>) {
        self.queue.extend(events);
        self.pump
            .on_tick(&mut self.queue, &mut self.keypad, &self.dirty, &self.stop);
    }
}

#[test]
fn test_mapped_key_press_then_release() {
    let mut harness = Harness::new();
    harness.feed([
        HostEvent::KeyDown(KeyCode::Enter),
        HostEvent::KeyUp(KeyCode::Enter),
    ]);

    assert_eq!(
        harness.keypad.actions,
        vec![
            KeyAction::Press(Scancode(0x10)),
            KeyAction::Release(Scancode(0x10)),
        ]
    );
}

#[test]
fn test_unmapped_key_is_ignored() {
    let mut harness = Harness::new();
    harness.feed([HostEvent::KeyDown(KeyCode::F1), HostEvent::KeyUp(KeyCode::F1)]);

    assert!(harness.keypad.actions.is_empty());
    assert!(!harness.dirty.is_set());
    assert!(!harness.stop.is_requested());
}

#[test]
fn test_interleaved_keys_keep_order() {
    let mut harness = Harness::new();
    harness.feed([
        HostEvent::KeyDown(KeyCode::ShiftLeft),
        HostEvent::KeyDown(KeyCode::ArrowUp),
        HostEvent::KeyUp(KeyCode::ShiftLeft),
        HostEvent::KeyDown(KeyCode::ArrowUp),
        HostEvent::KeyUp(KeyCode::ArrowUp),
    ]);

    assert_eq!(
        harness.keypad.actions,
        vec![
            KeyAction::Press(Scancode(0x65)),
            KeyAction::Press(Scancode(0x03)),
            KeyAction::Release(Scancode(0x65)),
            KeyAction::Press(Scancode(0x03)),
            KeyAction::Release(Scancode(0x03)),
        ]
    );
}

#[test]
fn test_redraw_request_marks_dirty() {
    let mut harness = Harness::new();
    harness.feed([HostEvent::RedrawRequest]);
    assert!(harness.dirty.is_set());
}

#[test]
fn test_quit_drops_rest_of_batch() {
    let mut harness = Harness::new();
    harness.feed([
        HostEvent::KeyDown(KeyCode::Digit1),
        HostEvent::Quit,
        HostEvent::KeyUp(KeyCode::Digit1),
        HostEvent::RedrawRequest,
    ]);

    assert!(harness.stop.is_requested());
    assert_eq!(harness.keypad.actions, vec![KeyAction::Press(Scancode(0x41))]);
    assert!(!harness.dirty.is_set());
}

#[test]
fn test_screenshot_key_not_forwarded() {
    let mut harness = Harness::new();
    harness.queue.extend([
        HostEvent::KeyDown(KeyCode::F9),
        HostEvent::KeyUp(KeyCode::F9),
    ]);
    let outcome = harness.pump.on_tick(
        &mut harness.queue,
        &mut harness.keypad,
        &harness.dirty,
        &harness.stop,
    );

    assert!(outcome.screenshot);
    assert_eq!(outcome.events, 2);
    assert_eq!(outcome.key_events, 0);
    assert!(harness.keypad.actions.is_empty());
}

#[test]
fn test_custom_binding_overrides_default() {
    let keymap = KeyMap::new()
        .with_named_overrides([("Enter", 0x06u8), ("KeyZ", 0x30u8)])
        .unwrap();
    let mut harness = Harness::new();
    harness.pump = InputPump::new(keymap);

    harness.feed([HostEvent::KeyDown(KeyCode::Enter), HostEvent::KeyDown(KeyCode::KeyZ)]);

    assert_eq!(
        harness.keypad.actions,
        vec![KeyAction::Press(Scancode(0x06)), KeyAction::Press(Scancode(0x30))]
    );
}
