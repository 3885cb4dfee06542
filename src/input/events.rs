// Host events - What the window system tells the frontend
//
// winit pushes events into the handler as they arrive; the handler translates
// the interesting ones into HostEvents and queues them. The input pump then
// drains the queue on its own tick, in arrival order.

use std::collections::VecDeque;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Input event from the host environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// A host key went down
    KeyDown(KeyCode),
    /// A host key came up
    KeyUp(KeyCode),
    /// The host surface was invalidated and must be repainted
    RedrawRequest,
    /// The user asked to close the emulator
    Quit,
    /// Anything the frontend does not handle
    Other,
}

/// Non-blocking source of host events
pub trait EventSource {
    /// Next pending event, or `None` if the queue is empty
    fn poll_event(&mut self) -> Option<HostEvent>;
}

/// FIFO queue of pending host events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<HostEvent>,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn push(&mut self, event: HostEvent) {
        self.events.push_back(event);
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are pending
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for EventQueue {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }
}

impl Extend<HostEvent> for EventQueue {
    fn extend<I: IntoIterator<Item = HostEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

/// Translate a keyboard transition
///
/// Auto-repeat presses are dropped so a held key produces exactly one
/// down/up pair. Keys without a physical code are ignored.
pub fn translate_key(physical_key: PhysicalKey, state: ElementState, repeat: bool) -> Option<HostEvent> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };

    match state {
        ElementState::Pressed if repeat => None,
        ElementState::Pressed => Some(HostEvent::KeyDown(code)),
        ElementState::Released => Some(HostEvent::KeyUp(code)),
    }
}

/// Translate a winit window event, `None` for events the frontend ignores
pub fn translate_window_event(event: &WindowEvent) -> Option<HostEvent> {
    match event {
        WindowEvent::CloseRequested => Some(HostEvent::Quit),
        WindowEvent::KeyboardInput { event, .. } => {
            translate_key(event.physical_key, event.state, event.repeat)
        }
        WindowEvent::RedrawRequested
        | WindowEvent::Occluded(false)
        | WindowEvent::Resized(_)
        | WindowEvent::ScaleFactorChanged { .. } => Some(HostEvent::RedrawRequest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = EventQueue::new();
        queue.push(HostEvent::KeyDown(KeyCode::KeyA));
        queue.push(HostEvent::RedrawRequest);
        queue.push(HostEvent::KeyUp(KeyCode::KeyA));
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.poll_event(), Some(HostEvent::KeyDown(KeyCode::KeyA)));
        assert_eq!(queue.poll_event(), Some(HostEvent::RedrawRequest));
        assert_eq!(queue.poll_event(), Some(HostEvent::KeyUp(KeyCode::KeyA)));
        assert_eq!(queue.poll_event(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_translate_key() {
        let key = PhysicalKey::Code(KeyCode::Enter);
        assert_eq!(
            translate_key(key, ElementState::Pressed, false),
            Some(HostEvent::KeyDown(KeyCode::Enter))
        );
        assert_eq!(
            translate_key(key, ElementState::Released, false),
            Some(HostEvent::KeyUp(KeyCode::Enter))
        );
        assert_eq!(translate_key(key, ElementState::Pressed, true), None);
    }

    #[test]
    fn test_translate_unidentified_key() {
        let key = PhysicalKey::Unidentified(NativeKeyCode::Unidentified);
        assert_eq!(translate_key(key, ElementState::Pressed, false), None);
    }

    #[test]
    fn test_translate_window_events() {
        assert_eq!(
            translate_window_event(&WindowEvent::CloseRequested),
            Some(HostEvent::Quit)
        );
        assert_eq!(
            translate_window_event(&WindowEvent::RedrawRequested),
            Some(HostEvent::RedrawRequest)
        );
        assert_eq!(
            translate_window_event(&WindowEvent::Occluded(false)),
            Some(HostEvent::RedrawRequest)
        );
        assert_eq!(
            translate_window_event(&WindowEvent::Resized(PhysicalSize::new(10, 10))),
            Some(HostEvent::RedrawRequest)
        );
        assert_eq!(translate_window_event(&WindowEvent::Occluded(true)), None);
        assert_eq!(translate_window_event(&WindowEvent::Focused(true)), None);
    }
}
