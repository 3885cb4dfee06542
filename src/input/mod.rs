// Input module - Host keyboard to calculator key matrix
//
// This module provides:
// - The host-key to scancode table
// - Host event translation and queueing
// - The input pump run on the scheduler's input tick

pub mod events;
pub mod keymap;
pub mod pump;

pub use events::{translate_key, translate_window_event, EventQueue, EventSource, HostEvent};
pub use keymap::{key_name, parse_key_name, KeyMap};
pub use pump::{InputPump, PumpOutcome};
