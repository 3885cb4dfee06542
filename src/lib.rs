// TI LCD Frontend Library
// Host-side display and input frontend for an emulated monochrome calculator

// Public modules
pub mod device;
pub mod display;
pub mod emulator;
pub mod error;
pub mod input;

// Re-export main types for convenience
pub use device::{BwLcd, DemoDevice, Device, KeyMatrix, KeypadMatrix, LcdController, Scancode};
pub use display::{
    BitDepth, DirtyFlag, DisplaySink, DisplayTransform, HeadlessSink, PixelSurface,
    RefreshController, ScaleFactor, WindowConfig,
};
pub use emulator::{run_headless, Frontend, FrontendConfig, StopSignal, TickScheduler, TickTarget};
pub use error::{FrontendError, Result};
pub use input::{EventQueue, HostEvent, InputPump, KeyMap};
