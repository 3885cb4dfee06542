// Error types for the frontend
//
// Everything that can go wrong between the emulated device and the host
// window funnels into a single enum.

use std::io;
use thiserror::Error;

/// Frontend error type
#[derive(Debug, Error)]
pub enum FrontendError {
    /// The destination display could not be created or locked
    #[error("failed to create display surface: {0}")]
    SurfaceCreation(String),

    /// A completed frame could not be flushed to the host display
    #[error("failed to present frame: {0}")]
    Present(String),

    /// The LCD controller does not report the fixed 96x64 grid
    #[error("LCD controller reports a {rows}x{cols} grid, expected {expected_rows}x{expected_cols}")]
    DisplayMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    /// A periodic timer was registered with an unusable frequency
    #[error("invalid timer frequency {frequency} Hz for a {clock_rate} Hz clock")]
    InvalidTimerRate { frequency: u32, clock_rate: u64 },

    /// Configuration file could not be parsed or serialized
    #[error("configuration error: {0}")]
    Config(String),

    /// A key name in the configuration is not a known host key
    #[error("unknown key name: {0}")]
    UnknownKey(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    /// The host event loop failed
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, FrontendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mismatch_message() {
        let err = FrontendError::DisplayMismatch {
            rows: 120,
            cols: 64,
            expected_rows: 96,
            expected_cols: 64,
        };
        assert_eq!(
            err.to_string(),
            "LCD controller reports a 120x64 grid, expected 96x64"
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: FrontendError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, FrontendError::Io(_)));
    }
}
