// Configuration management
//
// Startup settings for the frontend: magnification, surface depth, window
// title, tick rates, key bindings and the screenshot directory. Stored as
// TOML; missing sections and fields fall back to defaults.

use crate::display::{BitDepth, ScaleFactor};
use crate::error::{FrontendError, Result};
use crate::input::{parse_key_name, KeyMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use winit::keyboard::KeyCode;

/// Default configuration file path
pub const DEFAULT_CONFIG_FILE: &str = "frontend_config.toml";

/// Largest accepted magnification
pub const MAX_SCALE: u32 = 8;

/// Frontend configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Video settings
    pub video: VideoConfig,

    /// Tick rates and pacing
    pub timing: TimingConfig,

    /// Key bindings
    pub keymap: KeymapConfig,

    /// Screenshot settings
    pub screenshot: ScreenshotConfig,
}

/// Video configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Magnification (1-8)
    pub scale: u32,

    /// Surface bit depth (8, 16, 24 or 32)
    pub bit_depth: BitDepth,

    /// Window title
    pub title: String,
}

/// Timing configuration, rates in Hz of emulated time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Render tick rate
    pub render_hz: u32,

    /// Input poll tick rate
    pub input_hz: u32,

    /// Pace emulated time to the host's wall clock
    pub throttle: bool,
}

/// Key binding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeymapConfig {
    /// Screenshot hotkey (default: F9)
    pub screenshot: String,

    /// Extra or replacement bindings, key name to scancode
    pub bindings: BTreeMap<String, u8>,
}

/// Screenshot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    /// Screenshot directory
    pub directory: PathBuf,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            scale: 4,
            bit_depth: BitDepth::Bits16,
            title: "z80e".to_string(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            render_hz: 60,
            input_hz: 100,
            throttle: true,
        }
    }
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            screenshot: "F9".to_string(),
            bindings: BTreeMap::new(),
        }
    }
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("screenshots"),
        }
    }
}

impl FrontendConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `Config` if it does not parse
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| FrontendError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| FrontendError::Config(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Try to load configuration from file, or fall back to defaults
    ///
    /// A missing file is created with the defaults so the user has something
    /// to edit. A file that exists but fails to load is left untouched.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(FrontendError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                let config = Self::default();
                match config.save_to_file(path) {
                    Ok(()) => tracing::info!(path = %path.display(), "created default configuration file"),
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not save default config"),
                }
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not load config, using defaults");
                Self::default()
            }
        }
    }

    /// Magnification, clamped to 1-8
    pub fn scale_factor(&self) -> ScaleFactor {
        let scale = self.video.scale.clamp(1, MAX_SCALE) as usize;
        ScaleFactor::new(scale).unwrap_or(ScaleFactor::ONE)
    }

    /// Default key map with the configured overrides applied
    ///
    /// # Errors
    /// `UnknownKey` for an unrecognized key name
    pub fn build_keymap(&self) -> Result<KeyMap> {
        KeyMap::new().with_named_overrides(
            self.keymap
                .bindings
                .iter()
                .map(|(name, &code)| (name.as_str(), code)),
        )
    }

    /// The screenshot hotkey
    ///
    /// # Errors
    /// `UnknownKey` for an unrecognized key name
    pub fn screenshot_key(&self) -> Result<KeyCode> {
        parse_key_name(&self.keymap.screenshot)
    }
}
