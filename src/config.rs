//! Demo configuration
//!
//! Uses RON (Rusty Object Notation), same as level files. Every field has a
//! default, so a config file only needs the values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::rasterizer::{Mode7Settings, HEIGHT, HEIGHT_HI, WIDTH, WIDTH_HI};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "affinecat.ron";
/// Environment variable overriding the config path
pub const CONFIG_ENV: &str = "AFFINECAT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "affinecat".to_string(),
            width: WIDTH_HI,
            height: HEIGHT_HI,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Low-res canvas the plane is rasterized into
    pub canvas_width: usize,
    pub canvas_height: usize,
    /// Threads for the Mode 7 pass (1 = render on the main thread)
    pub threads: usize,
    pub mode7: Mode7Settings,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_width: WIDTH,
            canvas_height: HEIGHT,
            threads: 1,
            mode7: Mode7Settings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub target_fps: u32,
    pub screenshot_dir: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            target_fps: 60,
            screenshot_dir: PathBuf::from("screenshots"),
        }
    }
}

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl DemoConfig {
    /// Find and load the config: `$AFFINECAT_CONFIG` if set (must exist),
    /// else `affinecat.ron` if present, else defaults.
    ///
    /// Returns the path the config came from, if any.
    pub fn locate() -> Result<(Self, Option<PathBuf>), ConfigError> {
        Self::locate_in(std::env::var_os(CONFIG_ENV).map(PathBuf::from), DEFAULT_CONFIG_PATH)
    }

    /// `explicit` must exist and parse; `fallback` is optional but must parse if present
    fn locate_in<P: AsRef<Path>>(explicit: Option<PathBuf>, fallback: P) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match explicit {
            Some(path) => {
                let config = load_config(&path)?;
                Ok((config, Some(path)))
            }
            None => load_or_default(fallback),
        }
    }

    /// Check the invariants the render pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg.to_string())) };

        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window size must be non-zero");
        }
        if self.render.canvas_width == 0 || self.render.canvas_height == 0 {
            return invalid("canvas size must be non-zero");
        }
        if self.render.threads == 0 {
            return invalid("threads must be at least 1");
        }
        let scale = self.render.mode7.scale;
        if scale == 0.0 || !scale.is_finite() {
            return invalid("scale must be finite and non-zero");
        }
        if !self.render.mode7.rotation_speed.is_finite() {
            return invalid("rotation_speed must be finite");
        }
        if self.target_fps == 0 {
            return invalid("target_fps must be at least 1");
        }
        Ok(())
    }
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DemoConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load a config from a RON string
pub fn load_config_from_str(s: &str) -> Result<DemoConfig, ConfigError> {
    Ok(ron::from_str(s)?)
}

/// Load `path` if it exists, otherwise fall back to defaults
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(DemoConfig, Option<PathBuf>), ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        Ok((load_config(path)?, Some(path.to_path_buf())))
    } else {
        Ok((DemoConfig::default(), None))
    }
}
