//! Engine configuration
//!
//! Configuration is plain data with serde support so hosts can load it from
//! TOML files. Every field has a default, so partial config files are fine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,

    /// Renderer configuration
    #[serde(default)]
    pub renderer: RendererConfig,
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Window width in pixels
    pub width: u32,

    /// Window height in pixels
    pub height: u32,

    /// Whether the window is resizable
    pub resizable: bool,

    /// VSync setting
    pub vsync: bool,
}

impl WindowConfig {
    /// Aspect ratio (width / height) of the configured window
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scene Engine Application".to_string(),
            width: 800,
            height: 600,
            resizable: false,
            vsync: true,
        }
    }
}

/// Renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Clear color used when the scene has no background set
    pub clear_color: [f32; 3],

    /// MSAA sample count requested from the backend
    pub msaa_samples: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0],
            msaa_samples: 1,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load a configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
