//! Loader configuration
//!
//! Parsed from TOML, e.g.
//!
//! ```toml
//! base_path = "assets"
//! debug_mode = "verbose"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics::DebugMode;

/// Errors that can occur while reading loader configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid loader config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings consumed by the image manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory relative image sources are resolved against
    pub base_path: PathBuf,
    /// Which log levels the host should let through
    pub debug_mode: DebugMode,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            debug_mode: DebugMode::None,
        }
    }
}

impl LoaderConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&text)
    }
}
