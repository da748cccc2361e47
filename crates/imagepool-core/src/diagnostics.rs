//! Diagnostics verbosity
//!
//! The loader logs through `tracing`. A [`DebugMode`] decides which levels reach
//! the sink; the host installs the subscriber and consults [`DebugMode::allows`].

use serde::{Deserialize, Serialize};
use tracing::Level;

/// Which log lines the loader lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugMode {
    /// No messages at all
    #[default]
    None,
    /// Info and debug lines only, no warnings or errors
    Debug,
    /// Errors only
    Errors,
    /// Everything
    Verbose,
}

impl DebugMode {
    /// Whether an event at `level` should be emitted under this mode.
    pub fn allows(&self, level: &Level) -> bool {
        match self {
            DebugMode::None => false,
            DebugMode::Debug => *level >= Level::INFO,
            DebugMode::Errors => *level == Level::ERROR,
            DebugMode::Verbose => true,
        }
    }

    /// Short label used when announcing the mode.
    pub fn label(&self) -> &'static str {
        match self {
            DebugMode::None => "none",
            DebugMode::Debug => "logs and info only",
            DebugMode::Errors => "errors only",
            DebugMode::Verbose => "verbose",
        }
    }
}
