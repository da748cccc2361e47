use std::path::PathBuf;

use imagepool_core::ProcessId;

/// Errors that can occur while validating or loading images.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("missing or invalid name for image descriptor at index {index}")]
    InvalidName { index: usize },

    #[error("missing or invalid source for image '{name}'")]
    InvalidSource { name: String },

    #[error("image not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to load image '{0}': {1}")]
    ImageLoadFailed(String, String),

    #[error("I/O error loading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("load task failed: {0}")]
    TaskFailed(String),

    #[error("load process {0} already finished")]
    ProcessFinished(ProcessId),

    #[error("image manager has shut down")]
    ShutDown,

    #[error("no tokio runtime available to drive image loads")]
    NoRuntime,
}

impl LoadError {
    /// True for errors raised while checking descriptors, before anything was issued.
    pub fn is_validation(&self) -> bool {
        matches!(self, LoadError::InvalidName { .. } | LoadError::InvalidSource { .. })
    }
}
