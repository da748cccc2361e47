//! Payloads delivered to loader callers

use serde::{Deserialize, Serialize};

/// Aggregate outcome of a load process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadStatus {
    /// Every image of the batch loaded
    #[serde(rename = "OK")]
    Ok,
    /// At least one image of the batch failed
    #[serde(rename = "FAIL")]
    Fail,
}

/// Completion payload handed to a process's `on_complete` callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub status: LoadStatus,
    pub error_count: usize,
}

impl LoadSummary {
    /// Summary of a batch where everything loaded.
    pub fn ok() -> Self {
        Self {
            status: LoadStatus::Ok,
            error_count: 0,
        }
    }

    /// Summary of a batch with `error_count` failed images.
    pub fn failed(error_count: usize) -> Self {
        Self {
            status: LoadStatus::Fail,
            error_count,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == LoadStatus::Ok
    }
}

/// `done / total * 100`, or 0 when nothing was requested.
pub fn percentage(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (done as f64 / total as f64) * 100.0
}
