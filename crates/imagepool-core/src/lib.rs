//! imagepool Core - Core types and utilities for imagepool
//!
//! This crate provides the foundational types shared by the loader:
//! - Process identifiers and the generator that hands them out
//! - Completion and progress payloads delivered to callers
//! - Loader configuration and the diagnostics level mapping

pub mod config;
pub mod diagnostics;
pub mod id;
pub mod types;

pub use config::{ConfigError, LoaderConfig};
pub use diagnostics::DebugMode;
pub use id::{IdGenerator, ProcessId};
pub use types::{percentage, LoadStatus, LoadSummary};
