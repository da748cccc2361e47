//! imagepool Assets - Concurrent image loading and caching
//!
//! Submits batches of images to an [`ImageSource`], tracks per-batch and
//! global progress, and keeps every loaded image in a shared cache keyed by
//! name.

mod cache;
mod context;
mod descriptor;
mod error;
mod handle;
mod manager;
mod process;
mod registry;
mod source;
mod texture;

pub use cache::ImageCache;
pub use descriptor::{ImageBatch, ImageDescriptor, ItemErrorFn, ItemLoadedFn};
pub use error::LoadError;
pub use handle::ImageHandle;
pub use manager::ImageManager;
pub use process::{CompleteFn, LoadProcess, PendingLoad, ProcessState, ProgressFn};
pub use registry::{ProcessStatus, Registry};
pub use source::{FileSource, ImageSource, MemorySource};
pub use texture::{decode_texture, TextureAsset};

pub use imagepool_core::{LoadStatus, LoadSummary, ProcessId};
