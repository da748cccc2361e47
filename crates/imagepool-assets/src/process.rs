//! Load processes
//!
//! A [`LoadProcess`] is one submitted batch. It moves through
//! `Idle -> Running -> Completed | CompletedWithErrors` and is discarded once
//! terminal. Every issued load resolves exactly once, on either the success or
//! the failure lane; the process counts both and fires its completion callback
//! when `loaded + errors == requested`.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use imagepool_core::{percentage, LoadSummary, ProcessId};
use tracing::{debug, error, info, warn};

use crate::cache::ImageCache;
use crate::context::LoaderContext;
use crate::descriptor::{ImageBatch, ItemHooks};
use crate::error::LoadError;
use crate::handle::ImageHandle;
use crate::texture::TextureAsset;

/// Callback fired once when a process reaches a terminal state.
pub type CompleteFn = Box<dyn FnOnce(LoadSummary) + Send>;

/// Callback fired with the process's progress after every successful image.
pub type ProgressFn = Box<dyn FnMut(f64) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Idle,
    Running,
    Completed,
    CompletedWithErrors,
}

impl ProcessState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessState::Completed | ProcessState::CompletedWithErrors)
    }
}

/// A load the process wants issued against the image source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    /// Position of the descriptor in its batch
    pub slot: usize,
    pub name: String,
    pub source: String,
}

struct Slot {
    name: String,
    source: String,
    hooks: ItemHooks,
    resolved: bool,
}

pub struct LoadProcess {
    id: ProcessId,
    state: ProcessState,
    requested: usize,
    loaded: usize,
    errors: usize,
    items: HashMap<String, ImageHandle>,
    slots: Vec<Slot>,
    on_complete: Option<CompleteFn>,
    on_progress: Option<ProgressFn>,
}

impl LoadProcess {
    pub fn new(id: ProcessId) -> Self {
        Self {
            id,
            state: ProcessState::Idle,
            requested: 0,
            loaded: 0,
            errors: 0,
            items: HashMap::new(),
            slots: Vec::new(),
            on_complete: None,
            on_progress: None,
        }
    }

    /// Validate `batch` and prepare one load per descriptor.
    ///
    /// A running process ignores the call and returns no loads. Validation
    /// failures leave the process and `cache` untouched.
    pub fn start(
        &mut self,
        batch: ImageBatch,
        on_complete: CompleteFn,
        on_progress: ProgressFn,
        cache: &mut ImageCache,
    ) -> Result<Vec<PendingLoad>, LoadError> {
        match self.state {
            ProcessState::Running => {
                debug!("Load process {} is already running", self.id);
                return Ok(Vec::new());
            }
            ProcessState::Completed | ProcessState::CompletedWithErrors => {
                return Err(LoadError::ProcessFinished(self.id));
            }
            ProcessState::Idle => {}
        }

        batch.validate()?;

        let descriptors = batch.into_descriptors();
        self.requested = descriptors.len();
        cache.add_requested(self.requested);
        self.on_complete = Some(on_complete);
        self.on_progress = Some(on_progress);
        self.state = ProcessState::Running;
        info!("Load process {} started with {} images", self.id, self.requested);

        let pending = descriptors
            .into_iter()
            .enumerate()
            .map(|(slot, descriptor)| {
                let (name, source, hooks) = descriptor.into_parts();
                self.slots.push(Slot {
                    name: name.clone(),
                    source: source.clone(),
                    hooks,
                    resolved: false,
                });
                PendingLoad { slot, name, source }
            })
            .collect();

        Ok(pending)
    }

    /// Apply the outcome of the load issued for `slot`.
    pub(crate) fn resolve(
        &mut self,
        slot: usize,
        outcome: Result<TextureAsset, LoadError>,
        ctx: &LoaderContext,
    ) {
        if self.state != ProcessState::Running {
            warn!("Load process {} is not running, dropping event for slot {}", self.id, slot);
            return;
        }

        let (name, source, hooks) = match self.slots.get_mut(slot) {
            Some(entry) if !entry.resolved => {
                entry.resolved = true;
                (
                    entry.name.clone(),
                    entry.source.clone(),
                    std::mem::take(&mut entry.hooks),
                )
            }
            Some(_) => {
                warn!("Load process {} got a second outcome for slot {}", self.id, slot);
                return;
            }
            None => {
                warn!("Load process {} has no slot {}", self.id, slot);
                return;
            }
        };

        match outcome {
            Ok(texture) => {
                let handle = ImageHandle::new(name.as_str(), source.as_str(), texture);
                self.loaded += 1;
                self.items.insert(name, handle.clone());
                {
                    let mut state = ctx.state.lock();
                    state.cache.put(handle.clone());
                    state.registry.update(self.id, self.loaded, self.errors);
                }
                debug!("{} loaded", source);

                if let Some(hook) = hooks.on_loaded {
                    guarded(self.id, "on_loaded", || hook(&handle));
                }
                let progress = self.progress();
                if let Some(on_progress) = self.on_progress.as_mut() {
                    guarded(self.id, "on_progress", || on_progress(progress));
                }
            }
            Err(err) => {
                self.errors += 1;
                ctx.state
                    .lock()
                    .registry
                    .update(self.id, self.loaded, self.errors);
                warn!("Failed to load {} from {}: {}", name, source, err);

                if let Some(hook) = hooks.on_error {
                    guarded(self.id, "on_error", || hook(&err));
                }
            }
        }

        self.check_terminal(ctx);
    }

    /// Finish the process if every issued load has resolved. Returns whether
    /// the process is now terminal.
    pub(crate) fn check_terminal(&mut self, ctx: &LoaderContext) -> bool {
        if self.state != ProcessState::Running {
            return self.state.is_terminal();
        }

        let summary = if self.loaded == self.requested {
            self.state = ProcessState::Completed;
            info!("Load process {} done with no errors", self.id);
            LoadSummary::ok()
        } else if self.loaded + self.errors == self.requested {
            self.state = ProcessState::CompletedWithErrors;
            warn!("Load process {} done with {} errors", self.id, self.errors);
            LoadSummary::failed(self.errors)
        } else {
            return false;
        };

        ctx.deregister(self.id);
        self.release();

        if let Some(on_complete) = self.on_complete.take() {
            guarded(self.id, "on_complete", move || on_complete(summary));
        }
        true
    }

    fn release(&mut self) {
        self.items.clear();
        self.slots.clear();
        self.on_progress = None;
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ProcessState::Running
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Percentage of this batch that has loaded.
    pub fn progress(&self) -> f64 {
        percentage(self.loaded, self.requested)
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    /// This process's own images, while it is running.
    pub fn items(&self) -> &HashMap<String, ImageHandle> {
        &self.items
    }
}

impl fmt::Debug for LoadProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadProcess")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("requested", &self.requested)
            .field("loaded", &self.loaded)
            .field("errors", &self.errors)
            .finish()
    }
}

/// Run a user callback, logging instead of unwinding if it panics.
fn guarded(id: ProcessId, what: &str, f: impl FnOnce()) {
    if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
        error!("{} callback of load process {} panicked", what, id);
    }
}
