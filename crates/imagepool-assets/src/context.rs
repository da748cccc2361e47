use imagepool_core::{IdGenerator, ProcessId};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::cache::ImageCache;
use crate::registry::Registry;

/// Cache and registry, always locked together so that "no active process"
/// checks and cache mutations cannot interleave.
#[derive(Debug, Default)]
pub struct LoaderState {
    pub cache: ImageCache,
    pub registry: Registry,
}

/// State shared by one image manager, its dispatcher, and its load processes.
#[derive(Debug, Default)]
pub(crate) struct LoaderContext {
    pub ids: IdGenerator,
    pub state: Mutex<LoaderState>,
    /// Woken whenever the registry becomes empty
    pub idle: Notify,
}

impl LoaderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a process from the registry, waking idle waiters if it was the last one.
    pub fn deregister(&self, id: ProcessId) {
        let mut state = self.state.lock();
        state.registry.deregister(id);
        if state.registry.is_empty() {
            self.idle.notify_waiters();
        }
    }

    /// Undo a submission that was registered but never handed to the
    /// dispatcher: deregister it and take back its requested count.
    pub fn withdraw(&self, id: ProcessId, requested: usize) {
        let mut state = self.state.lock();
        state.cache.sub_requested(requested);
        state.registry.deregister(id);
        if state.registry.is_empty() {
            self.idle.notify_waiters();
        }
    }
}
