use std::collections::HashMap;

use imagepool_core::{percentage, ProcessId};

/// Snapshot of an active load process's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    pub requested: usize,
    pub loaded: usize,
    pub errors: usize,
}

impl ProcessStatus {
    /// Percentage of the batch that has loaded.
    pub fn progress(&self) -> f64 {
        percentage(self.loaded, self.requested)
    }
}

/// Every load process that has not yet reached a terminal state.
#[derive(Debug, Default)]
pub struct Registry {
    processes: HashMap<ProcessId, ProcessStatus>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a freshly started process.
    pub fn register(&mut self, id: ProcessId, requested: usize) {
        self.processes.insert(
            id,
            ProcessStatus {
                requested,
                loaded: 0,
                errors: 0,
            },
        );
    }

    /// Refresh the counters of a tracked process. Unknown IDs are ignored.
    pub fn update(&mut self, id: ProcessId, loaded: usize, errors: usize) {
        if let Some(status) = self.processes.get_mut(&id) {
            status.loaded = loaded;
            status.errors = errors;
        }
    }

    /// Stop tracking a process, returning its last snapshot.
    pub fn deregister(&mut self, id: ProcessId) -> Option<ProcessStatus> {
        self.processes.remove(&id)
    }

    pub fn get(&self, id: ProcessId) -> Option<&ProcessStatus> {
        self.processes.get(&id)
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        self.processes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// IDs of all active processes, in ascending order.
    pub fn ids(&self) -> Vec<ProcessId> {
        let mut ids: Vec<_> = self.processes.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Drop every entry, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.processes.len();
        self.processes.clear();
        count
    }
}
