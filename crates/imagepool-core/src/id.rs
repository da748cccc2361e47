use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Unique identifier of a load process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(u64);

impl ProcessId {
    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out sequential process IDs, starting at 1.
///
/// Each loader context owns its own generator, so two contexts may hand out
/// the same numbers.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocate a fresh ID, distinct from every ID this generator returned before.
    pub fn generate(&self) -> ProcessId {
        ProcessId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_increase() {
        let ids = IdGenerator::new();
        assert_eq!(ids.generate().get(), 1);
        assert_eq!(ids.generate().get(), 2);
        assert_eq!(ids.generate().get(), 3);
    }

    #[test]
    fn generators_are_independent() {
        let a = IdGenerator::new();
        let b = IdGenerator::new();
        a.generate();
        a.generate();
        assert_eq!(b.generate().get(), 1);
    }

    #[test]
    fn display_uses_hash_prefix() {
        let ids = IdGenerator::default();
        assert_eq!(ids.generate().to_string(), "#1");
    }

    #[test]
    fn concurrent_generation_never_repeats() {
        let ids = std::sync::Arc::new(IdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = std::sync::Arc::clone(&ids);
                std::thread::spawn(move || (0..250).map(|_| ids.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<ProcessId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 1000);
    }
}
