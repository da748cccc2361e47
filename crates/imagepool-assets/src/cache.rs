use std::collections::HashMap;

use imagepool_core::percentage;
use tracing::{debug, warn};

use crate::handle::ImageHandle;
use crate::registry::Registry;

/// Shared pool of loaded images plus the global progress counters.
///
/// `total_loaded` counts successful load events, so reloading a name that is
/// already cached still counts. `total_requested` is the sum of every batch
/// size ever started.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, ImageHandle>,
    total_loaded: usize,
    total_requested: usize,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ImageHandle> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Store a loaded image, replacing any image cached under the same name.
    /// Returns the replaced handle.
    pub fn put(&mut self, handle: ImageHandle) -> Option<ImageHandle> {
        self.total_loaded += 1;
        let previous = self.entries.insert(handle.name().to_string(), handle);
        if let Some(old) = &previous {
            warn!("Duplicated names found. Overwriting {}", old.name());
        }
        previous
    }

    /// Account for a newly started batch of `count` images.
    pub fn add_requested(&mut self, count: usize) {
        self.total_requested += count;
    }

    /// Take back a batch of `count` images that was counted but never issued.
    pub fn sub_requested(&mut self, count: usize) {
        self.total_requested = self.total_requested.saturating_sub(count);
    }

    /// Drop a cached image.
    ///
    /// Both global counters go down by one when the name was cached; removing
    /// an unknown name changes nothing. Counters never go below zero.
    pub fn remove(&mut self, name: &str) -> Option<ImageHandle> {
        let removed = self.entries.remove(name)?;
        self.total_loaded = self.total_loaded.saturating_sub(1);
        self.total_requested = self.total_requested.saturating_sub(1);
        debug!("Removed {} from cache", name);
        Some(removed)
    }

    /// Empty the cache and reset the counters, but only while `registry` has no
    /// active process. Returns whether the clear happened.
    pub fn clear(&mut self, registry: &Registry) -> bool {
        if !registry.is_empty() {
            return false;
        }
        self.entries.clear();
        self.total_loaded = 0;
        self.total_requested = 0;
        true
    }

    /// Percentage of all requested images that have loaded; 0 when nothing
    /// was requested yet.
    pub fn global_progress(&self) -> f64 {
        percentage(self.total_loaded, self.total_requested)
    }

    pub fn total_loaded(&self) -> usize {
        self.total_loaded
    }

    pub fn total_requested(&self) -> usize {
        self.total_requested
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of all cached images, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ImageHandle)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureAsset;
    use imagepool_core::IdGenerator;

    fn handle(name: &str) -> ImageHandle {
        ImageHandle::new(name, format!("img/{}.png", name), TextureAsset::blank(1, 1))
    }

    #[test]
    fn put_get_remove_round_trip() {
        let mut cache = ImageCache::new();
        cache.add_requested(1);
        cache.put(handle("bkg"));
        assert_eq!(cache.get("bkg").unwrap().source(), "img/bkg.png");
        assert_eq!(cache.global_progress(), 100.0);

        assert!(cache.remove("bkg").is_some());
        assert!(cache.get("bkg").is_none());
        assert_eq!(cache.total_loaded(), 0);
        assert_eq!(cache.total_requested(), 0);
    }

    #[test]
    fn overwrite_keeps_one_entry_but_counts_twice() {
        let mut cache = ImageCache::new();
        cache.add_requested(2);
        assert!(cache.put(handle("bkg")).is_none());
        assert!(cache.put(handle("bkg")).is_some());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_loaded(), 2);
    }

    #[test]
    fn removing_unknown_name_leaves_counters_alone() {
        let mut cache = ImageCache::new();
        cache.add_requested(3);
        cache.put(handle("a"));
        assert!(cache.remove("missing").is_none());
        assert_eq!(cache.total_loaded(), 1);
        assert_eq!(cache.total_requested(), 3);
    }

    #[test]
    fn sub_requested_undoes_add_and_clamps() {
        let mut cache = ImageCache::new();
        cache.add_requested(3);
        cache.sub_requested(2);
        assert_eq!(cache.total_requested(), 1);
        cache.sub_requested(5);
        assert_eq!(cache.total_requested(), 0);
    }

    #[test]
    fn progress_is_zero_before_any_request() {
        assert_eq!(ImageCache::new().global_progress(), 0.0);
    }

    #[test]
    fn clear_is_refused_while_a_process_is_active() {
        let ids = IdGenerator::new();
        let mut registry = Registry::new();
        let mut cache = ImageCache::new();
        cache.add_requested(2);
        cache.put(handle("a"));

        let id = ids.generate();
        registry.register(id, 2);
        assert!(!cache.clear(&registry));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_requested(), 2);

        registry.deregister(id);
        assert!(cache.clear(&registry));
        assert!(cache.is_empty());
        assert_eq!(cache.total_loaded(), 0);
        assert_eq!(cache.total_requested(), 0);
    }

    #[test]
    fn names_are_sorted() {
        let mut cache = ImageCache::new();
        cache.put(handle("player"));
        cache.put(handle("bkg"));
        cache.put(handle("frg"));
        assert_eq!(cache.names(), vec!["bkg", "frg", "player"]);
        assert_eq!(cache.iter().count(), 3);
    }
}
