use std::fmt;

use crate::error::LoadError;
use crate::handle::ImageHandle;

/// Hook run once when a single image finishes loading.
pub type ItemLoadedFn = Box<dyn FnOnce(&ImageHandle) + Send>;

/// Hook run once when a single image fails to load.
pub type ItemErrorFn = Box<dyn FnOnce(&LoadError) + Send>;

/// Caller-supplied description of one image to load.
pub struct ImageDescriptor {
    /// Key the image is cached under
    pub name: String,
    /// Locator handed to the image source
    pub source: String,
    on_loaded: Option<ItemLoadedFn>,
    on_error: Option<ItemErrorFn>,
}

impl ImageDescriptor {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            on_loaded: None,
            on_error: None,
        }
    }

    /// Run `hook` with the handle once this image has loaded.
    pub fn on_loaded(mut self, hook: impl FnOnce(&ImageHandle) + Send + 'static) -> Self {
        self.on_loaded = Some(Box::new(hook));
        self
    }

    /// Run `hook` with the failure once this image has failed to load.
    pub fn on_error(mut self, hook: impl FnOnce(&LoadError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// Check the descriptor at position `index` of its batch.
    pub fn validate(&self, index: usize) -> Result<(), LoadError> {
        if self.name.is_empty() {
            return Err(LoadError::InvalidName { index });
        }
        if self.source.is_empty() {
            return Err(LoadError::InvalidSource {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (String, String, ItemHooks) {
        let hooks = ItemHooks {
            on_loaded: self.on_loaded,
            on_error: self.on_error,
        };
        (self.name, self.source, hooks)
    }
}

impl fmt::Debug for ImageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageDescriptor")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("on_loaded", &self.on_loaded.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Per-item hooks kept by the owning load process until the item resolves.
#[derive(Default)]
pub(crate) struct ItemHooks {
    pub on_loaded: Option<ItemLoadedFn>,
    pub on_error: Option<ItemErrorFn>,
}

/// An ordered set of descriptors submitted together.
#[derive(Debug, Default)]
pub struct ImageBatch {
    items: Vec<ImageDescriptor>,
}

impl ImageBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor.
    pub fn push(&mut self, descriptor: ImageDescriptor) {
        self.items.push(descriptor);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageDescriptor> {
        self.items.iter()
    }

    /// Validate every descriptor, stopping at the first bad one.
    pub fn validate(&self) -> Result<(), LoadError> {
        self.items
            .iter()
            .enumerate()
            .try_for_each(|(index, d)| d.validate(index))
    }

    pub(crate) fn into_descriptors(self) -> Vec<ImageDescriptor> {
        self.items
    }
}

impl From<ImageDescriptor> for ImageBatch {
    fn from(descriptor: ImageDescriptor) -> Self {
        Self {
            items: vec![descriptor],
        }
    }
}

impl From<Vec<ImageDescriptor>> for ImageBatch {
    fn from(items: Vec<ImageDescriptor>) -> Self {
        Self { items }
    }
}

impl<const N: usize> From<[ImageDescriptor; N]> for ImageBatch {
    fn from(items: [ImageDescriptor; N]) -> Self {
        Self {
            items: items.into(),
        }
    }
}

impl FromIterator<ImageDescriptor> for ImageBatch {
    fn from_iter<I: IntoIterator<Item = ImageDescriptor>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_descriptor_is_a_batch_of_one() {
        let batch = ImageBatch::from(ImageDescriptor::new("bkg", "img/background.png"));
        assert_eq!(batch.len(), 1);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected_with_its_index() {
        let batch = ImageBatch::from(vec![
            ImageDescriptor::new("a", "a.png"),
            ImageDescriptor::new("", "b.png"),
        ]);
        match batch.validate() {
            Err(LoadError::InvalidName { index }) => assert_eq!(index, 1),
            other => panic!("expected InvalidName, got: {:?}", other),
        }
    }

    #[test]
    fn empty_source_is_rejected_with_its_name() {
        let err = ImageDescriptor::new("player", "").validate(0).unwrap_err();
        match err {
            LoadError::InvalidSource { name } => assert_eq!(name, "player"),
            other => panic!("expected InvalidSource, got: {:?}", other),
        }
        assert!(ImageDescriptor::new("player", "").validate(0).unwrap_err().is_validation());
    }

    #[test]
    fn hooks_survive_into_parts() {
        let (name, source, hooks) = ImageDescriptor::new("a", "a.png")
            .on_loaded(|_| {})
            .into_parts();
        assert_eq!(name, "a");
        assert_eq!(source, "a.png");
        assert!(hooks.on_loaded.is_some());
        assert!(hooks.on_error.is_none());
    }

    #[test]
    fn debug_output_hides_closures() {
        let text = format!("{:?}", ImageDescriptor::new("a", "a.png").on_error(|_| {}));
        assert!(text.contains("on_error: true"));
        assert!(text.contains("on_loaded: false"));
    }
}
