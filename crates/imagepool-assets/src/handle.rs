use std::sync::Arc;

use crate::texture::TextureAsset;

/// A loaded image, keyed by its name.
///
/// Cloning is cheap and shares the pixel data. Use [`ImageHandle::deep_clone`]
/// for a copy with its own storage.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    name: Arc<str>,
    source: Arc<str>,
    texture: Arc<TextureAsset>,
}

impl ImageHandle {
    pub fn new(name: impl Into<Arc<str>>, source: impl Into<Arc<str>>, texture: TextureAsset) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            texture: Arc::new(texture),
        }
    }

    /// The name the image is cached under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The locator the image was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn texture(&self) -> &TextureAsset {
        &self.texture
    }

    /// A new handle with the same name and source but freshly copied pixels.
    pub fn deep_clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            source: Arc::clone(&self.source),
            texture: Arc::new(TextureAsset::clone(&self.texture)),
        }
    }

    /// Whether both handles share the same pixel storage.
    pub fn same_storage(&self, other: &ImageHandle) -> bool {
        Arc::ptr_eq(&self.texture, &other.texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_storage() {
        let handle = ImageHandle::new("bkg", "img/background.png", TextureAsset::blank(2, 2));
        let copy = handle.clone();
        assert!(handle.same_storage(&copy));
    }

    #[test]
    fn deep_clone_copies_storage() {
        let handle = ImageHandle::new("bkg", "img/background.png", TextureAsset::blank(2, 2));
        let copy = handle.deep_clone();
        assert!(!handle.same_storage(&copy));
        assert_eq!(copy.name(), "bkg");
        assert_eq!(copy.source(), "img/background.png");
        assert_eq!(copy.texture(), handle.texture());
    }
}
