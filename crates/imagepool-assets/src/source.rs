//! Where image bytes come from.
//!
//! The manager issues one [`ImageSource::load`] per descriptor and never waits
//! on it directly; the outcome is delivered back as a load event.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::LoadError;
use crate::texture::{self, TextureAsset};

/// An asynchronous provider of decoded images.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Load the image called `name` from the locator `source`.
    async fn load(&self, name: &str, source: &str) -> Result<TextureAsset, LoadError>;
}

/// Loads images from the filesystem, decoding them on the blocking pool.
#[derive(Debug, Clone)]
pub struct FileSource {
    base_path: PathBuf,
}

impl FileSource {
    /// Create a source rooted at the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Resolve a relative locator against the base path.
    fn resolve(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// The base path this source resolves relative locators against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl ImageSource for FileSource {
    async fn load(&self, name: &str, source: &str) -> Result<TextureAsset, LoadError> {
        let full_path = self.resolve(source);
        debug!("Reading {} from {}", name, full_path.display());

        let bytes = tokio::fs::read(&full_path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::NotFound(full_path.clone()),
            _ => LoadError::Io(full_path.clone(), e),
        })?;

        let label = full_path.display().to_string();
        tokio::task::spawn_blocking(move || texture::decode_texture(&label, &bytes))
            .await
            .map_err(|e| LoadError::TaskFailed(e.to_string()))?
    }
}

/// Serves already-decoded textures from memory, keyed by locator.
#[derive(Debug, Default)]
pub struct MemorySource {
    textures: RwLock<HashMap<String, TextureAsset>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture under `source`, replacing any previous one.
    pub fn insert(&self, source: impl Into<String>, texture: TextureAsset) {
        self.textures.write().insert(source.into(), texture);
    }

    /// Decode `bytes` and register the result under `source`.
    pub fn insert_encoded(&self, source: impl Into<String>, bytes: &[u8]) -> Result<(), LoadError> {
        let source = source.into();
        let texture = texture::decode_texture(&source, bytes)?;
        self.insert(source, texture);
        Ok(())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.textures.read().contains_key(source)
    }
}

#[async_trait]
impl ImageSource for MemorySource {
    async fn load(&self, _name: &str, source: &str) -> Result<TextureAsset, LoadError> {
        self.textures
            .read()
            .get(source)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(PathBuf::from(source)))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    enum Script {
        Succeed,
        Fail,
        Panic,
    }

    /// Test source whose per-name outcome and latency are scripted up front.
    /// Unscripted names succeed immediately with a 1x1 texture.
    #[derive(Default)]
    pub struct ScriptedSource {
        script: HashMap<String, (Duration, Script)>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn ok(mut self, name: &str, delay_ms: u64) -> Self {
            self.script
                .insert(name.into(), (Duration::from_millis(delay_ms), Script::Succeed));
            self
        }

        pub fn fail(mut self, name: &str, delay_ms: u64) -> Self {
            self.script
                .insert(name.into(), (Duration::from_millis(delay_ms), Script::Fail));
            self
        }

        pub fn panic(mut self, name: &str) -> Self {
            self.script
                .insert(name.into(), (Duration::ZERO, Script::Panic));
            self
        }

        /// Number of loads issued so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageSource for ScriptedSource {
        async fn load(&self, name: &str, source: &str) -> Result<TextureAsset, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let Some((delay, script)) = self.script.get(name) else {
                return Ok(TextureAsset::blank(1, 1));
            };
            if !delay.is_zero() {
                tokio::time::sleep(*delay).await;
            }
            match script {
                Script::Succeed => Ok(TextureAsset::blank(1, 1)),
                Script::Fail => Err(LoadError::NotFound(PathBuf::from(source))),
                Script::Panic => panic!("scripted panic loading {}", name),
            }
        }
    }
}
