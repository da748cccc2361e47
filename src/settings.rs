//! Demo settings with persistence
//!
//! Settings are saved to `~/.config/imagepool/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use imagepool_assets::ImageDescriptor;
use imagepool_core::{ConfigError, LoaderConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub loader: LoaderConfig,
    pub images: Vec<ImageEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            images: vec![
                ImageEntry::new("bkg", "img/background.png"),
                ImageEntry::new("frg", "img/foreground.png"),
                ImageEntry::new("player", "img/player.png"),
            ],
        }
    }
}

/// Where the settings in use came from. Reported once logging is up.
#[derive(Debug)]
pub enum SettingsOrigin {
    File(PathBuf),
    NoFile(PathBuf),
    NoConfigDir,
    Invalid(ConfigError),
}

impl SettingsOrigin {
    /// Log how the settings were obtained.
    pub fn report(&self) {
        match self {
            Self::File(path) => info!("Loaded settings from {:?}", path),
            Self::NoFile(path) => info!("No settings file at {:?}, using defaults", path),
            Self::NoConfigDir => warn!("Could not determine config directory, using defaults"),
            Self::Invalid(e) => warn!("{}, using defaults", e),
        }
    }
}

impl Settings {
    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("imagepool").join("settings.toml"))
    }

    /// Read and parse a settings file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Ok(toml::from_str(&text)?)
    }

    /// Load settings from the user config directory, or defaults if absent
    /// or unreadable.
    pub fn load() -> (Self, SettingsOrigin) {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => (Self::default(), SettingsOrigin::NoConfigDir),
        }
    }

    /// Load settings from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> (Self, SettingsOrigin) {
        if !path.exists() {
            return (Self::default(), SettingsOrigin::NoFile(path.to_path_buf()));
        }
        match Self::from_file(path) {
            Ok(settings) => (settings, SettingsOrigin::File(path.to_path_buf())),
            Err(e) => (Self::default(), SettingsOrigin::Invalid(e)),
        }
    }

    /// The configured images as a batch of descriptors.
    pub fn descriptors(&self) -> Vec<ImageDescriptor> {
        self.images
            .iter()
            .map(|entry| ImageDescriptor::new(&entry.name, &entry.source))
            .collect()
    }
}

/// One image the demo loads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub name: String,
    pub source: String,
}

impl ImageEntry {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagepool_core::DebugMode;

    #[test]
    fn defaults_load_the_three_demo_images() {
        let settings = Settings::default();
        let names: Vec<_> = settings.images.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["bkg", "frg", "player"]);
        assert_eq!(settings.descriptors().len(), 3);
    }

    #[test]
    fn parses_loader_section_and_images() {
        let settings: Settings = toml::from_str(
            r#"
            [loader]
            base_path = "/srv/game"
            debug_mode = "verbose"

            [[images]]
            name = "logo"
            source = "ui/logo.png"
            "#,
        )
        .unwrap();
        assert_eq!(settings.loader.base_path, PathBuf::from("/srv/game"));
        assert_eq!(settings.loader.debug_mode, DebugMode::Verbose);
        assert_eq!(settings.images, vec![ImageEntry::new("logo", "ui/logo.png")]);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.images.len(), 3);
        assert_eq!(settings.loader, LoaderConfig::default());
    }

    fn temp_settings(tag: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "imagepool-settings-{}-{}.toml",
            tag,
            std::process::id()
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_settings_file() {
        let path = temp_settings("valid", "[loader]\nbase_path = \"assets\"\n");
        let (settings, origin) = Settings::load_from(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(origin, SettingsOrigin::File(p) if p == path));
        assert_eq!(settings.loader.base_path, PathBuf::from("assets"));
        assert_eq!(settings.images.len(), 3);
    }

    #[test]
    fn malformed_file_falls_back_with_parse_error() {
        let path = temp_settings("malformed", "[loader\nbase_path = ");
        let (settings, origin) = Settings::load_from(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(origin, SettingsOrigin::Invalid(ConfigError::Parse(_))));
        assert_eq!(settings.loader, LoaderConfig::default());
        origin.report();
    }

    #[test]
    fn absent_file_uses_defaults() {
        let path = std::env::temp_dir().join("imagepool-settings-absent/settings.toml");
        let (settings, origin) = Settings::load_from(&path);
        assert!(matches!(origin, SettingsOrigin::NoFile(p) if p == path));
        assert_eq!(settings.images.len(), 3);
    }

    #[test]
    fn unreadable_path_is_an_io_error() {
        let dir = std::env::temp_dir();
        match Settings::from_file(&dir) {
            Err(ConfigError::Io(path, _)) => assert_eq!(path, dir),
            other => panic!("expected Io error, got: {:?}", other),
        }
    }
}
