//! User settings, persisted as JSON next to the other config files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::library::{StorageError, StorageResult};
use super::pagination::DEFAULT_PER_PAGE;

pub const DEFAULT_REPO_URL: &str = "https://github.com/Gethe/wow-ui-textures/";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Persisted user settings
///
/// Missing fields fall back to their defaults, so files written by older
/// versions keep loading.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Repository page URL, e.g. `https://github.com/Gethe/wow-ui-textures/`
    pub repo_url: String,
    /// Entries shown per catalog page
    pub per_page: usize,
    /// Base of the REST API the tree is fetched from
    pub api_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repo_url: DEFAULT_REPO_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Settings {
    /// Default location:
    /// - Linux: ~/.config/texture-viewer/settings.json
    /// - macOS: ~/Library/Application Support/texture-viewer/settings.json
    /// - Windows: %APPDATA%\texture-viewer\settings.json
    pub fn default_path() -> StorageResult<PathBuf> {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(StorageError::NoDataDir)?;

        path.push("texture-viewer");
        path.push("settings.json");
        Ok(path)
    }

    /// Read settings from `path`
    pub fn load_from(path: &Path) -> StorageResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        if settings.per_page == 0 {
            settings.per_page = DEFAULT_PER_PAGE;
        }
        Ok(settings)
    }

    /// Best-effort load: any failure yields the defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Ignoring unreadable settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings to `path`, creating the directory when needed
    pub fn save_to(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
