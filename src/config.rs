/// Host configuration
///
/// Where the catalogs live and where the bundled default images are shipped.
/// Values come from an optional JSON file, then environment overrides.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `data_root`
pub const ENV_DATA_DIR: &str = "EAT_WHAT_DATA_DIR";
/// Overrides `assets_dir`
pub const ENV_ASSETS_DIR: &str = "EAT_WHAT_ASSETS_DIR";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Persistent root holding `foods/`, `drinks/` and the seeding marker
    pub data_root: PathBuf,
    /// Bundled defaults with `foods/` and `drinks/` sub-directories
    pub assets_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl Config {
    /// Load from `path` (if given) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
            .map_err(|e| CatalogError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_root = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_ASSETS_DIR).filter(|v| !v.is_empty()) {
            self.assets_dir = PathBuf::from(dir);
        }
    }
}

/// Default data root
/// - Linux: ~/.local/share/eat-what
/// - macOS: ~/Library/Application Support/eat-what
/// - Windows: %APPDATA%\eat-what
fn default_data_root() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eat-what")
}
