//! Settings file (`~/.config/art-atlas/settings.toml` on Linux).
//!
//! Every field is optional; missing fields take built-in defaults, and
//! command-line flags override both.

use std::path::{Path, PathBuf};

use art_atlas_media::{TranscodeBudget, atomic_write};
use art_atlas_scraper::HttpSettings;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub budget: TranscodeBudget,
    pub http: HttpSettings,
}

/// Canonical path to the settings file.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("art-atlas").join("settings.toml")
}

impl Settings {
    /// Load from `path`, or defaults if the file does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self, CliError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&contents)
            .map_err(|e| CliError::config(format!("{}: {e}", path.display())))
    }

    pub(crate) fn to_toml(&self) -> Result<String, CliError> {
        toml::to_string_pretty(self).map_err(|e| CliError::config(e.to_string()))
    }

    /// Write these settings to `path` unless a file is already there.
    /// Returns whether a file was written.
    pub(crate) fn write_if_missing(&self, path: &Path) -> Result<bool, CliError> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        atomic_write(path, self.to_toml()?.as_bytes())?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
