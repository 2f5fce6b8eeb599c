//! Settings file discovery.
//!
//! The game reads `settings.json` from the platform config directory
//! (`~/.config/hunting` on Linux). A missing file means defaults; a file
//! that exists but does not parse or validate is an error.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use hunting_core::{GameSettings, SettingsError};

pub const SETTINGS_FILE: &str = "settings.json";

/// Where the settings file is expected, if the platform has a config dir.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hunting").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

pub fn load_settings() -> anyhow::Result<GameSettings> {
    match settings_path() {
        Some(path) => Ok(load_settings_from(&path)?),
        None => {
            tracing::warn!("No config directory on this platform, using default settings");
            Ok(GameSettings::default())
        }
    }
}

pub fn load_settings_from(path: &Path) -> Result<GameSettings, SettingsError> {
    if !path.exists() {
        tracing::info!("No settings at {}, using defaults", path.display());
        return Ok(GameSettings::default());
    }
    GameSettings::load(path)
}
