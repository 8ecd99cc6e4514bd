//! Settings persistence
//!
//! Serializes settings only, never world state, to a JSON document under
//! a fixed namespace key. Loading is failure-tolerant: a missing,
//! unreadable or malformed document is indistinguishable from a first
//! run, so callers simply fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

use crate::simulation::{Settings, SettingsPatch};

/// Fixed namespace key for the settings document
pub const STORAGE_KEY: &str = "trafficSimulator.settings.v1";

/// Path of the settings document inside the given directory
pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(format!("{STORAGE_KEY}.json"))
}

/// Load previously saved settings, normalized.
///
/// Returns None when there is nothing usable on disk.
pub fn load_settings(dir: &Path) -> Option<Settings> {
    let path = settings_path(dir);
    let raw = fs::read_to_string(&path).ok()?;

    match serde_json::from_str::<SettingsPatch>(&raw) {
        Ok(patch) => Some(Settings::normalized(patch)),
        Err(err) => {
            warn!("ignoring malformed settings file {}: {}", path.display(), err);
            None
        }
    }
}

/// Save the settings snapshot, creating the directory if needed.
pub fn save_settings(dir: &Path, settings: &Settings) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create settings directory {}", dir.display()))?;

    let raw = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    let path = settings_path(dir);
    fs::write(&path, raw)
        .with_context(|| format!("Failed to write settings file {}", path.display()))
}
