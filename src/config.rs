//! On-disk configuration: user-tweakable settings and the persistent save.
//!
//! Both files are plain JSON next to the executable's working directory.  A
//! missing or malformed file falls back to defaults with a logged warning —
//! a bad settings file should never keep the game from starting.

use std::path::Path;

use serde::{Deserialize, Serialize};

pub const SETTINGS_PATH: &str = "settings.json";
pub const SAVE_PATH: &str = "save.json";

// ── Settings ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_width: u32,
    pub window_height: u32,
    /// Master audio volume, 0.0–2.0.
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            volume: 1.0,
        }
    }
}

impl Settings {
    /// Load from `path`, falling back to defaults when the file is absent or
    /// unreadable.  Only a parse failure is worth warning about — a missing
    /// file is the normal first-run case.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let Ok(text) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("[config] Ignoring malformed '{}': {e}", path.display());
                Self::default()
            }
        }
    }
}

// ── Save data ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub high_score: u32,
}

impl SaveData {
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let Ok(text) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&text) {
            Ok(save) => save,
            Err(e) => {
                eprintln!("[config] Ignoring malformed '{}': {e}", path.display());
                Self::default()
            }
        }
    }

    /// Best-effort write; a failed save is logged, not fatal.
    pub fn store<P: AsRef<Path>>(&self, path: P) {
        let path = path.as_ref();
        let json = match serde_json::to_string_pretty(self) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("[config] Could not serialize save data: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(path, json) {
            eprintln!("[config] Could not write '{}': {e}", path.display());
        }
    }
}
