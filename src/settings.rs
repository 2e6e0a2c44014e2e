//! Engine settings
//!
//! Plain serde struct; missing fields fall back to defaults so partial JSON
//! files stay valid as options are added.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::RESOLVE_NUDGE;

/// Tunables for a `World`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Extra outward push for a circle resolved against a polygon
    pub resolve_nudge: f32,
    /// Log every dispatched overlap event at info level
    pub log_events: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            resolve_nudge: RESOLVE_NUDGE,
            log_events: true,
        }
    }
}

impl EngineSettings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read {}: {}, using default settings", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
