//! Console settings

use std::path::{Path, PathBuf};

use extcon_dummy::DeviceNode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Settings loaded at startup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Device node the console attaches
    #[serde(default)]
    pub device: DeviceNode,
    /// Log cable changes as the subscriber sees them
    #[serde(default = "default_true")]
    pub log_cable_events: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device: DeviceNode::default(),
            log_cable_events: true,
        }
    }
}

impl Settings {
    /// `device.json` in the per-user config directory, if there is one
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("extcon-usb-dummy").join("device.json"))
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`, or from the default location
    ///
    /// A missing default file is silent; a missing explicit file or bad JSON
    /// is logged. Either way the defaults are used.
    pub fn load(path: Option<&Path>) -> Self {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::settings_path() {
                Some(p) => (p, false),
                None => return Self::default(),
            },
        };

        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                if explicit {
                    warn!("Failed to read {}: {}, using defaults", path.display(), e);
                }
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Invalid settings in {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
