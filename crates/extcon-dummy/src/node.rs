//! Device node configuration
//!
//! The device-tree equivalent for a dummy extcon device. Boolean properties
//! default to false when absent, the same as reading a missing boolean
//! property from firmware.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Compatible string matched by the driver
pub const COMPATIBLE: &str = "linux,extcon-usb-dummy";

/// Platform device name matched by the driver
pub const PLATFORM_NAME: &str = "extcon-usb-dummy";

/// Default settle delay before resolving cable state (ms)
pub const DEFAULT_DEBOUNCE_MS: u64 = 20;

/// Properties read once when a device is attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeviceNode {
    /// Compatible string; must match [`COMPATIBLE`]
    #[serde(default = "default_compatible")]
    pub compatible: String,
    /// Initial raw ID value
    #[serde(default)]
    pub default_id: bool,
    /// Initial raw VBUS value
    #[serde(default)]
    pub default_vbus: bool,
    /// ID signal is wired
    #[serde(default)]
    pub id_det: bool,
    /// VBUS signal is wired
    #[serde(default)]
    pub vbus_det: bool,
    /// Settle delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_compatible() -> String {
    COMPATIBLE.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for DeviceNode {
    fn default() -> Self {
        Self {
            compatible: default_compatible(),
            default_id: false,
            default_vbus: false,
            id_det: false,
            vbus_det: false,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl DeviceNode {
    /// Check the node against the driver's match table
    pub fn check_compatible(&self) -> Result<(), ConfigError> {
        if self.compatible == COMPATIBLE || self.compatible == PLATFORM_NAME {
            Ok(())
        } else {
            Err(ConfigError::NotCompatible(self.compatible.clone()))
        }
    }

    /// Settle delay as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
