// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform configuration and fixed identifiers.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name under which the platform registers with the host.
pub const PLATFORM_NAME: &str = "BroadlinkPlatform";

/// Name of the plugin that owns the registered accessories.
pub const PLUGIN_NAME: &str = "homebridge-broadlink-lc1";

/// Vendor type code of the S3 hub that carries LC1 switches.
pub const SWITCH_HUB_TYPE: u16 = 42573;

/// Vendor type code of the Beok (Hysen) thermostat.
pub const THERMOSTAT_TYPE: u16 = 20141;

/// The platform block from the host's configuration file.
///
/// Only the platform name is meaningful; everything about the devices comes
/// from discovery.
///
/// # Examples
///
/// ```
/// use broadlink_bridge::PlatformConfig;
///
/// let config = PlatformConfig::from_json(
///     r#"{"platform": "BroadlinkPlatform", "name": "Broadlink"}"#,
/// ).unwrap();
/// assert_eq!(config.display_name(), "Broadlink");
///
/// let config = PlatformConfig::new().with_name("Upstairs");
/// assert_eq!(config.display_name(), "Upstairs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Platform identifier; must be [`PLATFORM_NAME`].
    pub platform: String,
    /// Optional display name for log messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PlatformConfig {
    /// Creates a configuration for this platform with no display name.
    #[must_use]
    pub fn new() -> Self {
        Self {
            platform: PLATFORM_NAME.to_string(),
            name: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parses and validates a platform block.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the JSON is malformed, or
    /// `ConfigError::WrongPlatform` if the block names another platform.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the block belongs to this platform.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::WrongPlatform` on mismatch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.platform == PLATFORM_NAME {
            Ok(())
        } else {
            Err(ConfigError::WrongPlatform {
                expected: PLATFORM_NAME,
                found: self.platform.clone(),
            })
        }
    }

    /// Returns the display name, falling back to the platform name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(PLATFORM_NAME)
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::new()
    }
}
