// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform event types.

use std::net::SocketAddr;

use uuid::Uuid;

/// Events emitted while the platform synchronizes accessories.
///
/// # Examples
///
/// ```
/// use broadlink_bridge::event::PlatformEvent;
/// use uuid::Uuid;
///
/// let event = PlatformEvent::accessory_registered(Uuid::nil(), "#1 LC1 2 Gang Switch");
/// assert!(event.is_lifecycle());
/// assert_eq!(event.accessory_uuid(), Some(Uuid::nil()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// A new accessory was created and handed to the host.
    AccessoryRegistered {
        /// The accessory UUID.
        uuid: Uuid,
        /// The display name.
        name: String,
    },

    /// An accessory from the host cache was matched to a discovered device.
    AccessoryRestored {
        /// The accessory UUID.
        uuid: Uuid,
        /// The display name.
        name: String,
    },

    /// A discovered device has an unsupported type code.
    DeviceIgnored {
        /// Vendor type code.
        device_type: u16,
        /// Address the device answered from.
        host: SocketAddr,
    },

    /// A device or sub-device could not be synchronized.
    SyncFailed {
        /// Description of the device.
        device: String,
        /// Error message.
        error: String,
    },
}

impl PlatformEvent {
    /// Returns the accessory UUID, for accessory lifecycle events.
    #[must_use]
    pub fn accessory_uuid(&self) -> Option<Uuid> {
        match self {
            Self::AccessoryRegistered { uuid, .. } | Self::AccessoryRestored { uuid, .. } => {
                Some(*uuid)
            }
            Self::DeviceIgnored { .. } | Self::SyncFailed { .. } => None,
        }
    }

    /// Returns `true` if an accessory was registered or restored.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::AccessoryRegistered { .. } | Self::AccessoryRestored { .. }
        )
    }

    /// Creates an accessory registered event.
    #[must_use]
    pub fn accessory_registered(uuid: Uuid, name: impl Into<String>) -> Self {
        Self::AccessoryRegistered {
            uuid,
            name: name.into(),
        }
    }

    /// Creates an accessory restored event.
    #[must_use]
    pub fn accessory_restored(uuid: Uuid, name: impl Into<String>) -> Self {
        Self::AccessoryRestored {
            uuid,
            name: name.into(),
        }
    }

    /// Creates a device ignored event.
    #[must_use]
    pub fn device_ignored(device_type: u16, host: SocketAddr) -> Self {
        Self::DeviceIgnored { device_type, host }
    }

    /// Creates a sync failed event.
    #[must_use]
    pub fn sync_failed(device: impl Into<String>, error: impl ToString) -> Self {
        Self::SyncFailed {
            device: device.into(),
            error: error.to_string(),
        }
    }
}
