// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device discovery, classification and session resolution.
//!
//! Broadlink devices are found by a UDP broadcast sweep and may change
//! address between sweeps, so nothing is cached: every call to
//! [`DeviceDirectory::resolve`] performs a fresh sweep, picks the matching
//! device and authenticates with it.
//!
//! # Examples
//!
//! ```no_run
//! use broadlink_bridge::discovery::{DeviceClass, DeviceDirectory};
//! use broadlink_bridge::transport::MemoryTransport;
//!
//! # async fn example() -> broadlink_bridge::Result<()> {
//! let directory = DeviceDirectory::new(MemoryTransport::new());
//!
//! for device in directory.discover().await? {
//!     match DeviceClass::of(&device) {
//!         DeviceClass::SwitchHub => println!("hub at {}", device.host),
//!         DeviceClass::Thermostat => println!("thermostat {}", device.mac),
//!         DeviceClass::Unknown => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod identity;

pub use identity::{DeviceIdentity, DeviceLookup};

use std::fmt;
use std::sync::Arc;

use crate::config::{SWITCH_HUB_TYPE, THERMOSTAT_TYPE};
use crate::error::{Error, TransportError};
use crate::transport::{RawDevice, Transport};

/// Kind of device, decided by its vendor type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    /// S3 hub with paired LC1 switches.
    SwitchHub,
    /// Beok (Hysen) thermostat.
    Thermostat,
    /// Any other Broadlink device.
    Unknown,
}

impl DeviceClass {
    /// Classifies a raw type code.
    #[must_use]
    pub const fn from_type_code(code: u16) -> Self {
        match code {
            SWITCH_HUB_TYPE => Self::SwitchHub,
            THERMOSTAT_TYPE => Self::Thermostat,
            _ => Self::Unknown,
        }
    }

    /// Classifies a discovered device.
    #[must_use]
    pub const fn of(device: &RawDevice) -> Self {
        Self::from_type_code(device.device_type)
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SwitchHub => "switch hub",
            Self::Thermostat => "thermostat",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Stateless resolver from device identity to an authenticated session.
///
/// Cloning is cheap; all clones share the same transport.
pub struct DeviceDirectory<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> DeviceDirectory<T> {
    /// Creates a directory over a transport.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    /// Creates a directory over a shared transport.
    #[must_use]
    pub fn from_shared(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Performs one discovery sweep.
    ///
    /// The result may be empty and may omit devices that answered a previous
    /// sweep.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the sweep itself fails.
    pub async fn discover(&self) -> Result<Vec<RawDevice>, Error> {
        let devices = self.transport.discover().await?;
        tracing::debug!(count = devices.len(), "Discovery sweep completed");
        Ok(devices)
    }

    /// Authenticates with a device found by a sweep.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthFailed` if the device rejects the handshake, or
    /// `Error::Transport` if it does not answer.
    pub async fn authenticate(&self, device: &RawDevice) -> Result<T::Session, Error> {
        match self.transport.auth(device).await {
            Ok(session) => Ok(session),
            Err(TransportError::HandshakeRejected(reason)) => Err(Error::AuthFailed {
                device: device.host.to_string(),
                reason,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Re-discovers the device matching `lookup` and authenticates with it.
    ///
    /// Every call costs a full discovery round-trip.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceUnreachable` if no device in the fresh sweep
    /// matches, `Error::AuthFailed` if the handshake is rejected, or
    /// `Error::Transport` if discovery fails.
    pub async fn resolve(&self, lookup: &DeviceLookup) -> Result<T::Session, Error> {
        let devices = self.discover().await?;
        let device = lookup.find(&devices).ok_or_else(|| {
            tracing::debug!(lookup = %lookup, "No matching device in sweep");
            Error::DeviceUnreachable {
                lookup: lookup.to_string(),
            }
        })?;

        tracing::trace!(lookup = %lookup, host = %device.host, "Resolved device");
        self.authenticate(device).await
    }
}

impl<T: Transport> Clone for DeviceDirectory<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> fmt::Debug for DeviceDirectory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceDirectory").finish_non_exhaustive()
    }
}
