// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay channels of an LC1 switch exposed as independent switch services.

use parking_lot::Mutex;

use crate::discovery::{DeviceDirectory, DeviceIdentity, DeviceLookup};
use crate::error::{Error, Result, TransportError};
use crate::host::{
    Accessory, AccessoryInformation, Characteristic, Service, ServiceKind, generate_uuid,
};
use crate::state::SwitchState;
use crate::transport::{Session, Transport};
use crate::types::{ChannelKey, Gangs};

/// Manufacturer shown for LC1 switches.
pub const MANUFACTURER: &str = "Broadlink";

/// Model shown for LC1 switches.
pub const MODEL: &str = "LC1";

/// Maps the channels of one switch onto `gangs` switch services.
///
/// The vendor protocol reads and writes the whole relay record at once, so
/// the adapter keeps the last state the device reported and sends it back
/// with every write. Only the targeted channel changes.
///
/// Every read and write starts with a fresh discovery sweep in which the hub
/// is matched by its MAC, wherever its address has moved.
pub struct SwitchAdapter<T: Transport> {
    directory: DeviceDirectory<T>,
    identity: DeviceIdentity,
    gangs: Gangs,
    snapshot: Mutex<SwitchState>,
}

impl<T: Transport> SwitchAdapter<T> {
    /// Creates an adapter seeded with the state captured at discovery.
    #[must_use]
    pub fn new(
        directory: DeviceDirectory<T>,
        identity: DeviceIdentity,
        gangs: Gangs,
        initial: SwitchState,
    ) -> Self {
        Self {
            directory,
            identity,
            gangs,
            snapshot: Mutex::new(initial.restricted_to(gangs)),
        }
    }

    /// Returns the device identity.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Returns the number of channels exposed.
    #[must_use]
    pub fn gangs(&self) -> Gangs {
        self.gangs
    }

    /// Returns the last state reported by the device.
    #[must_use]
    pub fn snapshot(&self) -> SwitchState {
        *self.snapshot.lock()
    }

    /// Adds the information and one switch service per channel to `accessory`.
    ///
    /// Services already present (restored from the host cache) are reused.
    pub fn configure(&self, accessory: &mut Accessory) {
        accessory.set_information(AccessoryInformation {
            manufacturer: MANUFACTURER.to_string(),
            model: MODEL.to_string(),
            serial_number: Some(self.identity.unique_id.clone()),
        });

        for channel in self.gangs.channels() {
            let seed = format!("{}-{}", self.identity.unique_id, channel.index());
            let subtype = generate_uuid(&seed);
            accessory
                .service_or_add(
                    Service::new(ServiceKind::Switch, channel.service_name()).with_subtype(subtype),
                )
                .bind(Characteristic::On);
        }
    }

    /// Reads the relay state of one channel from the device.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChannelNotAvailable` for a channel beyond the gang
    /// count (the device is not contacted), `Error::DeviceUnreachable` if the
    /// hub does not answer discovery, or a transport error if the read fails.
    pub async fn get(&self, channel: ChannelKey) -> Result<bool> {
        self.check_channel(channel)?;

        let session = self.directory.resolve(&self.lookup()).await?;
        let state = session.get_state(&self.identity.unique_id).await?;

        let value = {
            let mut snapshot = self.snapshot.lock();
            for key in state.restricted_to(self.gangs).present_channels() {
                if let Some(on) = state.get(key) {
                    snapshot.set(key, on);
                }
            }
            state.get(channel)
        };

        let value = value.ok_or_else(|| {
            TransportError::MalformedResponse(format!(
                "{} missing from state of {}",
                channel, self.identity.unique_id
            ))
        })?;

        tracing::debug!(
            did = %self.identity.unique_id,
            channel = %channel,
            value,
            "Get Characteristic On"
        );
        Ok(value)
    }

    /// Switches one channel, sending the other channels unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChannelNotAvailable` for a channel beyond the gang
    /// count, `Error::DeviceUnreachable` if the hub does not answer
    /// discovery, or a transport error if the write fails.
    pub async fn set(&self, channel: ChannelKey, value: bool) -> Result<()> {
        self.check_channel(channel)?;

        let session = self.directory.resolve(&self.lookup()).await?;
        let request = self.snapshot.lock().restricted_to(self.gangs).with(channel, value);

        tracing::debug!(
            did = %self.identity.unique_id,
            channel = %channel,
            value,
            "Set Characteristic On"
        );
        let acked = session.set_state(&self.identity.unique_id, &request).await?;
        *self.snapshot.lock() = acked.restricted_to(self.gangs);
        Ok(())
    }

    fn check_channel(&self, channel: ChannelKey) -> Result<()> {
        if self.gangs.contains(channel) {
            Ok(())
        } else {
            Err(Error::ChannelNotAvailable {
                channel,
                gangs: self.gangs,
            })
        }
    }

    fn lookup(&self) -> DeviceLookup {
        DeviceLookup::by_address(self.identity.host.ip()).or_mac(self.identity.mac)
    }
}

impl<T: Transport> std::fmt::Debug for SwitchAdapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchAdapter")
            .field("identity", &self.identity)
            .field("gangs", &self.gangs)
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}
