// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seam to the Broadlink device transport.
//!
//! Packet encryption and UDP discovery framing live behind the [`Transport`]
//! and [`Session`] traits. The bridge only relies on the operations below:
//!
//! - [`Transport::discover`]: broadcast sweep returning whoever answered
//! - [`Transport::auth`]: handshake yielding an authenticated [`Session`]
//! - [`Session::sub_devices`], [`Session::get_state`], [`Session::set_state`]:
//!   LC1 switches behind an S3 hub
//! - [`Session::full_status`], [`Session::set_temp`]: Beok thermostats
//!
//! [`MemoryTransport`] implements both traits over an in-process network and
//! is used to drive the platform without hardware.

mod memory;

pub use memory::{MemorySession, MemoryTransport, RecordedWrite};

use std::future::Future;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::state::{SwitchState, ThermostatStatus};
use crate::types::MacAddr;

/// A device that answered a discovery sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDevice {
    /// Vendor device type code.
    pub device_type: u16,
    /// Network address the device answered from.
    pub host: SocketAddr,
    /// Hardware address.
    pub mac: MacAddr,
    /// Name configured on the device.
    pub name: String,
}

impl RawDevice {
    /// Creates a discovered device record.
    #[must_use]
    pub fn new(
        device_type: u16,
        host: SocketAddr,
        mac: MacAddr,
        name: impl Into<String>,
    ) -> Self {
        Self {
            device_type,
            host,
            mac,
            name: name.into(),
        }
    }
}

/// A switch paired with an S3 hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubDevice {
    /// Hub-assigned device id.
    pub did: String,
    /// Name configured in the vendor app.
    pub name: String,
}

impl SubDevice {
    /// Creates a sub-device record.
    #[must_use]
    pub fn new(did: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            did: did.into(),
            name: name.into(),
        }
    }
}

/// Network-level access to Broadlink devices.
///
/// Discovery is connectionless: every call performs a fresh sweep and may
/// miss devices that answered a moment earlier.
pub trait Transport: Send + Sync + 'static {
    /// Authenticated session type produced by [`auth`](Self::auth).
    type Session: Session;

    /// Broadcasts a discovery request and collects the devices that answer.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Discovery` if the sweep cannot be performed.
    fn discover(&self) -> impl Future<Output = Result<Vec<RawDevice>, TransportError>> + Send;

    /// Performs the authentication handshake with a device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device rejects the handshake or does not answer.
    fn auth(
        &self,
        device: &RawDevice,
    ) -> impl Future<Output = Result<Self::Session, TransportError>> + Send;
}

/// An authenticated session with one device.
///
/// Hubs implement the switch operations and thermostats the status
/// operations; calling the other family returns
/// `TransportError::Unsupported`.
pub trait Session: Send + Sync + 'static {
    /// Lists the switches paired with a hub.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn sub_devices(&self) -> impl Future<Output = Result<Vec<SubDevice>, TransportError>> + Send;

    /// Reads the relay state of a paired switch.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn get_state(
        &self,
        did: &str,
    ) -> impl Future<Output = Result<SwitchState, TransportError>> + Send;

    /// Writes the relay state of a paired switch and returns the acknowledged state.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn set_state(
        &self,
        did: &str,
        state: &SwitchState,
    ) -> impl Future<Output = Result<SwitchState, TransportError>> + Send;

    /// Reads the full status record of a thermostat.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn full_status(&self) -> impl Future<Output = Result<ThermostatStatus, TransportError>> + Send;

    /// Sets the thermostat setpoint in Celsius.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn set_temp(&self, value: f64) -> impl Future<Output = Result<(), TransportError>> + Send;
}
