// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process transport simulating a network of Broadlink devices.

use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::state::{SwitchState, ThermostatStatus};
use crate::types::MacAddr;

use super::{RawDevice, Session, SubDevice, Transport};

/// A write observed by the simulated network.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedWrite {
    /// `set_state` request sent to a hub for one of its switches.
    SwitchState {
        /// Target switch.
        did: String,
        /// Record exactly as sent.
        state: SwitchState,
    },
    /// `set_temp` request sent to a thermostat.
    Temperature {
        /// Target thermostat.
        mac: MacAddr,
        /// Requested setpoint.
        value: f64,
    },
}

/// Simulated network of hubs, switches and thermostats.
///
/// Cloning yields another handle onto the same network, so a test can keep
/// one handle to script failures while the platform owns another.
///
/// # Examples
///
/// ```
/// use broadlink_bridge::state::SwitchState;
/// use broadlink_bridge::transport::{MemoryTransport, RawDevice, SubDevice};
/// use broadlink_bridge::types::{ChannelKey, MacAddr};
/// use broadlink_bridge::SWITCH_HUB_TYPE;
///
/// let network = MemoryTransport::new();
/// let mac = MacAddr::new([0x34, 0xea, 0x34, 0, 0, 1]);
/// network.add_device(RawDevice::new(
///     SWITCH_HUB_TYPE,
///     "192.168.1.20:80".parse().unwrap(),
///     mac,
///     "S3 Hub",
/// ));
/// network.add_sub_device(
///     mac,
///     SubDevice::new("00000000000000000000a043b0d0783a", "Hall"),
///     SwitchState::new().with(ChannelKey::Pwr1, false),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    network: Arc<Mutex<Network>>,
}

#[derive(Debug, Default)]
struct Network {
    devices: Vec<SimDevice>,
    discovery_failure: Option<String>,
    discover_calls: usize,
    writes: Vec<RecordedWrite>,
    reads: Vec<String>,
}

#[derive(Debug)]
struct SimDevice {
    raw: RawDevice,
    reachable: bool,
    auth_rejection: Option<String>,
    sub_devices: Vec<SimSwitch>,
    status: Option<ThermostatStatus>,
}

#[derive(Debug)]
struct SimSwitch {
    info: SubDevice,
    state: SwitchState,
    read_failure: Option<String>,
}

impl Network {
    fn device(&self, mac: MacAddr) -> Option<&SimDevice> {
        self.devices.iter().find(|d| d.raw.mac == mac)
    }

    fn device_mut(&mut self, mac: MacAddr) -> Option<&mut SimDevice> {
        self.devices.iter_mut().find(|d| d.raw.mac == mac)
    }

    fn switch_mut(&mut self, did: &str) -> Option<&mut SimSwitch> {
        self.devices
            .iter_mut()
            .flat_map(|d| d.sub_devices.iter_mut())
            .find(|s| s.info.did == did)
    }
}

impl MemoryTransport {
    /// Creates an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device that answers discovery.
    pub fn add_device(&self, raw: RawDevice) {
        self.network.lock().devices.push(SimDevice {
            raw,
            reachable: true,
            auth_rejection: None,
            sub_devices: Vec::new(),
            status: None,
        });
    }

    /// Adds a thermostat with its initial status.
    pub fn add_thermostat(&self, raw: RawDevice, status: ThermostatStatus) {
        let mac = raw.mac;
        self.add_device(raw);
        if let Some(device) = self.network.lock().device_mut(mac) {
            device.status = Some(status);
        }
    }

    /// Pairs a switch with the hub identified by `hub_mac`.
    ///
    /// Does nothing if no such hub was added.
    pub fn add_sub_device(&self, hub_mac: MacAddr, info: SubDevice, state: SwitchState) {
        if let Some(hub) = self.network.lock().device_mut(hub_mac) {
            hub.sub_devices.push(SimSwitch {
                info,
                state,
                read_failure: None,
            });
        }
    }

    /// Makes a device stop (or resume) answering discovery.
    pub fn set_reachable(&self, mac: MacAddr, reachable: bool) {
        if let Some(device) = self.network.lock().device_mut(mac) {
            device.reachable = reachable;
        }
    }

    /// Moves a device to a new network address, as after a DHCP renewal.
    pub fn move_device(&self, mac: MacAddr, host: SocketAddr) {
        if let Some(device) = self.network.lock().device_mut(mac) {
            device.raw.host = host;
        }
    }

    /// Makes the device reject (or accept) the authentication handshake.
    pub fn reject_auth(&self, mac: MacAddr, reason: Option<&str>) {
        if let Some(device) = self.network.lock().device_mut(mac) {
            device.auth_rejection = reason.map(ToString::to_string);
        }
    }

    /// Makes state reads of one switch fail (or succeed again).
    pub fn fail_reads(&self, did: &str, reason: Option<&str>) {
        if let Some(switch) = self.network.lock().switch_mut(did) {
            switch.read_failure = reason.map(ToString::to_string);
        }
    }

    /// Makes every discovery sweep fail (or succeed again).
    pub fn fail_discovery(&self, reason: Option<&str>) {
        self.network.lock().discovery_failure = reason.map(ToString::to_string);
    }

    /// Changes a switch's relays as if toggled at the wall.
    pub fn set_switch_state(&self, did: &str, state: SwitchState) {
        if let Some(switch) = self.network.lock().switch_mut(did) {
            switch.state = state;
        }
    }

    /// Returns the relay state currently held by a switch.
    #[must_use]
    pub fn switch_state(&self, did: &str) -> Option<SwitchState> {
        self.network.lock().switch_mut(did).map(|s| s.state)
    }

    /// Replaces a thermostat's status.
    pub fn set_thermostat_status(&self, mac: MacAddr, status: ThermostatStatus) {
        if let Some(device) = self.network.lock().device_mut(mac) {
            device.status = Some(status);
        }
    }

    /// Returns the status currently held by a thermostat.
    #[must_use]
    pub fn thermostat_status(&self, mac: MacAddr) -> Option<ThermostatStatus> {
        self.network.lock().device(mac).and_then(|d| d.status)
    }

    /// Returns the number of discovery sweeps performed so far.
    #[must_use]
    pub fn discover_count(&self) -> usize {
        self.network.lock().discover_calls
    }

    /// Returns every write received so far, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.network.lock().writes.clone()
    }

    /// Returns the ids of switches whose state was read, in order.
    #[must_use]
    pub fn reads(&self) -> Vec<String> {
        self.network.lock().reads.clone()
    }
}

impl Transport for MemoryTransport {
    type Session = MemorySession;

    async fn discover(&self) -> Result<Vec<RawDevice>, TransportError> {
        let mut network = self.network.lock();
        network.discover_calls += 1;

        if let Some(reason) = &network.discovery_failure {
            return Err(TransportError::Discovery(reason.clone()));
        }

        Ok(network
            .devices
            .iter()
            .filter(|d| d.reachable)
            .map(|d| d.raw.clone())
            .collect())
    }

    async fn auth(&self, device: &RawDevice) -> Result<MemorySession, TransportError> {
        let network = self.network.lock();
        let sim = network
            .device(device.mac)
            .filter(|d| d.reachable)
            .ok_or_else(|| TransportError::Request(format!("no answer from {}", device.host)))?;

        if let Some(reason) = &sim.auth_rejection {
            return Err(TransportError::HandshakeRejected(reason.clone()));
        }

        Ok(MemorySession {
            network: Arc::clone(&self.network),
            mac: device.mac,
        })
    }
}

/// Session with one simulated device.
#[derive(Debug, Clone)]
pub struct MemorySession {
    network: Arc<Mutex<Network>>,
    mac: MacAddr,
}

impl MemorySession {
    fn gone(&self) -> TransportError {
        TransportError::Request(format!("device {} stopped answering", self.mac))
    }
}

impl Session for MemorySession {
    async fn sub_devices(&self) -> Result<Vec<SubDevice>, TransportError> {
        let network = self.network.lock();
        let device = network.device(self.mac).ok_or_else(|| self.gone())?;
        if device.status.is_some() {
            return Err(TransportError::Unsupported("sub_devices"));
        }
        Ok(device.sub_devices.iter().map(|s| s.info.clone()).collect())
    }

    async fn get_state(&self, did: &str) -> Result<SwitchState, TransportError> {
        let mut network = self.network.lock();
        network.reads.push(did.to_string());

        let device = network.device(self.mac).ok_or_else(|| self.gone())?;
        let switch = device
            .sub_devices
            .iter()
            .find(|s| s.info.did == did)
            .ok_or_else(|| TransportError::Request(format!("unknown sub-device {did}")))?;

        if let Some(reason) = &switch.read_failure {
            return Err(TransportError::Request(reason.clone()));
        }
        Ok(switch.state)
    }

    async fn set_state(
        &self,
        did: &str,
        state: &SwitchState,
    ) -> Result<SwitchState, TransportError> {
        let mut network = self.network.lock();
        network.writes.push(RecordedWrite::SwitchState {
            did: did.to_string(),
            state: *state,
        });

        let mac = self.mac;
        let device = network.device_mut(mac).ok_or_else(|| self.gone())?;
        let switch = device
            .sub_devices
            .iter_mut()
            .find(|s| s.info.did == did)
            .ok_or_else(|| TransportError::Request(format!("unknown sub-device {did}")))?;

        // The switch only applies the channels it physically has.
        for key in switch.state.present_channels() {
            if let Some(value) = state.get(key) {
                switch.state.set(key, value);
            }
        }
        Ok(switch.state)
    }

    async fn full_status(&self) -> Result<ThermostatStatus, TransportError> {
        let network = self.network.lock();
        let device = network.device(self.mac).ok_or_else(|| self.gone())?;
        device
            .status
            .ok_or(TransportError::Unsupported("full_status"))
    }

    async fn set_temp(&self, value: f64) -> Result<(), TransportError> {
        let mut network = self.network.lock();
        network.writes.push(RecordedWrite::Temperature {
            mac: self.mac,
            value,
        });

        let mac = self.mac;
        let device = network.device_mut(mac).ok_or_else(|| self.gone())?;
        let status = device
            .status
            .as_mut()
            .ok_or(TransportError::Unsupported("set_temp"))?;
        status.thermostat_temp = value;
        Ok(())
    }
}
