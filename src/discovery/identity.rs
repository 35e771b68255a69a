// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stable identity of a physical device.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::host::generate_uuid;
use crate::transport::{RawDevice, SubDevice};
use crate::types::MacAddr;

/// Identity of a physical device, persisted with its accessory.
///
/// `unique_id` is the hub-assigned id for switches and the MAC for
/// thermostats; it alone seeds the accessory UUID. `host` is the address the
/// device answered from in the latest discovery pass.
///
/// # Examples
///
/// ```
/// use broadlink_bridge::discovery::DeviceIdentity;
/// use broadlink_bridge::transport::RawDevice;
/// use broadlink_bridge::types::MacAddr;
/// use broadlink_bridge::THERMOSTAT_TYPE;
///
/// let raw = RawDevice::new(
///     THERMOSTAT_TYPE,
///     "192.168.1.30:80".parse().unwrap(),
///     MacAddr::new([0x24, 0xdf, 0xa7, 0x10, 0x20, 0x30]),
///     "Living room",
/// );
/// let identity = DeviceIdentity::for_thermostat(&raw);
/// assert_eq!(identity.unique_id, "24:df:a7:10:20:30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIdentity {
    /// Stable device id (sub-device id or MAC).
    pub unique_id: String,
    /// Address of the device (or its hub) in the latest discovery pass.
    pub host: SocketAddr,
    /// MAC of the device (or its hub).
    pub mac: MacAddr,
    /// Vendor type code of the device (or its hub).
    pub device_type: u16,
    /// Name reported by the device.
    pub name: String,
}

impl DeviceIdentity {
    /// Builds the identity of a switch paired with `hub`.
    #[must_use]
    pub fn for_sub_device(hub: &RawDevice, sub: &SubDevice) -> Self {
        Self {
            unique_id: sub.did.clone(),
            host: hub.host,
            mac: hub.mac,
            device_type: hub.device_type,
            name: sub.name.clone(),
        }
    }

    /// Builds the identity of a standalone thermostat, keyed by its MAC.
    #[must_use]
    pub fn for_thermostat(device: &RawDevice) -> Self {
        Self {
            unique_id: device.mac.to_string(),
            host: device.host,
            mac: device.mac,
            device_type: device.device_type,
            name: device.name.clone(),
        }
    }

    /// Returns the accessory UUID derived from `unique_id`.
    #[must_use]
    pub fn accessory_uuid(&self) -> Uuid {
        generate_uuid(&self.unique_id)
    }
}

/// Criteria for picking one device out of a discovery sweep.
///
/// A known MAC decides the match on its own: an address can be leased to
/// another device, so it is only consulted when no MAC is known.
///
/// # Examples
///
/// ```
/// use broadlink_bridge::discovery::DeviceLookup;
/// use broadlink_bridge::types::MacAddr;
///
/// let mac = MacAddr::new([1, 2, 3, 4, 5, 6]);
/// let lookup = DeviceLookup::by_address("10.0.0.7".parse().unwrap()).or_mac(mac);
/// assert_eq!(lookup.to_string(), "MAC 01:02:03:04:05:06 (last seen at 10.0.0.7)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceLookup {
    address: Option<IpAddr>,
    mac: Option<MacAddr>,
}

impl DeviceLookup {
    /// Matches the device answering from `address`.
    #[must_use]
    pub fn by_address(address: IpAddr) -> Self {
        Self {
            address: Some(address),
            mac: None,
        }
    }

    /// Matches the device with hardware address `mac`.
    #[must_use]
    pub fn by_mac(mac: MacAddr) -> Self {
        Self {
            address: None,
            mac: Some(mac),
        }
    }

    /// Pins the lookup to the device with hardware address `mac`.
    #[must_use]
    pub fn or_mac(mut self, mac: MacAddr) -> Self {
        self.mac = Some(mac);
        self
    }

    /// Finds the matching device in a sweep.
    #[must_use]
    pub fn find<'a>(&self, devices: &'a [RawDevice]) -> Option<&'a RawDevice> {
        match (self.mac, self.address) {
            (Some(mac), _) => devices.iter().find(|d| d.mac == mac),
            (None, Some(ip)) => devices.iter().find(|d| d.host.ip() == ip),
            (None, None) => None,
        }
    }
}

impl fmt::Display for DeviceLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.address, self.mac) {
            (Some(ip), Some(mac)) => write!(f, "MAC {mac} (last seen at {ip})"),
            (Some(ip), None) => write!(f, "address {ip}"),
            (None, Some(mac)) => write!(f, "MAC {mac}"),
            (None, None) => f.write_str("nothing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ip: &str, last: u8) -> RawDevice {
        RawDevice::new(
            crate::SWITCH_HUB_TYPE,
            format!("{ip}:80").parse().unwrap(),
            MacAddr::new([0, 0, 0, 0, 0, last]),
            "hub",
        )
    }

    #[test]
    fn sub_device_identity_uses_did() {
        let hub = raw("10.0.0.2", 1);
        let identity = DeviceIdentity::for_sub_device(&hub, &SubDevice::new("abc", "Hall"));
        assert_eq!(identity.unique_id, "abc");
        assert_eq!(identity.host, hub.host);
        assert_eq!(identity.mac, hub.mac);
        assert_eq!(identity.name, "Hall");
    }

    #[test]
    fn uuid_ignores_address() {
        let sub = SubDevice::new("abc", "Hall");
        let before = DeviceIdentity::for_sub_device(&raw("10.0.0.2", 1), &sub);
        let after = DeviceIdentity::for_sub_device(&raw("10.0.0.99", 1), &sub);
        assert_eq!(before.accessory_uuid(), after.accessory_uuid());
    }

    #[test]
    fn lookup_by_address_alone() {
        let devices = vec![raw("10.0.0.2", 1), raw("10.0.0.3", 2)];
        let lookup = DeviceLookup::by_address("10.0.0.3".parse().unwrap());
        assert_eq!(lookup.find(&devices).unwrap().mac.octets()[5], 2);
    }

    #[test]
    fn lookup_ignores_device_reusing_old_address() {
        // The hub moved and a thermostat took over its old lease.
        let mut newcomer = raw("10.0.0.2", 9);
        newcomer.device_type = crate::THERMOSTAT_TYPE;
        let devices = vec![newcomer, raw("10.0.0.50", 1)];

        let lookup =
            DeviceLookup::by_address("10.0.0.2".parse().unwrap()).or_mac(MacAddr::new([0, 0, 0, 0, 0, 1]));
        let found = lookup.find(&devices).unwrap();
        assert_eq!(found.mac.octets()[5], 1);
        assert_eq!(found.host, "10.0.0.50:80".parse().unwrap());
    }

    #[test]
    fn lookup_with_mac_misses_stranger_at_old_address() {
        let devices = vec![raw("10.0.0.2", 9)];
        let lookup =
            DeviceLookup::by_address("10.0.0.2".parse().unwrap()).or_mac(MacAddr::new([0, 0, 0, 0, 0, 1]));
        assert!(lookup.find(&devices).is_none());
    }

    #[test]
    fn lookup_falls_back_to_mac() {
        let devices = vec![raw("10.0.0.9", 1)];
        let lookup =
            DeviceLookup::by_address("10.0.0.2".parse().unwrap()).or_mac(MacAddr::new([0, 0, 0, 0, 0, 1]));
        assert!(lookup.find(&devices).is_some());
    }

    #[test]
    fn lookup_by_address_only_misses_moved_device() {
        let devices = vec![raw("10.0.0.9", 1)];
        let lookup = DeviceLookup::by_address("10.0.0.2".parse().unwrap());
        assert!(lookup.find(&devices).is_none());
    }

    #[test]
    fn identity_serializes_camel_case() {
        let identity = DeviceIdentity::for_sub_device(&raw("10.0.0.2", 1), &SubDevice::new("abc", "Hall"));
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["uniqueId"], "abc");
        assert_eq!(json["deviceType"], crate::SWITCH_HUB_TYPE);
        assert_eq!(json["mac"], "00:00:00:00:00:01");
    }
}
