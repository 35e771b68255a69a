// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory model shared with the home-automation host.
//!
//! The host owns accessory persistence and presents accessories to the end
//! user. This module models what the bridge needs from it:
//!
//! - [`Accessory`] records with typed [`AccessoryContext`] and [`Service`]s
//! - [`Characteristic`]s and their [`CharacteristicValue`]s
//! - [`generate_uuid`] for deterministic accessory and service UUIDs
//! - the [`PlatformHost`] registration hook
//!
//! Characteristic reads and writes from the host are routed through
//! [`Platform::get_characteristic`](crate::Platform::get_characteristic) and
//! [`Platform::set_characteristic`](crate::Platform::set_characteristic).

mod accessory;
mod characteristic;
mod memory;

pub use accessory::{Accessory, AccessoryContext, AccessoryInformation, Service, ServiceKind};
pub use characteristic::{
    Characteristic, CharacteristicValue, CurrentHeatingCoolingState, TargetHeatingCoolingState,
    TemperatureDisplayUnits,
};
pub use memory::MemoryHost;

use uuid::Uuid;

/// Namespace for UUIDs generated from device ids.
const UUID_NAMESPACE: Uuid = Uuid::from_u128(0x6b1f_3c2e_9d4a_4f1b_8e2d_5a7c_0b9e_41d3);

/// Derives a UUID from a seed string.
///
/// The same seed always yields the same UUID, across processes and hosts.
///
/// # Examples
///
/// ```
/// use broadlink_bridge::host::generate_uuid;
///
/// assert_eq!(generate_uuid("abc"), generate_uuid("abc"));
/// assert_ne!(generate_uuid("abc"), generate_uuid("abc-0"));
/// ```
#[must_use]
pub fn generate_uuid(seed: &str) -> Uuid {
    Uuid::new_v5(&UUID_NAMESPACE, seed.as_bytes())
}

/// Hooks the host exposes to a dynamic platform.
pub trait PlatformHost: Send + Sync + 'static {
    /// Registers newly created accessories so the host persists and publishes them.
    fn register_accessories(&self, plugin: &str, platform: &str, accessories: &[Accessory]);

    /// Persists changes to accessories that were restored from the cache.
    fn update_accessories(&self, _accessories: &[Accessory]) {}
}

#[cfg(test)]
mod tests {
    use std::slice;

    use parking_lot::Mutex;

    use super::*;
    use crate::discovery::DeviceIdentity;
    use crate::transport::RawDevice;
    use crate::{MacAddr, PLATFORM_NAME, PLUGIN_NAME, THERMOSTAT_TYPE};

    #[derive(Default)]
    struct RegisterOnly {
        registered: Mutex<Vec<Uuid>>,
    }

    impl PlatformHost for RegisterOnly {
        fn register_accessories(&self, _plugin: &str, _platform: &str, accessories: &[Accessory]) {
            self.registered
                .lock()
                .extend(accessories.iter().map(Accessory::uuid));
        }
    }

    #[test]
    fn update_defaults_to_nothing() {
        let identity = DeviceIdentity::for_thermostat(&RawDevice::new(
            THERMOSTAT_TYPE,
            "10.0.0.30:80".parse().unwrap(),
            MacAddr::new([1, 2, 3, 4, 5, 6]),
            "Beok",
        ));
        let accessory = Accessory::new(
            "#Thermostat Beok",
            identity.accessory_uuid(),
            AccessoryContext::Thermostat { identity },
        );
        let host = RegisterOnly::default();

        host.register_accessories(PLUGIN_NAME, PLATFORM_NAME, slice::from_ref(&accessory));
        host.update_accessories(slice::from_ref(&accessory));

        assert_eq!(*host.registered.lock(), vec![accessory.uuid()]);
    }
}
