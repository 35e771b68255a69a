// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory records persisted by the host.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discovery::DeviceIdentity;
use crate::state::SwitchState;
use crate::types::Gangs;

use super::Characteristic;

/// Kind of service hosted by an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    /// On/off switch.
    Switch,
    /// Heating/cooling thermostat.
    Thermostat,
}

/// A service on an accessory, with the characteristics bound on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    name: String,
    kind: ServiceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtype: Option<Uuid>,
    characteristics: Vec<Characteristic>,
}

impl Service {
    /// Creates a service with no characteristic bound.
    #[must_use]
    pub fn new(kind: ServiceKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            subtype: None,
            characteristics: Vec::new(),
        }
    }

    /// Sets the subtype distinguishing several services of the same kind.
    #[must_use]
    pub fn with_subtype(mut self, subtype: Uuid) -> Self {
        self.subtype = Some(subtype);
        self
    }

    /// Returns the service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the service kind.
    #[must_use]
    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// Returns the subtype, if any.
    #[must_use]
    pub fn subtype(&self) -> Option<Uuid> {
        self.subtype
    }

    /// Returns the characteristics bound on this service.
    #[must_use]
    pub fn characteristics(&self) -> &[Characteristic] {
        &self.characteristics
    }

    /// Binds a characteristic; binding twice has no effect.
    pub fn bind(&mut self, characteristic: Characteristic) -> &mut Self {
        if !self.characteristics.contains(&characteristic) {
            self.characteristics.push(characteristic);
        }
        self
    }

    /// Returns `true` if the characteristic is bound.
    #[must_use]
    pub fn supports(&self, characteristic: Characteristic) -> bool {
        self.characteristics.contains(&characteristic)
    }
}

/// Manufacturer details shown by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryInformation {
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model name.
    pub model: String,
    /// Serial number, when the device exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

/// Typed context persisted with an accessory.
///
/// This is how the device identity travels from discovery to the adapter
/// bound on a later process start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AccessoryContext {
    /// An LC1 switch behind an S3 hub.
    Switch {
        /// The switch identity.
        identity: DeviceIdentity,
        /// Number of relays.
        gangs: Gangs,
        /// Relay state read by the latest discovery pass.
        status: SwitchState,
    },
    /// A Beok thermostat.
    Thermostat {
        /// The thermostat identity.
        identity: DeviceIdentity,
    },
}

impl AccessoryContext {
    /// Returns the device identity.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        match self {
            Self::Switch { identity, .. } | Self::Thermostat { identity } => identity,
        }
    }

    /// Takes the address and relay state seen by a later discovery pass.
    ///
    /// The unique id, the gang count and the name keep their persisted
    /// values. A context of the other kind is ignored.
    pub fn refresh(&mut self, seen: &AccessoryContext) {
        match (self, seen) {
            (
                Self::Switch {
                    identity, status, ..
                },
                Self::Switch {
                    identity: seen_identity,
                    status: seen_status,
                    ..
                },
            ) => {
                identity.host = seen_identity.host;
                *status = *seen_status;
            }
            (
                Self::Thermostat { identity },
                Self::Thermostat {
                    identity: seen_identity,
                },
            ) => identity.host = seen_identity.host,
            _ => {}
        }
    }
}

/// An accessory owned by the host.
///
/// The UUID is derived from the device's stable id, so re-discovery maps back
/// to the same record instead of creating a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessory {
    uuid: Uuid,
    display_name: String,
    context: AccessoryContext,
    #[serde(default)]
    information: AccessoryInformation,
    #[serde(default)]
    services: Vec<Service>,
}

impl Accessory {
    /// Creates an accessory with no services.
    #[must_use]
    pub fn new(display_name: impl Into<String>, uuid: Uuid, context: AccessoryContext) -> Self {
        Self {
            uuid,
            display_name: display_name.into(),
            context,
            information: AccessoryInformation::default(),
            services: Vec::new(),
        }
    }

    /// Returns the accessory UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the persisted context.
    #[must_use]
    pub fn context(&self) -> &AccessoryContext {
        &self.context
    }

    /// Returns the persisted context for in-place updates.
    pub fn context_mut(&mut self) -> &mut AccessoryContext {
        &mut self.context
    }

    /// Returns the manufacturer details.
    #[must_use]
    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    /// Replaces the manufacturer details.
    pub fn set_information(&mut self, information: AccessoryInformation) {
        self.information = information;
    }

    /// Returns all services.
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Looks up a service by name.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Adds a service and returns it.
    pub fn add_service(&mut self, service: Service) -> &mut Service {
        self.services.push(service);
        let last = self.services.len() - 1;
        &mut self.services[last]
    }

    /// Returns the named service, adding `service` if it is missing.
    pub fn service_or_add(&mut self, service: Service) -> &mut Service {
        match self.services.iter().position(|s| s.name == service.name) {
            Some(index) => &mut self.services[index],
            None => self.add_service(service),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::generate_uuid;
    use crate::transport::{RawDevice, SubDevice};
    use crate::types::{ChannelKey, MacAddr};

    fn thermostat_accessory() -> Accessory {
        let raw = RawDevice::new(
            crate::THERMOSTAT_TYPE,
            "10.0.0.30:80".parse().unwrap(),
            MacAddr::new([1, 2, 3, 4, 5, 6]),
            "Beok",
        );
        let identity = DeviceIdentity::for_thermostat(&raw);
        Accessory::new(
            "#Thermostat Beok",
            generate_uuid(&identity.unique_id),
            AccessoryContext::Thermostat { identity },
        )
    }

    #[test]
    fn service_or_add_reuses_existing() {
        let mut accessory = thermostat_accessory();
        accessory
            .service_or_add(Service::new(ServiceKind::Thermostat, "Thermostat Beok"))
            .bind(Characteristic::CurrentTemperature);
        accessory
            .service_or_add(Service::new(ServiceKind::Thermostat, "Thermostat Beok"))
            .bind(Characteristic::CurrentTemperature);

        assert_eq!(accessory.services().len(), 1);
        let service = accessory.service("Thermostat Beok").unwrap();
        assert_eq!(service.characteristics(), &[Characteristic::CurrentTemperature]);
    }

    #[test]
    fn context_exposes_identity() {
        let accessory = thermostat_accessory();
        assert_eq!(accessory.context().identity().unique_id, "01:02:03:04:05:06");
    }

    fn switch_context(address: &str, status: SwitchState) -> AccessoryContext {
        let hub = RawDevice::new(
            crate::SWITCH_HUB_TYPE,
            address.parse().unwrap(),
            MacAddr::new([1, 1, 1, 1, 1, 1]),
            "S3 Hub",
        );
        AccessoryContext::Switch {
            identity: DeviceIdentity::for_sub_device(&hub, &SubDevice::new("did-1", "Hall")),
            gangs: Gangs::Two,
            status,
        }
    }

    #[test]
    fn refresh_takes_new_address_and_status() {
        let off = SwitchState::new()
            .with(ChannelKey::Pwr1, false)
            .with(ChannelKey::Pwr2, false);
        let on = off.with(ChannelKey::Pwr2, true);
        let mut context = switch_context("10.0.0.2:80", off);

        context.refresh(&switch_context("10.0.0.50:80", on));

        let AccessoryContext::Switch {
            identity,
            gangs,
            status,
        } = &context
        else {
            panic!("expected a switch context");
        };
        assert_eq!(identity.host, "10.0.0.50:80".parse().unwrap());
        assert_eq!(identity.unique_id, "did-1");
        assert_eq!(*gangs, Gangs::Two);
        assert_eq!(status.get(ChannelKey::Pwr2), Some(true));
    }

    #[test]
    fn refresh_ignores_other_kind() {
        let mut accessory = thermostat_accessory();
        let before = accessory.context().clone();

        accessory
            .context_mut()
            .refresh(&switch_context("10.0.0.50:80", SwitchState::new()));

        assert_eq!(accessory.context(), &before);
    }

    #[test]
    fn context_is_tagged_in_json() {
        let accessory = thermostat_accessory();
        let json = serde_json::to_value(&accessory).unwrap();
        assert_eq!(json["context"]["kind"], "thermostat");
        assert_eq!(json["displayName"], "#Thermostat Beok");

        let back: Accessory = serde_json::from_value(json).unwrap();
        assert_eq!(back, accessory);
    }
}
