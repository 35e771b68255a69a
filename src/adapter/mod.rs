// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adapters translating host characteristics into device operations.
//!
//! An adapter is built from the identity stored in an accessory's context,
//! either when the accessory is first created or when it is restored from
//! the host cache. [`AccessoryHandler`] picks the right adapter for a context
//! and routes characteristic reads and writes to it.

mod switch;
mod thermostat;

pub use switch::SwitchAdapter;
pub use thermostat::{SERVICE_NAME as THERMOSTAT_SERVICE_NAME, ThermostatAdapter};

use crate::discovery::DeviceDirectory;
use crate::error::{Error, Result, ValueError};
use crate::host::{
    Accessory, AccessoryContext, Characteristic, CharacteristicValue, TargetHeatingCoolingState,
    TemperatureDisplayUnits,
};
use crate::transport::Transport;
use crate::types::ChannelKey;

/// Adapter bound to one accessory.
#[derive(Debug)]
pub enum AccessoryHandler<T: Transport> {
    /// Handler for a multi-gang switch.
    Switch(SwitchAdapter<T>),
    /// Handler for a thermostat.
    Thermostat(ThermostatAdapter<T>),
}

impl<T: Transport> AccessoryHandler<T> {
    /// Builds the adapter matching the accessory's context and adds its
    /// services to the accessory.
    #[must_use]
    pub fn attach(directory: &DeviceDirectory<T>, accessory: &mut Accessory) -> Self {
        let handler = match accessory.context() {
            AccessoryContext::Switch {
                identity,
                gangs,
                status,
            } => Self::Switch(SwitchAdapter::new(
                directory.clone(),
                identity.clone(),
                *gangs,
                *status,
            )),
            AccessoryContext::Thermostat { identity } => {
                Self::Thermostat(ThermostatAdapter::new(directory.clone(), identity.clone()))
            }
        };

        match &handler {
            Self::Switch(adapter) => adapter.configure(accessory),
            Self::Thermostat(adapter) => adapter.configure(accessory),
        }
        handler
    }

    /// Reads a characteristic of one of the accessory's services.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` if the adapter has no
    /// handler for the pair, or any error raised by the device.
    pub async fn get(
        &self,
        service: &str,
        characteristic: Characteristic,
    ) -> Result<CharacteristicValue> {
        match self {
            Self::Switch(adapter) => {
                let channel = switch_channel(service, characteristic)?;
                Ok(adapter.get(channel).await?.into())
            }
            Self::Thermostat(adapter) => match characteristic {
                Characteristic::CurrentHeatingCoolingState => {
                    Ok(adapter.current_heating_cooling_state().await?.into())
                }
                Characteristic::TargetHeatingCoolingState => {
                    Ok(adapter.target_heating_cooling_state().await?.into())
                }
                Characteristic::CurrentTemperature => {
                    Ok(adapter.current_temperature().await?.into())
                }
                Characteristic::TargetTemperature => Ok(adapter.target_temperature().await?.into()),
                Characteristic::TemperatureDisplayUnits => {
                    Ok(adapter.temperature_display_units().into())
                }
                Characteristic::On => Err(not_supported(service, characteristic)),
            },
        }
    }

    /// Writes a characteristic of one of the accessory's services.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` for read-only or unknown
    /// characteristics, `Error::Value` if the value has the wrong shape, or
    /// any error raised by the device.
    pub async fn set(
        &self,
        service: &str,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<()> {
        if !characteristic.is_writable() {
            return Err(not_supported(service, characteristic));
        }

        match self {
            Self::Switch(adapter) => {
                let channel = switch_channel(service, characteristic)?;
                let on = value
                    .as_bool()
                    .ok_or_else(|| invalid_value(characteristic, value))?;
                tracing::info!(
                    did = %adapter.identity().unique_id,
                    channel = %channel,
                    "Set Characteristic On -> {on}"
                );
                adapter.set(channel, on).await
            }
            Self::Thermostat(adapter) => match characteristic {
                Characteristic::TargetHeatingCoolingState => {
                    let code = value
                        .as_u8()
                        .ok_or_else(|| invalid_value(characteristic, value))?;
                    let state = TargetHeatingCoolingState::try_from(code)?;
                    adapter.set_target_heating_cooling_state(state).await
                }
                Characteristic::TargetTemperature => {
                    let celsius = value
                        .as_f64()
                        .ok_or_else(|| invalid_value(characteristic, value))?;
                    adapter.set_target_temperature(celsius).await
                }
                Characteristic::TemperatureDisplayUnits => {
                    let code = value
                        .as_u8()
                        .ok_or_else(|| invalid_value(characteristic, value))?;
                    let units = TemperatureDisplayUnits::try_from(code)?;
                    adapter.set_temperature_display_units(units);
                    Ok(())
                }
                _ => Err(not_supported(service, characteristic)),
            },
        }
    }
}

fn switch_channel(service: &str, characteristic: Characteristic) -> Result<ChannelKey> {
    if characteristic != Characteristic::On {
        return Err(not_supported(service, characteristic));
    }
    ChannelKey::from_service_name(service).ok_or_else(|| not_supported(service, characteristic))
}

fn not_supported(service: &str, characteristic: Characteristic) -> Error {
    Error::CharacteristicNotSupported {
        service: service.to_string(),
        characteristic: characteristic.to_string(),
    }
}

fn invalid_value(characteristic: Characteristic, value: CharacteristicValue) -> Error {
    ValueError::InvalidCharacteristicValue {
        characteristic: characteristic.to_string(),
        value: value.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DeviceIdentity;
    use crate::state::{SwitchState, ThermostatStatus};
    use crate::transport::{MemoryTransport, RawDevice, SubDevice};
    use crate::types::{Gangs, MacAddr};

    const HUB_MAC: MacAddr = MacAddr::new([0x34, 0xea, 0x34, 0, 0, 1]);
    const THERMOSTAT_MAC: MacAddr = MacAddr::new([0x24, 0xdf, 0xa7, 0, 0, 2]);

    fn network() -> (MemoryTransport, RawDevice, RawDevice) {
        let hub = RawDevice::new(
            crate::SWITCH_HUB_TYPE,
            "10.0.0.2:80".parse().unwrap(),
            HUB_MAC,
            "hub",
        );
        let thermostat = RawDevice::new(
            crate::THERMOSTAT_TYPE,
            "10.0.0.3:80".parse().unwrap(),
            THERMOSTAT_MAC,
            "Beok",
        );
        let network = MemoryTransport::new();
        network.add_device(hub.clone());
        network.add_sub_device(
            HUB_MAC,
            SubDevice::new("did-1", "Hall"),
            SwitchState::new().with(ChannelKey::Pwr1, false),
        );
        network.add_thermostat(thermostat.clone(), ThermostatStatus::new(19.0, 21.0, false));
        (network, hub, thermostat)
    }

    fn switch_handler() -> (MemoryTransport, AccessoryHandler<MemoryTransport>) {
        let (network, hub, _) = network();
        let identity = DeviceIdentity::for_sub_device(&hub, &SubDevice::new("did-1", "Hall"));
        let mut accessory = Accessory::new(
            "#1 LC1 1 Gang Switch",
            identity.accessory_uuid(),
            AccessoryContext::Switch {
                identity,
                gangs: Gangs::One,
                status: SwitchState::new().with(ChannelKey::Pwr1, false),
            },
        );
        let directory = DeviceDirectory::new(network.clone());
        let handler = AccessoryHandler::attach(&directory, &mut accessory);
        (network, handler)
    }

    fn thermostat_handler() -> (MemoryTransport, AccessoryHandler<MemoryTransport>) {
        let (network, _, thermostat) = network();
        let identity = DeviceIdentity::for_thermostat(&thermostat);
        let mut accessory = Accessory::new(
            "#Thermostat Beok",
            identity.accessory_uuid(),
            AccessoryContext::Thermostat { identity },
        );
        let directory = DeviceDirectory::new(network.clone());
        let handler = AccessoryHandler::attach(&directory, &mut accessory);
        (network, handler)
    }

    #[tokio::test]
    async fn switch_on_accepts_numeric_flags() {
        let (network, handler) = switch_handler();
        handler
            .set("Switch One", Characteristic::On, CharacteristicValue::Int(1))
            .await
            .unwrap();

        assert_eq!(
            network.switch_state("did-1").unwrap().get(ChannelKey::Pwr1),
            Some(true)
        );
        assert_eq!(
            handler.get("Switch One", Characteristic::On).await.unwrap(),
            CharacteristicValue::Bool(true)
        );
    }

    #[tokio::test]
    async fn switch_rejects_thermostat_characteristics() {
        let (_, handler) = switch_handler();
        let err = handler
            .get("Switch One", Characteristic::CurrentTemperature)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CharacteristicNotSupported { .. }));
    }

    #[tokio::test]
    async fn switch_rejects_non_boolean_value() {
        let (_, handler) = switch_handler();
        let err = handler
            .set("Switch One", Characteristic::On, CharacteristicValue::Float(0.5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Value(ValueError::InvalidCharacteristicValue { .. })
        ));
    }

    #[tokio::test]
    async fn thermostat_reads_are_encoded_for_the_host() {
        let (_, handler) = thermostat_handler();
        let service = THERMOSTAT_SERVICE_NAME;

        assert_eq!(
            handler
                .get(service, Characteristic::CurrentHeatingCoolingState)
                .await
                .unwrap(),
            CharacteristicValue::Int(1)
        );
        assert_eq!(
            handler
                .get(service, Characteristic::CurrentTemperature)
                .await
                .unwrap(),
            CharacteristicValue::Float(19.0)
        );
        assert_eq!(
            handler
                .get(service, Characteristic::TemperatureDisplayUnits)
                .await
                .unwrap(),
            CharacteristicValue::Int(0)
        );
    }

    #[tokio::test]
    async fn read_only_characteristic_cannot_be_written() {
        let (_, handler) = thermostat_handler();
        let err = handler
            .set(
                THERMOSTAT_SERVICE_NAME,
                Characteristic::CurrentTemperature,
                CharacteristicValue::Float(20.0),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CharacteristicNotSupported { .. }));
    }

    #[tokio::test]
    async fn unknown_mode_code_is_rejected() {
        let (network, handler) = thermostat_handler();
        let err = handler
            .set(
                THERMOSTAT_SERVICE_NAME,
                Characteristic::TargetHeatingCoolingState,
                CharacteristicValue::Int(7),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Value(_)));
        assert!(network.writes().is_empty());
    }

    #[tokio::test]
    async fn target_temperature_accepts_integers() {
        let (network, handler) = thermostat_handler();
        handler
            .set(
                THERMOSTAT_SERVICE_NAME,
                Characteristic::TargetTemperature,
                CharacteristicValue::Int(22),
            )
            .await
            .unwrap();

        let status = network.thermostat_status(THERMOSTAT_MAC).unwrap();
        assert!((status.thermostat_temp - 22.0).abs() < f64::EPSILON);
    }
}
