// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Beok thermostat exposed as a heating/cooling service.

use crate::discovery::{DeviceDirectory, DeviceIdentity, DeviceLookup};
use crate::error::{Result, ValueError};
use crate::host::{
    Accessory, AccessoryInformation, Characteristic, CurrentHeatingCoolingState, Service,
    ServiceKind, TargetHeatingCoolingState, TemperatureDisplayUnits,
};
use crate::state::ThermostatStatus;
use crate::transport::{Session, Transport};

/// Name of the thermostat service.
pub const SERVICE_NAME: &str = "Thermostat Beok";

/// Manufacturer shown for Beok thermostats.
pub const MANUFACTURER: &str = "Beok";

/// Model shown for Beok thermostats.
pub const MODEL: &str = "HY02/HY03";

const CHARACTERISTICS: [Characteristic; 5] = [
    Characteristic::CurrentHeatingCoolingState,
    Characteristic::TargetHeatingCoolingState,
    Characteristic::CurrentTemperature,
    Characteristic::TargetTemperature,
    Characteristic::TemperatureDisplayUnits,
];

/// Maps a thermostat's status record onto heating/cooling characteristics.
///
/// Nothing is cached: every read resolves the device by MAC and fetches its
/// full status. The device has no mode selection and no unit selection, so
/// writes to those characteristics are accepted and dropped.
pub struct ThermostatAdapter<T: Transport> {
    directory: DeviceDirectory<T>,
    identity: DeviceIdentity,
}

impl<T: Transport> ThermostatAdapter<T> {
    /// Creates an adapter for the thermostat described by `identity`.
    #[must_use]
    pub fn new(directory: DeviceDirectory<T>, identity: DeviceIdentity) -> Self {
        Self {
            directory,
            identity,
        }
    }

    /// Returns the device identity.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Adds the information and the thermostat service to `accessory`.
    pub fn configure(&self, accessory: &mut Accessory) {
        accessory.set_information(AccessoryInformation {
            manufacturer: MANUFACTURER.to_string(),
            model: MODEL.to_string(),
            serial_number: Some(self.identity.mac.to_string()),
        });

        let service =
            accessory.service_or_add(Service::new(ServiceKind::Thermostat, SERVICE_NAME));
        for characteristic in CHARACTERISTICS {
            service.bind(characteristic);
        }
    }

    /// Fetches the full status record.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceUnreachable` if the thermostat does not answer
    /// discovery, or a transport error if the query fails.
    pub async fn status(&self) -> Result<ThermostatStatus> {
        let session = self
            .directory
            .resolve(&DeviceLookup::by_mac(self.identity.mac))
            .await?;
        let status = session.full_status().await?;
        tracing::trace!(
            mac = %self.identity.mac,
            room = status.room_temp,
            target = status.thermostat_temp,
            auto = status.is_auto(),
            "Thermostat status"
        );
        Ok(status)
    }

    /// Derives the direction the thermostat is working in.
    ///
    /// # Errors
    ///
    /// See [`status`](Self::status).
    pub async fn current_heating_cooling_state(&self) -> Result<CurrentHeatingCoolingState> {
        Ok(self.status().await?.current_mode())
    }

    /// Derives the mode the thermostat is set to.
    ///
    /// # Errors
    ///
    /// See [`status`](Self::status).
    pub async fn target_heating_cooling_state(&self) -> Result<TargetHeatingCoolingState> {
        Ok(self.status().await?.target_mode())
    }

    /// Accepts a mode change without contacting the device.
    ///
    /// # Errors
    ///
    /// This never fails; the signature matches the other setters.
    #[allow(clippy::unused_async)]
    pub async fn set_target_heating_cooling_state(
        &self,
        state: TargetHeatingCoolingState,
    ) -> Result<()> {
        tracing::debug!(
            mac = %self.identity.mac,
            state = state.code(),
            "Ignoring TargetHeatingCoolingState write"
        );
        Ok(())
    }

    /// Reads the room temperature in Celsius.
    ///
    /// # Errors
    ///
    /// See [`status`](Self::status).
    pub async fn current_temperature(&self) -> Result<f64> {
        Ok(self.status().await?.room_temp)
    }

    /// Reads the setpoint in Celsius.
    ///
    /// # Errors
    ///
    /// See [`status`](Self::status).
    pub async fn target_temperature(&self) -> Result<f64> {
        Ok(self.status().await?.thermostat_temp)
    }

    /// Writes the setpoint in Celsius. The status is not read back.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidTemperature` for a non-finite value,
    /// `Error::DeviceUnreachable` if the thermostat does not answer
    /// discovery, or a transport error if the write fails.
    pub async fn set_target_temperature(&self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(ValueError::InvalidTemperature(value).into());
        }

        let session = self
            .directory
            .resolve(&DeviceLookup::by_mac(self.identity.mac))
            .await?;
        tracing::debug!(mac = %self.identity.mac, value, "Set Characteristic TargetTemperature");
        session.set_temp(value).await?;
        Ok(())
    }

    /// Returns the display units; the device only works in Celsius.
    #[must_use]
    pub fn temperature_display_units(&self) -> TemperatureDisplayUnits {
        TemperatureDisplayUnits::Celsius
    }

    /// Accepts a display unit change without contacting the device.
    pub fn set_temperature_display_units(&self, units: TemperatureDisplayUnits) {
        tracing::debug!(
            mac = %self.identity.mac,
            units = units.code(),
            "Ignoring TemperatureDisplayUnits write"
        );
    }
}

impl<T: Transport> std::fmt::Debug for ThermostatAdapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThermostatAdapter")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::host::AccessoryContext;
    use crate::transport::{MemoryTransport, RawDevice, RecordedWrite};
    use crate::types::MacAddr;

    const MAC: MacAddr = MacAddr::new([0x24, 0xdf, 0xa7, 0x10, 0x20, 0x30]);

    fn adapter(status: ThermostatStatus) -> (MemoryTransport, ThermostatAdapter<MemoryTransport>) {
        let raw = RawDevice::new(
            crate::THERMOSTAT_TYPE,
            "192.168.1.30:80".parse().unwrap(),
            MAC,
            "Living room",
        );
        let network = MemoryTransport::new();
        network.add_thermostat(raw.clone(), status);
        let adapter = ThermostatAdapter::new(
            DeviceDirectory::new(network.clone()),
            DeviceIdentity::for_thermostat(&raw),
        );
        (network, adapter)
    }

    #[test]
    fn configure_binds_every_characteristic_once() {
        let (_, adapter) = adapter(ThermostatStatus::new(20.0, 21.0, false));
        let identity = adapter.identity().clone();
        let mut accessory = Accessory::new(
            "#Thermostat Beok",
            identity.accessory_uuid(),
            AccessoryContext::Thermostat { identity },
        );
        adapter.configure(&mut accessory);
        adapter.configure(&mut accessory);

        assert_eq!(accessory.services().len(), 1);
        let service = accessory.service(SERVICE_NAME).unwrap();
        assert_eq!(service.characteristics(), &CHARACTERISTICS);
        assert_eq!(accessory.information().manufacturer, "Beok");
        assert_eq!(
            accessory.information().serial_number.as_deref(),
            Some("24:df:a7:10:20:30")
        );
    }

    #[tokio::test]
    async fn warm_room_reports_cooling() {
        let (_, adapter) = adapter(ThermostatStatus::new(22.0, 20.0, false));
        assert_eq!(
            adapter.current_heating_cooling_state().await.unwrap(),
            CurrentHeatingCoolingState::Cool
        );
        assert_eq!(
            adapter.target_heating_cooling_state().await.unwrap(),
            TargetHeatingCoolingState::Cool
        );
    }

    #[tokio::test]
    async fn cold_room_reports_heating() {
        let (_, adapter) = adapter(ThermostatStatus::new(18.0, 20.0, false));
        assert_eq!(
            adapter.current_heating_cooling_state().await.unwrap(),
            CurrentHeatingCoolingState::Heat
        );
    }

    #[tokio::test]
    async fn auto_mode_reports_auto_target() {
        let (_, adapter) = adapter(ThermostatStatus::new(25.0, 20.0, true));
        assert_eq!(
            adapter.target_heating_cooling_state().await.unwrap(),
            TargetHeatingCoolingState::Auto
        );
    }

    #[tokio::test]
    async fn temperatures_are_read_fresh() {
        let (network, adapter) = adapter(ThermostatStatus::new(19.5, 21.0, false));
        assert!((adapter.current_temperature().await.unwrap() - 19.5).abs() < f64::EPSILON);

        network.set_thermostat_status(MAC, ThermostatStatus::new(20.5, 21.0, false));
        assert!((adapter.current_temperature().await.unwrap() - 20.5).abs() < f64::EPSILON);
        assert_eq!(network.discover_count(), 2);
    }

    #[tokio::test]
    async fn set_target_temperature_writes_through() {
        let (network, adapter) = adapter(ThermostatStatus::new(19.0, 21.0, false));
        adapter.set_target_temperature(23.5).await.unwrap();

        assert_eq!(
            network.writes(),
            vec![RecordedWrite::Temperature {
                mac: MAC,
                value: 23.5
            }]
        );
        assert!((adapter.target_temperature().await.unwrap() - 23.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn non_finite_setpoint_is_rejected_before_discovery() {
        let (network, adapter) = adapter(ThermostatStatus::new(19.0, 21.0, false));
        let err = adapter.set_target_temperature(f64::NAN).await.unwrap_err();

        assert!(matches!(err, Error::Value(ValueError::InvalidTemperature(_))));
        assert_eq!(network.discover_count(), 0);
    }

    #[tokio::test]
    async fn mode_and_unit_writes_are_dropped() {
        let (network, adapter) = adapter(ThermostatStatus::new(19.0, 21.0, false));
        adapter
            .set_target_heating_cooling_state(TargetHeatingCoolingState::Cool)
            .await
            .unwrap();
        adapter.set_temperature_display_units(TemperatureDisplayUnits::Fahrenheit);

        assert!(network.writes().is_empty());
        assert_eq!(network.discover_count(), 0);
        assert_eq!(
            adapter.temperature_display_units(),
            TemperatureDisplayUnits::Celsius
        );
    }

    #[tokio::test]
    async fn unreachable_thermostat_propagates() {
        let (network, adapter) = adapter(ThermostatStatus::new(19.0, 21.0, false));
        network.set_reachable(MAC, false);

        assert!(matches!(
            adapter.current_temperature().await,
            Err(Error::DeviceUnreachable { .. })
        ));
    }
}
