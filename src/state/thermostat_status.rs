// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status record of a Beok (Hysen) thermostat.

use serde::{Deserialize, Serialize};

use crate::host::{CurrentHeatingCoolingState, TargetHeatingCoolingState};

/// Status reported by the thermostat's full-status query.
///
/// The device has no field describing its current operating direction, so
/// heating or cooling is inferred by comparing the room temperature with the
/// setpoint: a room warmer than the setpoint reports cooling, anything else
/// (including equality) reports heating.
///
/// # Examples
///
/// ```
/// use broadlink_bridge::host::CurrentHeatingCoolingState;
/// use broadlink_bridge::state::ThermostatStatus;
///
/// let status = ThermostatStatus::new(22.0, 20.0, false);
/// assert_eq!(status.current_mode(), CurrentHeatingCoolingState::Cool);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatStatus {
    /// Ambient temperature measured by the thermostat, in Celsius.
    pub room_temp: f64,
    /// Setpoint, in Celsius.
    pub thermostat_temp: f64,
    /// `1` when the schedule (auto) mode is active, `0` for manual.
    #[serde(default)]
    pub auto_mode: u8,
}

impl ThermostatStatus {
    /// Creates a status record.
    #[must_use]
    pub fn new(room_temp: f64, thermostat_temp: f64, auto_mode: bool) -> Self {
        Self {
            room_temp,
            thermostat_temp,
            auto_mode: u8::from(auto_mode),
        }
    }

    /// Returns `true` if the thermostat runs its own schedule.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.auto_mode == 1
    }

    /// Returns `true` if the room is warmer than the setpoint.
    #[must_use]
    pub fn is_above_setpoint(&self) -> bool {
        self.room_temp > self.thermostat_temp
    }

    /// Derives the current heating/cooling direction.
    #[must_use]
    pub fn current_mode(&self) -> CurrentHeatingCoolingState {
        if self.is_above_setpoint() {
            CurrentHeatingCoolingState::Cool
        } else {
            CurrentHeatingCoolingState::Heat
        }
    }

    /// Derives the target mode: `Auto` when scheduled, else the current direction.
    #[must_use]
    pub fn target_mode(&self) -> TargetHeatingCoolingState {
        if self.is_auto() {
            return TargetHeatingCoolingState::Auto;
        }
        match self.current_mode() {
            CurrentHeatingCoolingState::Cool => TargetHeatingCoolingState::Cool,
            CurrentHeatingCoolingState::Heat => TargetHeatingCoolingState::Heat,
            CurrentHeatingCoolingState::Off => TargetHeatingCoolingState::Off,
        }
    }
}
