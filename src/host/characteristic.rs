// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristics exposed to the host and their values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// A characteristic the bridge binds handlers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    /// Relay on/off state of a switch service.
    On,
    /// Direction the thermostat is currently working in (read-only).
    CurrentHeatingCoolingState,
    /// Mode the thermostat is asked to work in.
    TargetHeatingCoolingState,
    /// Ambient temperature in Celsius (read-only).
    CurrentTemperature,
    /// Setpoint in Celsius.
    TargetTemperature,
    /// Units the host should display temperatures in.
    TemperatureDisplayUnits,
}

impl Characteristic {
    /// Returns the characteristic name as the host spells it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::CurrentHeatingCoolingState => "CurrentHeatingCoolingState",
            Self::TargetHeatingCoolingState => "TargetHeatingCoolingState",
            Self::CurrentTemperature => "CurrentTemperature",
            Self::TargetTemperature => "TargetTemperature",
            Self::TemperatureDisplayUnits => "TemperatureDisplayUnits",
        }
    }

    /// Returns `true` if the host may write this characteristic.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !matches!(
            self,
            Self::CurrentHeatingCoolingState | Self::CurrentTemperature
        )
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value read from or written to a characteristic.
///
/// # Examples
///
/// ```
/// use broadlink_bridge::host::{CharacteristicValue, TargetHeatingCoolingState};
///
/// let value = CharacteristicValue::from(TargetHeatingCoolingState::Auto);
/// assert_eq!(value, CharacteristicValue::Int(3));
/// assert_eq!(CharacteristicValue::Float(21.5).as_f64(), Some(21.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    /// Boolean value (`On`).
    Bool(bool),
    /// Enumerated value (heating/cooling states, display units).
    Int(u8),
    /// Numeric value (temperatures).
    Float(f64),
}

impl CharacteristicValue {
    /// Interprets the value as a boolean; `0`/`1` are accepted.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(value) => Some(value),
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Interprets the value as a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float(value) => Some(value),
            Self::Int(value) => Some(f64::from(value)),
            Self::Bool(_) => None,
        }
    }

    /// Interprets the value as an enumerated code.
    #[must_use]
    pub fn as_u8(&self) -> Option<u8> {
        match *self {
            Self::Int(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Returns the numeric code used by the host.
            #[must_use]
            pub const fn code(&self) -> u8 {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = ValueError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(ValueError::InvalidCharacteristicValue {
                        characteristic: stringify!($name).to_string(),
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl From<$name> for CharacteristicValue {
            fn from(value: $name) -> Self {
                Self::Int(value.code())
            }
        }
    };
}

coded_enum! {
    /// Direction a thermostat is currently working in.
    CurrentHeatingCoolingState {
        /// Idle.
        Off = 0,
        /// Adding heat.
        Heat = 1,
        /// Removing heat.
        Cool = 2,
    }
}

coded_enum! {
    /// Mode a thermostat is asked to work in.
    TargetHeatingCoolingState {
        /// Off.
        Off = 0,
        /// Heat to the setpoint.
        Heat = 1,
        /// Cool to the setpoint.
        Cool = 2,
        /// Device-managed schedule.
        Auto = 3,
    }
}

coded_enum! {
    /// Units the host displays temperatures in.
    TemperatureDisplayUnits {
        /// Degrees Celsius.
        Celsius = 0,
        /// Degrees Fahrenheit.
        Fahrenheit = 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_host_constants() {
        assert_eq!(CurrentHeatingCoolingState::Off.code(), 0);
        assert_eq!(CurrentHeatingCoolingState::Heat.code(), 1);
        assert_eq!(CurrentHeatingCoolingState::Cool.code(), 2);
        assert_eq!(TargetHeatingCoolingState::Auto.code(), 3);
        assert_eq!(TemperatureDisplayUnits::Celsius.code(), 0);
    }

    #[test]
    fn try_from_rejects_unknown_code() {
        assert_eq!(
            TargetHeatingCoolingState::try_from(2).unwrap(),
            TargetHeatingCoolingState::Cool
        );
        assert!(TargetHeatingCoolingState::try_from(4).is_err());
        assert!(TemperatureDisplayUnits::try_from(2).is_err());
    }

    #[test]
    fn value_conversions() {
        assert_eq!(CharacteristicValue::Int(1).as_bool(), Some(true));
        assert_eq!(CharacteristicValue::Int(2).as_bool(), None);
        assert_eq!(CharacteristicValue::Bool(true).as_f64(), None);
        assert_eq!(CharacteristicValue::Int(20).as_f64(), Some(20.0));
        assert_eq!(CharacteristicValue::Float(3.0).as_u8(), None);
    }

    #[test]
    fn value_deserializes_untagged() {
        let values: Vec<CharacteristicValue> = serde_json::from_str("[true, 3, 21.5]").unwrap();
        assert_eq!(
            values,
            vec![
                CharacteristicValue::Bool(true),
                CharacteristicValue::Int(3),
                CharacteristicValue::Float(21.5),
            ]
        );
    }

    #[test]
    fn read_only_characteristics() {
        assert!(!Characteristic::CurrentTemperature.is_writable());
        assert!(!Characteristic::CurrentHeatingCoolingState.is_writable());
        assert!(Characteristic::On.is_writable());
        assert!(Characteristic::TargetTemperature.is_writable());
    }
}
