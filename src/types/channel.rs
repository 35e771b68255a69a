// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay channel addressing for multi-gang LC1 switches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// One relay channel of an LC1 switch.
///
/// The device reports its channels as `pwr1`, `pwr2` and `pwr3`; each one is
/// exposed to the host as its own switch service.
///
/// # Examples
///
/// ```
/// use broadlink_bridge::types::ChannelKey;
///
/// let key: ChannelKey = "pwr2".parse().unwrap();
/// assert_eq!(key, ChannelKey::Pwr2);
/// assert_eq!(key.service_name(), "Switch Two");
/// assert_eq!(key.index(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKey {
    /// First relay.
    Pwr1,
    /// Second relay.
    Pwr2,
    /// Third relay.
    Pwr3,
}

impl ChannelKey {
    /// All channels in device order.
    pub const ALL: [ChannelKey; 3] = [Self::Pwr1, Self::Pwr2, Self::Pwr3];

    /// Returns the wire name of the channel.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pwr1 => "pwr1",
            Self::Pwr2 => "pwr2",
            Self::Pwr3 => "pwr3",
        }
    }

    /// Returns the zero-based position of the channel.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Pwr1 => 0,
            Self::Pwr2 => 1,
            Self::Pwr3 => 2,
        }
    }

    /// Returns the name of the switch service bound to this channel.
    #[must_use]
    pub const fn service_name(&self) -> &'static str {
        match self {
            Self::Pwr1 => "Switch One",
            Self::Pwr2 => "Switch Two",
            Self::Pwr3 => "Switch Three",
        }
    }

    /// Looks up the channel bound to a switch service name.
    #[must_use]
    pub fn from_service_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.service_name() == name)
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKey {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pwr1" => Ok(Self::Pwr1),
            "pwr2" => Ok(Self::Pwr2),
            "pwr3" => Ok(Self::Pwr3),
            _ => Err(ValueError::InvalidChannel(s.to_string())),
        }
    }
}

/// Number of relay channels on a switch (1 to 3).
///
/// # Examples
///
/// ```
/// use broadlink_bridge::types::{ChannelKey, Gangs};
///
/// let gangs = Gangs::try_from(2).unwrap();
/// assert_eq!(gangs.channels(), &[ChannelKey::Pwr1, ChannelKey::Pwr2]);
/// assert!(!gangs.contains(ChannelKey::Pwr3));
/// assert!(Gangs::try_from(4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Gangs {
    /// Single relay.
    One,
    /// Two relays.
    Two,
    /// Three relays.
    Three,
}

impl Gangs {
    /// Maximum number of gangs an LC1 switch has.
    pub const MAX: u8 = 3;

    /// Returns the number of channels.
    #[must_use]
    pub const fn count(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Returns the channels present on the device, in order.
    #[must_use]
    pub fn channels(&self) -> &'static [ChannelKey] {
        &ChannelKey::ALL[..usize::from(self.count())]
    }

    /// Returns `true` if the channel exists on the device.
    #[must_use]
    pub fn contains(&self, channel: ChannelKey) -> bool {
        channel.index() < usize::from(self.count())
    }
}

impl TryFrom<u8> for Gangs {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(ValueError::OutOfRange {
                min: 1,
                max: Self::MAX,
                actual: value,
            }),
        }
    }
}

impl From<Gangs> for u8 {
    fn from(gangs: Gangs) -> Self {
        gangs.count()
    }
}

impl fmt::Display for Gangs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}
