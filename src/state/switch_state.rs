// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Composite relay state of an LC1 switch.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValueError;
use crate::types::{ChannelKey, Gangs};

/// Relay state of a multi-gang switch.
///
/// Only channels physically present on the device are populated. The vendor
/// protocol reads and writes the whole record at once, so a write for one
/// channel must carry the other channels unchanged.
///
/// On the wire the flags are named `pwr1`..`pwr3` and may be encoded as
/// booleans or as `0`/`1`.
///
/// # Examples
///
/// ```
/// use broadlink_bridge::state::SwitchState;
/// use broadlink_bridge::types::{ChannelKey, Gangs};
///
/// let state = SwitchState::new()
///     .with(ChannelKey::Pwr1, true)
///     .with(ChannelKey::Pwr2, false);
///
/// assert_eq!(state.get(ChannelKey::Pwr1), Some(true));
/// assert_eq!(state.get(ChannelKey::Pwr3), None);
/// assert_eq!(state.gangs().unwrap(), Gangs::Two);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchState {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flag")]
    pwr1: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flag")]
    pwr2: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flag")]
    pwr3: Option<bool>,
}

impl SwitchState {
    /// Creates an empty state with no channel known.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with the given channel set.
    #[must_use]
    pub fn with(mut self, channel: ChannelKey, value: bool) -> Self {
        self.set(channel, value);
        self
    }

    /// Gets the value of a channel, or `None` if the channel is not reported.
    #[must_use]
    pub fn get(&self, channel: ChannelKey) -> Option<bool> {
        match channel {
            ChannelKey::Pwr1 => self.pwr1,
            ChannelKey::Pwr2 => self.pwr2,
            ChannelKey::Pwr3 => self.pwr3,
        }
    }

    /// Sets the value of a channel.
    pub fn set(&mut self, channel: ChannelKey, value: bool) {
        *self.slot(channel) = Some(value);
    }

    /// Forgets the value of a channel.
    pub fn clear(&mut self, channel: ChannelKey) {
        *self.slot(channel) = None;
    }

    /// Returns the channels present in this state.
    #[must_use]
    pub fn present_channels(&self) -> Vec<ChannelKey> {
        ChannelKey::ALL
            .into_iter()
            .filter(|key| self.get(*key).is_some())
            .collect()
    }

    /// Derives the gang count from the number of channels the device reports.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if no channel is present.
    pub fn gangs(&self) -> Result<Gangs, ValueError> {
        // At most three channels exist, so the count always fits.
        #[allow(clippy::cast_possible_truncation)]
        let count = self.present_channels().len() as u8;
        Gangs::try_from(count)
    }

    /// Returns a copy with every channel beyond `gangs` removed.
    #[must_use]
    pub fn restricted_to(mut self, gangs: Gangs) -> Self {
        for key in ChannelKey::ALL {
            if !gangs.contains(key) {
                self.clear(key);
            }
        }
        self
    }

    fn slot(&mut self, channel: ChannelKey) -> &mut Option<bool> {
        match channel {
            ChannelKey::Pwr1 => &mut self.pwr1,
            ChannelKey::Pwr2 => &mut self.pwr2,
            ChannelKey::Pwr3 => &mut self.pwr3,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Number(u64),
}

fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<Flag>::deserialize(deserializer)?.map(|flag| match flag {
            Flag::Bool(value) => value,
            Flag::Number(value) => value != 0,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty() {
        let state = SwitchState::new();
        assert!(state.present_channels().is_empty());
        assert!(state.gangs().is_err());
    }

    #[test]
    fn set_and_clear() {
        let mut state = SwitchState::new();
        state.set(ChannelKey::Pwr3, true);
        assert_eq!(state.get(ChannelKey::Pwr3), Some(true));
        state.clear(ChannelKey::Pwr3);
        assert_eq!(state.get(ChannelKey::Pwr3), None);
    }

    #[test]
    fn gangs_counts_present_channels() {
        let three = SwitchState::new()
            .with(ChannelKey::Pwr1, false)
            .with(ChannelKey::Pwr2, false)
            .with(ChannelKey::Pwr3, true);
        assert_eq!(three.gangs().unwrap(), Gangs::Three);

        let one = SwitchState::new().with(ChannelKey::Pwr1, true);
        assert_eq!(one.gangs().unwrap(), Gangs::One);
    }

    #[test]
    fn restricted_to_drops_extra_channels() {
        let state = SwitchState::new()
            .with(ChannelKey::Pwr1, true)
            .with(ChannelKey::Pwr2, true)
            .with(ChannelKey::Pwr3, true)
            .restricted_to(Gangs::Two);
        assert_eq!(
            state.present_channels(),
            vec![ChannelKey::Pwr1, ChannelKey::Pwr2]
        );
    }

    #[test]
    fn deserializes_numeric_flags() {
        let state: SwitchState =
            serde_json::from_str(r#"{"pwr1": 1, "pwr2": 0, "pwr3": true}"#).unwrap();
        assert_eq!(state.get(ChannelKey::Pwr1), Some(true));
        assert_eq!(state.get(ChannelKey::Pwr2), Some(false));
        assert_eq!(state.get(ChannelKey::Pwr3), Some(true));
    }

    #[test]
    fn deserializes_missing_and_null_channels_as_absent() {
        let state: SwitchState = serde_json::from_str(r#"{"pwr1": false, "pwr2": null}"#).unwrap();
        assert_eq!(state.present_channels(), vec![ChannelKey::Pwr1]);
    }

    #[test]
    fn serializes_only_present_channels() {
        let state = SwitchState::new()
            .with(ChannelKey::Pwr1, true)
            .with(ChannelKey::Pwr2, false);
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json, serde_json::json!({"pwr1": true, "pwr2": false}));
    }
}
