// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state records.
//!
//! [`SwitchState`] is the composite relay state of an LC1 switch and
//! [`ThermostatStatus`] the status record of a Beok thermostat. Both are read
//! fresh from the device on every characteristic request.
//!
//! # Examples
//!
//! ```
//! use broadlink_bridge::state::SwitchState;
//! use broadlink_bridge::types::ChannelKey;
//!
//! let mut state = SwitchState::new();
//! state.set(ChannelKey::Pwr1, true);
//!
//! assert_eq!(state.get(ChannelKey::Pwr1), Some(true));
//! ```

mod switch_state;
mod thermostat_status;

pub use switch_state::SwitchState;
pub use thermostat_status::ThermostatStatus;
