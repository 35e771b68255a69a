// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the bridge.
//!
//! Each type enforces its valid range at construction time.
//!
//! # Types
//!
//! - [`ChannelKey`] - A relay channel of an LC1 switch (`pwr1`..`pwr3`)
//! - [`Gangs`] - Number of relays on a switch (1-3)
//! - [`MacAddr`] - Hardware address of a device

mod channel;
mod mac;

pub use channel::{ChannelKey, Gangs};
pub use mac::MacAddr;
