// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dynamic platform synchronizing discovered devices with host accessories.
//!
//! The host first hands every cached accessory to
//! [`Platform::configure_accessory`]. When it signals that launching has
//! finished, [`Platform::did_finish_launching`] runs one discovery pass:
//!
//! - switch hubs are authenticated and their paired switches read
//!   concurrently, one task per switch
//! - thermostats are authenticated and keyed by MAC
//! - each device is matched to a cached accessory by UUID and restored, or a
//!   new accessory is created and registered
//!
//! Devices that appear later are only picked up by another pass.

mod report;
mod synchronizer;

pub use report::{SyncFailure, SyncReport};
pub use synchronizer::{Platform, THERMOSTAT_DISPLAY_NAME};
