// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for accessory synchronization.
//!
//! The platform publishes a [`PlatformEvent`] for every accessory it
//! registers or restores and for every device it skips or fails to
//! synchronize. The [`EventBus`] uses tokio's broadcast channel so several
//! subscribers can observe the same events.
//!
//! # Examples
//!
//! ```
//! use broadlink_bridge::event::{EventBus, PlatformEvent};
//! use uuid::Uuid;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(PlatformEvent::accessory_registered(Uuid::nil(), "#Thermostat Beok"));
//! ```

mod event_bus;
mod platform_event;

pub use event_bus::EventBus;
pub use platform_event::PlatformEvent;
