// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadlink Bridge - expose Broadlink devices as home-automation accessories.
//!
//! This library discovers Broadlink devices on the local network and maps
//! them onto accessories of a home-automation host (a Homebridge-style
//! dynamic platform).
//!
//! # Supported Devices
//!
//! - **LC1 wall switches** (1 to 3 gangs) paired with an S3 hub: each relay
//!   channel becomes its own switch service
//! - **Beok (Hysen) thermostats**: room temperature, setpoint and a derived
//!   heating/cooling state
//!
//! # Design
//!
//! Broadlink devices are found by a UDP broadcast and may change address
//! between sweeps, so no connection is kept: every characteristic read or
//! write re-discovers the device and authenticates a fresh session. The
//! identity stored with an accessory keys its UUID on the device's stable id,
//! never on its address, so restarts and DHCP renewals map back to the same
//! accessory.
//!
//! The network and the host sit behind the [`transport::Transport`] and
//! [`host::PlatformHost`] traits. [`transport::MemoryTransport`] and
//! [`host::MemoryHost`] implement them in-process.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use broadlink_bridge::host::{Characteristic, MemoryHost};
//! use broadlink_bridge::transport::MemoryTransport;
//! use broadlink_bridge::{Platform, PlatformConfig};
//!
//! #[tokio::main]
//! async fn main() -> broadlink_bridge::Result<()> {
//!     let config = PlatformConfig::from_json(r#"{"platform": "BroadlinkPlatform"}"#)?;
//!     let host = Arc::new(MemoryHost::new());
//!     let platform = Platform::new(config, MemoryTransport::new(), Arc::clone(&host))?;
//!
//!     // Hand cached accessories back before discovery runs.
//!     for accessory in host.cached_accessories() {
//!         platform.configure_accessory(accessory);
//!     }
//!
//!     let report = platform.did_finish_launching().await?;
//!     for uuid in report.registered.iter().chain(&report.restored) {
//!         platform
//!             .set_characteristic(*uuid, "Switch One", Characteristic::On, true.into())
//!             .await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapter;
mod config;
pub mod discovery;
pub mod error;
pub mod event;
pub mod host;
pub mod platform;
pub mod state;
pub mod transport;
pub mod types;

pub use config::{PLATFORM_NAME, PLUGIN_NAME, PlatformConfig, SWITCH_HUB_TYPE, THERMOSTAT_TYPE};
pub use error::{ConfigError, Error, Result, TransportError, ValueError};
pub use platform::{Platform, SyncFailure, SyncReport};
pub use types::{ChannelKey, Gangs, MacAddr};
