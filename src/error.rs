// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the bridge.
//!
//! Failures fall into three families: the device could not be found on the
//! network, the device refused the authentication handshake, or the
//! transport failed after a session was established. The remaining variants
//! cover host-side routing mistakes and value validation.

use thiserror::Error;
use uuid::Uuid;

use crate::types::{ChannelKey, Gangs};

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A fresh discovery sweep found no device matching the lookup.
    #[error("device unreachable: no device matching {lookup} answered discovery")]
    DeviceUnreachable {
        /// Human-readable description of what was looked for.
        lookup: String,
    },

    /// The device rejected the authentication handshake.
    #[error("authentication with {device} failed: {reason}")]
    AuthFailed {
        /// Address or name of the device.
        device: String,
        /// Reason reported by the transport.
        reason: String,
    },

    /// Read or write failed after a successful handshake.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The platform configuration is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// No adapter is bound to the accessory.
    #[error("accessory {0} not found")]
    AccessoryNotFound(Uuid),

    /// The accessory has no service with this name.
    #[error("accessory {accessory} has no service named {service:?}")]
    ServiceNotFound {
        /// The accessory UUID.
        accessory: Uuid,
        /// The requested service name.
        service: String,
    },

    /// The service does not expose the requested characteristic.
    #[error("service {service:?} does not support {characteristic}")]
    CharacteristicNotSupported {
        /// The service name.
        service: String,
        /// The requested characteristic.
        characteristic: String,
    },

    /// A per-device task panicked or was cancelled.
    #[error("sub-device task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The channel lies beyond the device's gang count.
    #[error("channel {channel} is not available on a {gangs}-gang switch")]
    ChannelNotAvailable {
        /// The requested channel.
        channel: ChannelKey,
        /// Number of gangs on the device.
        gangs: Gangs,
    },
}

/// Errors raised by the device transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The discovery broadcast could not be sent or received.
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// The authentication handshake was rejected.
    #[error("handshake rejected: {0}")]
    HandshakeRejected(String),

    /// A request to the device failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The device answered with something that could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The device does not implement the requested operation.
    #[error("operation not supported by device: {0}")]
    Unsupported(&'static str),

    /// JSON payload could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u8,
        /// Maximum allowed value.
        max: u8,
        /// The actual value that was provided.
        actual: u8,
    },

    /// A channel key string is not one of `pwr1`, `pwr2` or `pwr3`.
    #[error("invalid channel key: {0}")]
    InvalidChannel(String),

    /// A MAC address string could not be parsed.
    #[error("invalid MAC address: {0}")]
    InvalidMac(String),

    /// A temperature is not a finite number.
    #[error("invalid temperature: {0}")]
    InvalidTemperature(f64),

    /// A characteristic received a value of the wrong shape.
    #[error("{characteristic} cannot accept {value}")]
    InvalidCharacteristicValue {
        /// The characteristic being written.
        characteristic: String,
        /// The rejected value.
        value: String,
    },
}

/// Errors related to the platform configuration block.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("invalid platform config: {0}")]
    Json(#[from] serde_json::Error),

    /// The config block belongs to another platform.
    #[error("config is for platform {found:?}, expected {expected:?}")]
    WrongPlatform {
        /// The platform this crate registers.
        expected: &'static str,
        /// The platform named in the config.
        found: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
