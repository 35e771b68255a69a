// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outcome of a discovery pass.

use uuid::Uuid;

use crate::error::Error;
use crate::transport::RawDevice;

/// A device that could not be synchronized.
#[derive(Debug)]
pub struct SyncFailure {
    /// Description of the device (hub, sub-device or thermostat).
    pub device: String,
    /// What went wrong.
    pub error: Error,
}

/// What one discovery pass did.
///
/// Failures of one hub or sub-device do not stop the pass; they are
/// collected here instead.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Accessories created and registered with the host.
    pub registered: Vec<Uuid>,
    /// Accessories matched to an entry of the host cache.
    pub restored: Vec<Uuid>,
    /// Devices with an unsupported type code.
    pub ignored: Vec<RawDevice>,
    /// Devices that failed to synchronize.
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// Returns the number of accessories bound during the pass.
    #[must_use]
    pub fn accessory_count(&self) -> usize {
        self.registered.len() + self.restored.len()
    }

    /// Returns `true` if no device failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_clean() {
        let report = SyncReport::default();
        assert!(report.is_clean());
        assert_eq!(report.accessory_count(), 0);
    }

    #[test]
    fn counts_registered_and_restored() {
        let report = SyncReport {
            registered: vec![Uuid::from_u128(1)],
            restored: vec![Uuid::from_u128(2), Uuid::from_u128(3)],
            failures: vec![SyncFailure {
                device: "hub 10.0.0.2:80".to_string(),
                error: Error::AccessoryNotFound(Uuid::nil()),
            }],
            ..SyncReport::default()
        };
        assert_eq!(report.accessory_count(), 3);
        assert!(!report.is_clean());
    }
}
