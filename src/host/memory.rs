// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory host with a JSON accessory cache.

use parking_lot::Mutex;
use uuid::Uuid;

use super::{Accessory, PlatformHost};

/// Host that keeps its accessory cache in memory.
///
/// The cache can be dumped to JSON and loaded back, which is how a process
/// restart is simulated: the reloaded accessories are handed to
/// [`Platform::configure_accessory`](crate::Platform::configure_accessory)
/// before discovery runs.
#[derive(Debug, Default)]
pub struct MemoryHost {
    cache: Mutex<Vec<Accessory>>,
    registrations: Mutex<Vec<Uuid>>,
}

impl MemoryHost {
    /// Creates a host with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a host from a cache previously written by [`to_json`](Self::to_json).
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a list of accessories.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let cache: Vec<Accessory> = serde_json::from_str(json)?;
        Ok(Self {
            cache: Mutex::new(cache),
            registrations: Mutex::new(Vec::new()),
        })
    }

    /// Serializes the accessory cache.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&*self.cache.lock())
    }

    /// Returns the cached accessories.
    #[must_use]
    pub fn cached_accessories(&self) -> Vec<Accessory> {
        self.cache.lock().clone()
    }

    /// Returns the UUIDs passed to `register_accessories`, one entry per registration.
    #[must_use]
    pub fn registrations(&self) -> Vec<Uuid> {
        self.registrations.lock().clone()
    }

    fn upsert(&self, accessory: &Accessory) {
        let mut cache = self.cache.lock();
        match cache.iter_mut().find(|a| a.uuid() == accessory.uuid()) {
            Some(slot) => *slot = accessory.clone(),
            None => cache.push(accessory.clone()),
        }
    }
}

impl PlatformHost for MemoryHost {
    fn register_accessories(&self, plugin: &str, platform: &str, accessories: &[Accessory]) {
        for accessory in accessories {
            tracing::debug!(
                plugin,
                platform,
                uuid = %accessory.uuid(),
                "Registering accessory"
            );
            self.registrations.lock().push(accessory.uuid());
            self.upsert(accessory);
        }
    }

    fn update_accessories(&self, accessories: &[Accessory]) {
        for accessory in accessories {
            self.upsert(accessory);
        }
    }
}
