// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Restore-or-create synchronization of discovered devices.

use std::collections::HashMap;
use std::fmt;
use std::slice;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::adapter::AccessoryHandler;
use crate::config::{PLATFORM_NAME, PLUGIN_NAME, PlatformConfig};
use crate::discovery::{DeviceClass, DeviceDirectory, DeviceIdentity};
use crate::error::{Error, Result, TransportError};
use crate::event::{EventBus, PlatformEvent};
use crate::host::{Accessory, AccessoryContext, Characteristic, CharacteristicValue, PlatformHost};
use crate::state::SwitchState;
use crate::transport::{RawDevice, Session, Transport};
use crate::types::Gangs;

use super::{SyncFailure, SyncReport};

/// Display name given to new thermostat accessories.
pub const THERMOSTAT_DISPLAY_NAME: &str = "#Thermostat Beok";

/// Dynamic platform bridging Broadlink devices to host accessories.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use broadlink_bridge::host::MemoryHost;
/// use broadlink_bridge::transport::MemoryTransport;
/// use broadlink_bridge::{Platform, PlatformConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> broadlink_bridge::Result<()> {
/// let host = Arc::new(MemoryHost::new());
/// let platform = Platform::new(PlatformConfig::new(), MemoryTransport::new(), host)?;
///
/// let report = platform.did_finish_launching().await?;
/// assert_eq!(report.accessory_count(), 0);
/// # Ok(())
/// # }
/// ```
pub struct Platform<T: Transport, H: PlatformHost> {
    config: PlatformConfig,
    directory: DeviceDirectory<T>,
    host: Arc<H>,
    accessories: RwLock<Vec<Accessory>>,
    handlers: RwLock<HashMap<Uuid, Arc<AccessoryHandler<T>>>>,
    events: EventBus,
}

impl<T: Transport, H: PlatformHost> Platform<T, H> {
    /// Creates a platform over a transport and a host.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration names another platform.
    pub fn new(config: PlatformConfig, transport: T, host: Arc<H>) -> Result<Self> {
        config.validate()?;
        tracing::debug!(name = config.display_name(), "Finished initializing platform");

        Ok(Self {
            config,
            directory: DeviceDirectory::new(transport),
            host,
            accessories: RwLock::new(Vec::new()),
            handlers: RwLock::new(HashMap::new()),
            events: EventBus::new(),
        })
    }

    /// Returns the platform configuration.
    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Returns the device directory.
    #[must_use]
    pub fn directory(&self) -> &DeviceDirectory<T> {
        &self.directory
    }

    /// Subscribes to platform events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.events.subscribe()
    }

    /// Receives an accessory restored from the host cache.
    ///
    /// No adapter is bound until a discovery pass finds the device again.
    pub fn configure_accessory(&self, accessory: Accessory) {
        tracing::info!(name = accessory.display_name(), "Loading accessory from cache");

        let mut accessories = self.accessories.write();
        match accessories.iter_mut().find(|a| a.uuid() == accessory.uuid()) {
            Some(slot) => *slot = accessory,
            None => accessories.push(accessory),
        }
    }

    /// Returns all known accessories, cached or registered.
    #[must_use]
    pub fn accessories(&self) -> Vec<Accessory> {
        self.accessories.read().clone()
    }

    /// Returns one accessory by UUID.
    #[must_use]
    pub fn accessory(&self, uuid: Uuid) -> Option<Accessory> {
        self.accessories
            .read()
            .iter()
            .find(|a| a.uuid() == uuid)
            .cloned()
    }

    /// Returns `true` if an adapter is bound to the accessory.
    #[must_use]
    pub fn is_bound(&self, uuid: Uuid) -> bool {
        self.handlers.read().contains_key(&uuid)
    }

    /// Handles the host's launch-complete signal by running one discovery pass.
    ///
    /// # Errors
    ///
    /// See [`discover_devices`](Self::discover_devices).
    pub async fn did_finish_launching(&self) -> Result<SyncReport> {
        tracing::debug!("Executed didFinishLaunching callback");
        self.discover_devices().await
    }

    /// Discovers devices once and restores or registers an accessory for each.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` only if the discovery sweep itself fails.
    /// Failures of individual devices are collected in the report.
    pub async fn discover_devices(&self) -> Result<SyncReport> {
        let devices = self.directory.discover().await?;
        let mut report = SyncReport::default();

        for device in &devices {
            tracing::info!(
                device_type = device.device_type,
                host = %device.host,
                "Finding device"
            );
            match DeviceClass::of(device) {
                DeviceClass::SwitchHub => self.sync_hub(device, &mut report).await,
                DeviceClass::Thermostat => self.sync_thermostat(device, &mut report).await,
                DeviceClass::Unknown => {
                    tracing::debug!(
                        device_type = device.device_type,
                        host = %device.host,
                        "Ignoring unsupported device"
                    );
                    self.events
                        .publish(PlatformEvent::device_ignored(device.device_type, device.host));
                    report.ignored.push(device.clone());
                }
            }
        }

        tracing::info!(
            registered = report.registered.len(),
            restored = report.restored.len(),
            ignored = report.ignored.len(),
            failures = report.failures.len(),
            "Discovery pass completed"
        );
        Ok(report)
    }

    /// Reads a characteristic on behalf of the host.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessoryNotFound` if no adapter is bound,
    /// `Error::ServiceNotFound` or `Error::CharacteristicNotSupported` if the
    /// accessory does not expose the pair, or any device error.
    pub async fn get_characteristic(
        &self,
        uuid: Uuid,
        service: &str,
        characteristic: Characteristic,
    ) -> Result<CharacteristicValue> {
        let handler = self.bound_handler(uuid, service, characteristic)?;
        handler
            .get(service, characteristic)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    %uuid,
                    service,
                    %characteristic,
                    error = %e,
                    "Characteristic read failed"
                );
            })
    }

    /// Writes a characteristic on behalf of the host.
    ///
    /// # Errors
    ///
    /// Same as [`get_characteristic`](Self::get_characteristic), plus
    /// `Error::Value` if the value has the wrong shape.
    pub async fn set_characteristic(
        &self,
        uuid: Uuid,
        service: &str,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<()> {
        let handler = self.bound_handler(uuid, service, characteristic)?;
        handler
            .set(service, characteristic, value)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    %uuid,
                    service,
                    %characteristic,
                    error = %e,
                    "Characteristic write failed"
                );
            })
    }

    fn bound_handler(
        &self,
        uuid: Uuid,
        service: &str,
        characteristic: Characteristic,
    ) -> Result<Arc<AccessoryHandler<T>>> {
        let handler = self
            .handlers
            .read()
            .get(&uuid)
            .cloned()
            .ok_or(Error::AccessoryNotFound(uuid))?;

        let accessories = self.accessories.read();
        let bound = accessories
            .iter()
            .find(|a| a.uuid() == uuid)
            .ok_or(Error::AccessoryNotFound(uuid))?
            .service(service)
            .ok_or_else(|| Error::ServiceNotFound {
                accessory: uuid,
                service: service.to_string(),
            })?
            .supports(characteristic);

        if bound {
            Ok(handler)
        } else {
            Err(Error::CharacteristicNotSupported {
                service: service.to_string(),
                characteristic: characteristic.to_string(),
            })
        }
    }

    async fn sync_hub(&self, hub: &RawDevice, report: &mut SyncReport) {
        let label = format!("hub {}", hub.host);

        let session = match self.directory.authenticate(hub).await {
            Ok(session) => Arc::new(session),
            Err(e) => {
                self.record_failure(report, label, e);
                return;
            }
        };
        let sub_devices = match session.sub_devices().await {
            Ok(sub_devices) => sub_devices,
            Err(e) => {
                self.record_failure(report, label, e.into());
                return;
            }
        };
        tracing::debug!(hub = %hub.host, count = sub_devices.len(), "Listing sub-devices");

        let mut tasks = JoinSet::new();
        for (index, sub) in sub_devices.into_iter().enumerate() {
            let session = Arc::clone(&session);
            tasks.spawn(async move {
                let status = session.get_state(&sub.did).await;
                (index, sub, status)
            });
        }

        let mut reads = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(read) => reads.push(read),
                Err(e) => self.record_failure(report, label.clone(), e.into()),
            }
        }
        // Completion order is arbitrary; register in hub order.
        reads.sort_by_key(|(index, _, _)| *index);

        for (index, sub, status) in reads {
            match switch_gangs(status) {
                Ok((gangs, status)) => {
                    let identity = DeviceIdentity::for_sub_device(hub, &sub);
                    let uuid = identity.accessory_uuid();
                    let name = format!("#{index} LC1 {gangs} Gang Switch");
                    let context = AccessoryContext::Switch {
                        identity,
                        gangs,
                        status,
                    };
                    self.restore_or_register(uuid, name, context, report);
                }
                Err(e) => {
                    let label = format!("sub-device {} on {}", sub.did, hub.host);
                    self.record_failure(report, label, e);
                }
            }
        }
    }

    async fn sync_thermostat(&self, device: &RawDevice, report: &mut SyncReport) {
        if let Err(e) = self.directory.authenticate(device).await {
            self.record_failure(report, format!("thermostat {}", device.mac), e);
            return;
        }

        let identity = DeviceIdentity::for_thermostat(device);
        let uuid = identity.accessory_uuid();
        let context = AccessoryContext::Thermostat { identity };
        self.restore_or_register(uuid, THERMOSTAT_DISPLAY_NAME.to_string(), context, report);
    }

    fn restore_or_register(
        &self,
        uuid: Uuid,
        display_name: String,
        context: AccessoryContext,
        report: &mut SyncReport,
    ) {
        let mut accessories = self.accessories.write();

        if let Some(existing) = accessories.iter_mut().find(|a| a.uuid() == uuid) {
            tracing::info!(
                name = existing.display_name(),
                %uuid,
                "Restoring existing accessory from cache"
            );
            existing.context_mut().refresh(&context);
            let handler = AccessoryHandler::attach(&self.directory, existing);
            let restored = existing.clone();
            drop(accessories);

            self.handlers.write().insert(uuid, Arc::new(handler));
            self.host.update_accessories(slice::from_ref(&restored));
            self.events
                .publish(PlatformEvent::accessory_restored(uuid, restored.display_name()));
            report.restored.push(uuid);
            return;
        }

        tracing::info!(name = %context.identity().name, %uuid, "Adding new accessory");
        let mut accessory = Accessory::new(display_name, uuid, context);
        let handler = AccessoryHandler::attach(&self.directory, &mut accessory);
        accessories.push(accessory.clone());
        drop(accessories);

        self.handlers.write().insert(uuid, Arc::new(handler));
        self.host
            .register_accessories(PLUGIN_NAME, PLATFORM_NAME, slice::from_ref(&accessory));
        self.events
            .publish(PlatformEvent::accessory_registered(uuid, accessory.display_name()));
        report.registered.push(uuid);
    }

    fn record_failure(&self, report: &mut SyncReport, device: String, error: Error) {
        tracing::warn!(device = %device, error = %error, "Failed to synchronize device");
        self.events.publish(PlatformEvent::sync_failed(device.clone(), &error));
        report.failures.push(SyncFailure { device, error });
    }
}

fn switch_gangs(
    status: std::result::Result<SwitchState, TransportError>,
) -> Result<(Gangs, SwitchState)> {
    let status = status?;
    Ok((status.gangs()?, status))
}

impl<T: Transport, H: PlatformHost> fmt::Debug for Platform<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("config", &self.config)
            .field("accessories", &self.accessories.read().len())
            .field("bound", &self.handlers.read().len())
            .finish_non_exhaustive()
    }
}
