//! BLE scanner — turns central events into advertisements and connects.
//!
//! [`BleScanner`] scans with a service filter so only peripherals advertising
//! the robot service are reported. Every discovery or update event becomes
//! one [`Advertisement`]; the same peripheral may therefore be reported many
//! times while it keeps advertising.

use std::collections::HashMap;
use std::pin::Pin;

use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tokio_stream::{Stream, StreamExt as _};

use ddd_app::ports::{Advertisement, RobotScanner};
use ddd_domain::error::{DddError, NotFoundError};

use crate::config::BleConfig;
use crate::error::BleError;
use crate::gatt::{self, BleRobotLink};

type EventStream = Pin<Box<dyn Stream<Item = CentralEvent> + Send>>;

/// Scanner bound to the host's first BLE adapter.
pub struct BleScanner {
    config: BleConfig,
    central: Adapter,
    events: Option<EventStream>,
    /// Peripherals seen so far, keyed by [`Advertisement::id`].
    seen: HashMap<String, Peripheral>,
}

impl BleScanner {
    /// Bind to the first BLE adapter on the host.
    ///
    /// # Errors
    ///
    /// Returns [`BleError::NotAvailable`] when the host has no BLE adapter,
    /// or [`BleError::Scan`] when the platform manager cannot be created.
    pub async fn new(config: BleConfig) -> Result<Self, BleError> {
        let manager = Manager::new().await?;
        let adapters = manager.adapters().await?;
        let central = adapters.into_iter().next().ok_or(BleError::NotAvailable)?;

        if let Ok(info) = central.adapter_info().await {
            tracing::debug!(adapter = %info, "using BLE adapter");
        }

        Ok(Self {
            config,
            central,
            events: None,
            seen: HashMap::new(),
        })
    }

    async fn start_scan(&mut self) -> Result<(), BleError> {
        let events = self.central.events().await?;
        self.events = Some(events);

        self.central
            .start_scan(ScanFilter {
                services: vec![self.config.service_uuid],
            })
            .await?;

        tracing::debug!(service = %self.config.service_uuid, "BLE scan started");
        Ok(())
    }

    async fn next_event(&mut self) -> Option<Advertisement> {
        let events = self.events.as_mut()?;

        while let Some(event) = events.next().await {
            let (CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id)) = event
            else {
                continue;
            };

            let Ok(peripheral) = self.central.peripheral(&id).await else {
                continue;
            };
            let Ok(Some(props)) = peripheral.properties().await else {
                continue;
            };

            let key = id.to_string();
            tracing::trace!(id = %key, name = ?props.local_name, rssi = ?props.rssi, "advertisement");
            self.seen.insert(key.clone(), peripheral);

            return Some(Advertisement {
                id: key,
                local_name: props.local_name,
            });
        }

        None
    }
}

impl RobotScanner for BleScanner {
    type Link = BleRobotLink;

    async fn start(&mut self) -> Result<(), DddError> {
        self.start_scan().await?;
        Ok(())
    }

    async fn next_advertisement(&mut self) -> Result<Option<Advertisement>, DddError> {
        Ok(self.next_event().await)
    }

    async fn stop(&mut self) -> Result<(), DddError> {
        self.events = None;
        self.central.stop_scan().await.map_err(BleError::Scan)?;
        tracing::debug!("BLE scan stopped");
        Ok(())
    }

    async fn connect(&mut self, advertisement: &Advertisement) -> Result<BleRobotLink, DddError> {
        let peripheral = self
            .seen
            .get(&advertisement.id)
            .cloned()
            .ok_or_else(|| NotFoundError {
                entity: "Peripheral",
                id: advertisement.id.clone(),
            })?;

        let link = gatt::connect_robot(peripheral, &self.config).await?;
        Ok(link)
    }
}
