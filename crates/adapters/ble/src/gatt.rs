//! GATT connection helpers for the robot's control characteristic.
//!
//! [`connect_robot`] connects to a peripheral, discovers its services and
//! locates the control characteristic. If the characteristic cannot be found
//! the peripheral is disconnected before the error is returned, so callers
//! never hold a half-open connection.

use std::collections::BTreeSet;
use std::time::Duration;

use btleplug::api::{Characteristic, Peripheral as _, Service, WriteType};
use btleplug::platform::Peripheral;

use ddd_app::ports::RobotLink;
use ddd_domain::error::DddError;
use ddd_domain::robot::PAYLOAD_LEN;

use crate::config::BleConfig;
use crate::error::BleError;

/// Find the control characteristic among discovered services.
///
/// UUIDs are compared by value, so the textual case they were configured
/// with does not matter.
///
/// # Errors
///
/// Returns [`BleError::ServiceNotFound`] if no service with `service_uuid`
/// exists, or [`BleError::CharacteristicNotFound`] if that service lacks
/// `characteristic_uuid`.
pub fn find_characteristic(
    services: &BTreeSet<Service>,
    service_uuid: uuid::Uuid,
    characteristic_uuid: uuid::Uuid,
) -> Result<Characteristic, BleError> {
    let service = services
        .iter()
        .find(|s| s.uuid == service_uuid)
        .ok_or(BleError::ServiceNotFound { uuid: service_uuid })?;

    service
        .characteristics
        .iter()
        .find(|c| c.uuid == characteristic_uuid)
        .cloned()
        .ok_or(BleError::CharacteristicNotFound {
            uuid: characteristic_uuid,
        })
}

/// Connect to the robot and locate its control characteristic.
///
/// # Protocol
///
/// 1. Connect (bounded by the configured timeout, if any)
/// 2. Discover services
/// 3. Look up the control service, then the control characteristic
///
/// # Errors
///
/// Returns [`BleError::GattConnect`] or [`BleError::ConnectTimeout`] if the
/// connection cannot be established, [`BleError::Gatt`] if discovery fails,
/// and [`BleError::ServiceNotFound`] / [`BleError::CharacteristicNotFound`]
/// when the robot does not expose the expected GATT layout.
pub async fn connect_robot(
    peripheral: Peripheral,
    config: &BleConfig,
) -> Result<BleRobotLink, BleError> {
    connect(&peripheral, config.connect_timeout()).await?;

    match discover_control_characteristic(&peripheral, config).await {
        Ok(characteristic) => {
            tracing::debug!(uuid = %characteristic.uuid, "control characteristic found");
            Ok(BleRobotLink {
                peripheral,
                characteristic,
                write_type: if config.write_with_response {
                    WriteType::WithResponse
                } else {
                    WriteType::WithoutResponse
                },
            })
        }
        Err(err) => {
            disconnect_quietly(&peripheral).await;
            Err(err)
        }
    }
}

async fn connect(peripheral: &Peripheral, timeout: Option<Duration>) -> Result<(), BleError> {
    let Some(limit) = timeout else {
        return peripheral.connect().await.map_err(BleError::GattConnect);
    };

    if let Ok(result) = tokio::time::timeout(limit, peripheral.connect()).await {
        result.map_err(BleError::GattConnect)
    } else {
        // The stack may still be trying; make sure it gives up.
        disconnect_quietly(peripheral).await;
        Err(BleError::ConnectTimeout {
            secs: limit.as_secs(),
        })
    }
}

async fn discover_control_characteristic(
    peripheral: &Peripheral,
    config: &BleConfig,
) -> Result<Characteristic, BleError> {
    peripheral.discover_services().await.map_err(BleError::Gatt)?;
    find_characteristic(
        &peripheral.services(),
        config.service_uuid,
        config.characteristic_uuid,
    )
}

async fn disconnect_quietly(peripheral: &Peripheral) {
    if let Err(err) = peripheral.disconnect().await {
        tracing::warn!(%err, "failed to disconnect peripheral");
    }
}

/// Open connection to the robot's control characteristic.
#[derive(Debug)]
pub struct BleRobotLink {
    peripheral: Peripheral,
    characteristic: Characteristic,
    write_type: WriteType,
}

impl RobotLink for BleRobotLink {
    async fn read(&self) -> Result<Vec<u8>, DddError> {
        let data = self
            .peripheral
            .read(&self.characteristic)
            .await
            .map_err(BleError::Gatt)?;
        Ok(data)
    }

    async fn write(&self, payload: [u8; PAYLOAD_LEN]) -> Result<(), DddError> {
        self.peripheral
            .write(&self.characteristic, &payload, self.write_type)
            .await
            .map_err(BleError::Gatt)?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), DddError> {
        self.peripheral
            .disconnect()
            .await
            .map_err(BleError::Gatt)?;
        tracing::debug!("peripheral disconnected");
        Ok(())
    }
}
