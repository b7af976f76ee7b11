//! BLE adapter error types.

use ddd_domain::error::{DddError, NotFoundError};

/// Errors specific to the BLE adapter.
#[derive(Debug, thiserror::Error)]
pub enum BleError {
    /// No BLE adapter found on the host.
    #[error("no BLE adapter available")]
    NotAvailable,

    /// BLE scan or adapter operation failed.
    #[error("BLE scan error")]
    Scan(#[from] btleplug::Error),

    /// Connecting to the peripheral failed.
    #[error("failed to connect to peripheral")]
    GattConnect(#[source] btleplug::Error),

    /// The peripheral did not accept the connection in time.
    #[error("connection timed out after {secs}s")]
    ConnectTimeout {
        /// The configured timeout.
        secs: u64,
    },

    /// A GATT operation (discovery, read, write, disconnect) failed.
    #[error("GATT operation failed")]
    Gatt(#[source] btleplug::Error),

    /// The connected peripheral does not expose the control service.
    #[error("service {uuid} not found")]
    ServiceNotFound {
        /// The service UUID that was searched for.
        uuid: uuid::Uuid,
    },

    /// The control service lacks the control characteristic.
    #[error("characteristic {uuid} not found")]
    CharacteristicNotFound {
        /// The characteristic UUID that was searched for.
        uuid: uuid::Uuid,
    },
}

impl BleError {
    /// Convert into a [`DddError`] for propagation across port boundaries.
    #[must_use]
    pub fn into_domain(self) -> DddError {
        match self {
            Self::ServiceNotFound { uuid } => DddError::NotFound(NotFoundError {
                entity: "Service",
                id: uuid.to_string(),
            }),
            Self::CharacteristicNotFound { uuid } => DddError::NotFound(NotFoundError {
                entity: "Characteristic",
                id: uuid.to_string(),
            }),
            other => DddError::Transport(Box::new(other)),
        }
    }
}

impl From<BleError> for DddError {
    fn from(err: BleError) -> Self {
        err.into_domain()
    }
}
