//! # ddd-adapter-ble
//!
//! Active BLE adapter — finds the DDD robot by its advertised name, connects
//! and reads/writes its control characteristic.
//!
//! ## How it works
//!
//! The robot advertises its control service and a local name. The
//! [`BleScanner`] scans with a service filter, hands every advertisement to
//! the application layer and, once one is accepted, connects and locates the
//! control characteristic. The resulting [`BleRobotLink`] carries the 3-byte
//! state in both directions.
//!
//! ## GATT layout
//!
//! | Item | UUID | Access |
//! |------|------|--------|
//! | Service | `32e61089-2b22-4db5-a914-43ce41986c70` | — |
//! | Control characteristic | `32e6108a-2b22-4db5-a914-43ce41986c70` | read, write |
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `ddd-app` and `ddd-domain`.

mod config;
mod error;
mod gatt;
mod scanner;

pub use config::{BleConfig, CHARACTERISTIC_UUID, ROBOT_NAME, SERVICE_UUID};
pub use error::BleError;
pub use gatt::BleRobotLink;
pub use scanner::BleScanner;
