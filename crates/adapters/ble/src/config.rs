//! BLE adapter configuration.

use std::time::Duration;

use serde::Deserialize;

/// Local name advertised by the robot.
pub const ROBOT_NAME: &str = "EE 149 | DDD";

/// GATT service exposing the robot's control characteristic.
pub const SERVICE_UUID: uuid::Uuid =
    uuid::Uuid::from_u128(0x32e6_1089_2b22_4db5_a914_43ce_4198_6c70);

/// GATT characteristic holding the 3-byte control state.
pub const CHARACTERISTIC_UUID: uuid::Uuid =
    uuid::Uuid::from_u128(0x32e6_108a_2b22_4db5_a914_43ce_4198_6c70);

/// Configuration for finding and talking to the robot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BleConfig {
    /// Exact advertised local name to connect to.
    pub peripheral_name: String,
    /// Service UUID used both as scan filter and for service discovery.
    pub service_uuid: uuid::Uuid,
    /// Control characteristic UUID inside that service.
    pub characteristic_uuid: uuid::Uuid,
    /// Upper bound for establishing the connection, in seconds. `0` waits
    /// forever.
    pub connect_timeout_secs: u16,
    /// Wait for the robot to acknowledge every write.
    pub write_with_response: bool,
}

impl BleConfig {
    /// Connection timeout, or `None` when disabled.
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0)
            .then(|| Duration::from_secs(u64::from(self.connect_timeout_secs)))
    }
}

impl Default for BleConfig {
    fn default() -> Self {
        Self {
            peripheral_name: ROBOT_NAME.to_string(),
            service_uuid: SERVICE_UUID,
            characteristic_uuid: CHARACTERISTIC_UUID,
            connect_timeout_secs: 20,
            write_with_response: false,
        }
    }
}
