//! Robot link port — an open connection to the robot's control characteristic.

use std::future::Future;

use ddd_domain::error::DddError;
use ddd_domain::robot::PAYLOAD_LEN;

/// A connected robot whose control characteristic has been discovered.
///
/// Implementations hold whatever handles the transport needs; the session
/// only ever sees raw characteristic values.
pub trait RobotLink {
    /// Read the current characteristic value.
    fn read(&self) -> impl Future<Output = Result<Vec<u8>, DddError>> + Send;

    /// Write a full characteristic value.
    fn write(
        &self,
        payload: [u8; PAYLOAD_LEN],
    ) -> impl Future<Output = Result<(), DddError>> + Send;

    /// Close the connection.
    fn disconnect(&self) -> impl Future<Output = Result<(), DddError>> + Send;
}
