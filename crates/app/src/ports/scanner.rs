//! Scanner port — BLE discovery and connection set-up.

use std::future::Future;

use ddd_domain::error::DddError;

use super::RobotLink;

/// One advertisement event seen while scanning.
///
/// The same peripheral may show up many times while it keeps advertising.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    /// Platform identifier of the peripheral (MAC address, or a UUID on macOS).
    pub id: String,
    /// Advertised local name, when the advertisement carried one.
    pub local_name: Option<String>,
}

/// Discovers advertising peripherals and opens a [`RobotLink`] to one of them.
///
/// The caller drives the lifecycle in order:
///
/// 1. [`start`](Self::start) — begin scanning for the robot service
/// 2. [`next_advertisement`](Self::next_advertisement) — until a match
/// 3. [`stop`](Self::stop) — stop scanning
/// 4. [`connect`](Self::connect) — connect and discover the control characteristic
pub trait RobotScanner {
    /// The link type produced by a successful connection.
    type Link: RobotLink;

    /// Start scanning for peripherals advertising the robot service.
    fn start(&mut self) -> impl Future<Output = Result<(), DddError>> + Send;

    /// Wait for the next advertisement. `Ok(None)` means the scan ended.
    fn next_advertisement(
        &mut self,
    ) -> impl Future<Output = Result<Option<Advertisement>, DddError>> + Send;

    /// Stop scanning.
    fn stop(&mut self) -> impl Future<Output = Result<(), DddError>> + Send;

    /// Connect to the advertised peripheral and discover the control
    /// characteristic.
    ///
    /// Fails with [`DddError::NotFound`] when the service or characteristic is
    /// missing; the peripheral is disconnected before returning in that case.
    fn connect(
        &mut self,
        advertisement: &Advertisement,
    ) -> impl Future<Output = Result<Self::Link, DddError>> + Send;
}
