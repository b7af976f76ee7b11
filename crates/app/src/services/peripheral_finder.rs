//! Peripheral finder — picks the robot out of the advertisements and connects.

use ddd_domain::error::{DddError, NotFoundError};

use crate::ports::{Advertisement, RobotScanner};

/// Scans until a peripheral advertising the expected name shows up, then
/// connects to it.
pub struct PeripheralFinder<S> {
    scanner: S,
    expected_name: String,
}

impl<S: RobotScanner> PeripheralFinder<S> {
    /// Create a finder that accepts only peripherals named `expected_name`.
    pub fn new(scanner: S, expected_name: impl Into<String>) -> Self {
        Self {
            scanner,
            expected_name: expected_name.into(),
        }
    }

    /// Whether the advertisement comes from the robot.
    ///
    /// The match is exact and case-sensitive; advertisements without a local
    /// name never match.
    #[must_use]
    pub fn accepts(&self, advertisement: &Advertisement) -> bool {
        advertisement.local_name.as_deref() == Some(self.expected_name.as_str())
    }

    /// Scan, connect to the first matching peripheral and return its link.
    ///
    /// Non-matching advertisements are logged and skipped. Scanning stops at
    /// the first match, so a peripheral that keeps advertising is connected
    /// to only once.
    ///
    /// # Errors
    ///
    /// Returns [`DddError::NotFound`] when the scan ends without a match or
    /// the robot lacks the control service/characteristic, and
    /// [`DddError::Transport`] when scanning or connecting fails.
    #[tracing::instrument(skip(self), fields(name = %self.expected_name))]
    pub async fn connect_first_match(&mut self) -> Result<S::Link, DddError> {
        self.scanner.start().await?;
        tracing::info!("Starting scan...");

        let matched = loop {
            let Some(advertisement) = self.scanner.next_advertisement().await? else {
                return Err(NotFoundError {
                    entity: "Peripheral",
                    id: self.expected_name.clone(),
                }
                .into());
            };

            if self.accepts(&advertisement) {
                break advertisement;
            }

            tracing::info!(
                name = advertisement.local_name.as_deref().unwrap_or("<unnamed>"),
                id = %advertisement.id,
                "declined to connect"
            );
        };

        if let Err(err) = self.scanner.stop().await {
            tracing::warn!(%err, "failed to stop scan");
        }

        tracing::info!(id = %matched.id, "connecting");
        let link = self.scanner.connect(&matched).await?;
        tracing::info!(id = %matched.id, "found service and characteristic");

        Ok(link)
    }
}
