//! Logging set-up.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// Logs go to stderr so the prompt on stdout stays readable. An invalid
/// filter falls back to `info` and is reported once the subscriber is up.
pub fn init(settings: &LoggingConfig) {
    let (filter, invalid) = match EnvFilter::try_new(&settings.filter) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new("info"), Some(err)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    if let Some(err) = invalid {
        tracing::warn!(%err, filter = %settings.filter, "invalid log filter, using info");
    }
}
