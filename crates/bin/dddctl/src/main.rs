//! # dddctl — DDD robot controller
//!
//! Composition root that wires the BLE adapter to the drive session.
//!
//! ## Responsibilities
//! - Load configuration (`ddd.toml`, env vars)
//! - Initialise logging
//! - Scan for the robot, connect and seed its state
//! - Run the interactive prompt until end-of-input or Ctrl-C
//! - Disconnect, then exit (non-zero on any fatal error)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod console;
mod logging;

use anyhow::Context as _;
use ddd_adapter_ble::BleScanner;
use ddd_app::services::drive_session::DriveSession;
use ddd_app::services::peripheral_finder::PeripheralFinder;

use crate::config::Config;
use crate::console::Console;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    logging::init(&config.logging);

    let scanner = BleScanner::new(config.ble.clone())
        .await
        .context("failed to open BLE adapter")?;
    let mut finder = PeripheralFinder::new(scanner, config.ble.peripheral_name.clone());
    let link = finder
        .connect_first_match()
        .await
        .context("failed to connect to robot")?;

    let mut session = DriveSession::open(link)
        .await
        .context("failed to read initial robot state")?;
    let mut console = Console::stdio();

    session
        .run_until(&mut console, interrupted())
        .await
        .context("command loop failed")?;

    Ok(())
}

/// Completes on Ctrl-C. Never completes if the handler cannot be installed.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
