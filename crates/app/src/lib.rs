//! # ddd-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RobotScanner` — discover advertising peripherals and connect to one
//!   - `RobotLink` — read/write the robot's control characteristic, disconnect
//!   - `CommandSource` — deliver operator input one line at a time
//! - Define **use-case services**:
//!   - `PeripheralFinder` — pick the robot out of the advertisements and connect
//!   - `DriveSession` — seed state from the robot, run the command loop, disconnect
//!
//! ## Dependency rule
//! Depends on `ddd-domain` only (plus `tracing`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
