//! # ddd-domain
//!
//! Pure domain model for the DDD two-wheeled robot controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions shared across the workspace
//! - Define **Commands** (the operator vocabulary: `on`, `off`, `l`, `r`, `f`, `b`)
//! - Define **Robot state** (LED + left/right drive) and its transitions
//! - Encode and decode the 3-byte characteristic payload
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod command;
pub mod robot;
