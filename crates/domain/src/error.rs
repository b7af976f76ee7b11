//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`DddError`]
//! when crossing a port boundary.

/// Top-level error shared by the application layer and its ports.
#[derive(Debug, thiserror::Error)]
pub enum DddError {
    /// A required peripheral, service or characteristic does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The session was already closed; nothing more may be written.
    #[error("session already closed")]
    SessionClosed,

    /// The underlying transport (BLE stack, terminal) failed.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Something that was looked up by identifier and not found.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (e.g. `"Service"`).
    pub entity: &'static str,
    /// Identifier that was searched for.
    pub id: String,
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A name that must not be blank was blank.
    #[error("name must not be empty")]
    EmptyName,
}

/// Operator input that does not map to any [`Command`](crate::command::Command).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid command: {input}")]
pub struct UnknownCommandError {
    /// The raw line as the operator typed it.
    pub input: String,
}
