//! Error type shared by the collision and physics solvers.

use thiserror::Error;

use crate::core::types::BodyId;

/// Errors surfaced synchronously to the host.
///
/// Degenerate shapes and separated bodies are legitimate states and never
/// produce an error; only registration, lookup, and configuration mistakes do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("no body registered with id {0}")]
    UnknownId(BodyId),
    #[error("a body with id {0} is already registered")]
    DuplicateId(BodyId),
    #[error("collision group '{0}' does not exist")]
    UnknownGroup(String),
    #[error("collision group '{0}' already exists")]
    DuplicateGroup(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
