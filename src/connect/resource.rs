//! # Readable resource and the values it produces.
//!
//! A [`Resource`] is the readable side of one live connection. It is owned
//! by the ward that wraps it and is never polled by more than one task.
//! Each poll yields either one [`WorkUnit`] or a [`Fault`]; the resource
//! itself carries no restart policy — it just reports what happened.

use async_trait::async_trait;

use crate::error::Fault;

/// # One readable connection.
///
/// Polled on the ward's timer; each call attempts to pull exactly one unit
/// of work. Implementations take `&mut self` because the ward is the sole
/// owner — there is no concurrent access to defend against.
#[async_trait]
pub trait Resource: Send + 'static {
    /// Pulls one unit of work, or reports why that was not possible.
    ///
    /// A returned fault does not end the ward's polling; classification of
    /// faults is the monitor's job, not the resource's.
    async fn poll(&mut self) -> Result<WorkUnit, Fault>;
}

/// Immutable unit of work produced by a successful poll.
///
/// Value type with no ownership concerns; the ward publishes it to the
/// event bus and moves on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkUnit {
    /// Payload carried by this unit.
    pub content: String,
}

impl WorkUnit {
    /// Creates a unit with the given payload.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
