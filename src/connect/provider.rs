//! # Connection provider.
//!
//! A [`Provider`] hands out the readable side of a connection and releases
//! all resources when asked. The steward owns the provider for the whole
//! supervision lifetime and drives exactly one acquire/release pair per
//! cycle; the provider itself never sees the ward or the monitor.
//!
//! The common handle type is [`ProviderRef`], an `Arc<dyn Provider>`
//! suitable for sharing with the supervision task.

use std::sync::Arc;

use async_trait::async_trait;

use crate::connect::resource::Resource;
use crate::error::Fault;

/// Shared handle to a provider.
pub type ProviderRef = Arc<dyn Provider>;

/// # Source of connections for one steward.
///
/// A `Provider` has a stable [`name`](Provider::name) used in events, an
/// async [`acquire`](Provider::acquire) that yields a readable [`Resource`],
/// and a [`release`](Provider::release) that tears the connection down.
///
/// ## Ownership
/// The returned resource is moved into the ward for the duration of one
/// supervision cycle; the steward guarantees `release` is only called after
/// that ward has fully joined, so implementations never face two consumers
/// of the same connection.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use connvisor::{Fault, Provider, Resource, WorkUnit};
///
/// struct Echo;
///
/// struct EchoReader;
///
/// #[async_trait]
/// impl Resource for EchoReader {
///     async fn poll(&mut self) -> Result<WorkUnit, Fault> {
///         Ok(WorkUnit::new("tick"))
///     }
/// }
///
/// #[async_trait]
/// impl Provider for Echo {
///     fn name(&self) -> &str { "echo" }
///
///     async fn acquire(&self) -> Result<Box<dyn Resource>, Fault> {
///         Ok(Box::new(EchoReader))
///     }
///
///     async fn release(&self) -> Result<(), Fault> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Returns a stable, human-readable provider name.
    fn name(&self) -> &str;

    /// Acquires a fresh readable resource.
    ///
    /// On failure the steward forwards the fault to its callers (best-effort)
    /// and retries after one pulse, bounded only by the external stop.
    async fn acquire(&self) -> Result<Box<dyn Resource>, Fault>;

    /// Releases everything the last acquisition holds.
    ///
    /// Called exactly once per successful `acquire`, strictly after the
    /// ward reading from that resource has joined.
    async fn release(&self) -> Result<(), Fault>;
}
