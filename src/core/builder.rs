//! # Builder for constructing a [`Steward`].
//!
//! Wires the event bus, subscriber workers, health check, and provider into
//! a ready-to-run steward. The provider is the only mandatory piece; the
//! health check defaults to [`default_health_check`] and subscribers default
//! to none.

use std::sync::Arc;

use crate::config::Config;
use crate::connect::ProviderRef;
use crate::core::steward::Steward;
use crate::events::Bus;
use crate::health::{default_health_check, HealthCheck};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for a [`Steward`].
///
/// ## Example
/// ```no_run
/// # use std::sync::Arc;
/// # use async_trait::async_trait;
/// # use connvisor::{Config, Fault, Provider, Resource, Steward, WorkUnit};
/// # struct Net;
/// # struct Reader;
/// # #[async_trait]
/// # impl Resource for Reader {
/// #     async fn poll(&mut self) -> Result<WorkUnit, Fault> { Ok(WorkUnit::new("x")) }
/// # }
/// # #[async_trait]
/// # impl Provider for Net {
/// #     fn name(&self) -> &str { "net" }
/// #     async fn acquire(&self) -> Result<Box<dyn Resource>, Fault> { Ok(Box::new(Reader)) }
/// #     async fn release(&self) -> Result<(), Fault> { Ok(()) }
/// # }
/// let steward = Steward::builder(Config::default())
///     .with_provider(Arc::new(Net))
///     .build();
/// ```
pub struct StewardBuilder {
    cfg: Config,
    provider: Option<ProviderRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    is_fatal: HealthCheck,
}

impl StewardBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            provider: None,
            subscribers: Vec::new(),
            is_fatal: default_health_check(),
        }
    }

    /// Sets the connection provider (mandatory).
    pub fn with_provider(mut self, provider: ProviderRef) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (connection cycles, reads, faults)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets the fatal-fault predicate the monitor applies.
    ///
    /// Defaults to [`default_health_check`]: only [`Fault::Fatal`](crate::Fault::Fatal)
    /// triggers a restart.
    pub fn with_health_check(mut self, is_fatal: HealthCheck) -> Self {
        self.is_fatal = is_fatal;
        self
    }

    /// Builds the steward.
    ///
    /// # Panics
    /// Panics if no provider was configured; a steward without a connection
    /// source cannot supervise anything.
    pub fn build(self) -> Arc<Steward> {
        let provider = self
            .provider
            .expect("StewardBuilder: with_provider() is mandatory");

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers));

        Arc::new(Steward::new_internal(
            self.cfg,
            bus,
            subs,
            provider,
            self.is_fatal,
        ))
    }
}
