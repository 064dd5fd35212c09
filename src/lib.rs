//! # connvisor
//!
//! **connvisor** is a lightweight connection-supervision library for Rust.
//!
//! It keeps a logical connection alive across repeated, unpredictable
//! terminal failures of the underlying transport, without ever running two
//! competing consumers of the same connection at once. The crate is designed
//! as a building block for clients of flaky message sources: feeds, brokers,
//! long-polled APIs.
//!
//! ## Architecture
//! ```text
//!                      ┌─────────────────────────────────────────────┐
//!                      │  Steward (lifecycle owner)                  │
//!                      │  - acquires Connection via Provider         │
//!                      │  - spawns Ward + Monitor per cycle          │
//!                      │  - joins Ward before release (barrier)      │
//!                      │  - retries connect at a fixed pulse         │
//!                      └───────┬─────────────────────────┬───────────┘
//!                              ▼                         ▼
//!                      ┌──────────────┐          ┌──────────────┐
//!                      │     Ward     │  faults  │   Monitor    │
//!                      │ (poll loop)  ├─────────►│ (classifier) │
//!                      └──────┬───────┘ (cap=1)  └──────┬───────┘
//!                             │                         │ restart (oneshot)
//!                             │ Publishes Events:       ▼
//!                             │ - WorkRead          back to Steward
//!                             │ - ReadFailed
//!                             ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │               (capacity: Config::bus_capacity)                    │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                          steward listener ──► SubscriberSet
//!                                            ┌─────────┼─────────┐
//!                                            ▼         ▼         ▼
//!                                       CycleStats LogWriter   custom
//! ```
//!
//! ### Lifecycle
//! ```text
//! Provider ──► Steward::spawn(stop)
//!
//! loop {
//!   ├─► stop fired? ─► exit, complete done
//!   ├─► acquire()
//!   │     ├─ Err ─► forward fault (drop-on-full), sleep pulse, retry
//!   │     └─ Ok(resource)
//!   ├─► Ward polls resource every pulse/2
//!   │       ├─ Ok(unit)  ─► WorkRead event
//!   │       └─ Err(fault) ─► fault slot (capacity 1, never blocks)
//!   ├─► Monitor applies is_fatal(fault)
//!   │       ├─ false ─► keep watching
//!   │       └─ true  ─► fire restart (once), stop watching
//!   ├─► select { stop | restart }
//!   ├─► cancel ward token, JOIN ward, join monitor
//!   └─► release(), next cycle
//! }
//! ```
//!
//! The join before `release()` is the load-bearing ordering guarantee: an
//! old ward is never still polling when a fresh connection is acquired,
//! which is exactly the livelock this crate exists to prevent.
//!
//! ## Features
//! | Area              | Description                                                         | Key types / traits               |
//! |-------------------|---------------------------------------------------------------------|----------------------------------|
//! | **Supervision**   | Acquire/teardown cycles with a strict join barrier.                 | [`Steward`], [`StewardBuilder`]  |
//! | **Boundary**      | Connection source and readable resource, specified at the seam.     | [`Provider`], [`Resource`]       |
//! | **Health**        | Injected pure predicate deciding which faults are fatal.            | [`HealthCheck`]                  |
//! | **Errors**        | Typed faults and runtime errors.                                    | [`Fault`], [`StewardError`]      |
//! | **Subscriber API**| Hook into runtime events (stats, logging, custom subscribers).      | [`Subscribe`], [`CycleStats`]    |
//! | **Configuration** | Centralize runtime settings.                                        | [`Config`]                       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use connvisor::{Config, Fault, Provider, Resource, Steward, WorkUnit};
//!
//! struct Feed;
//! struct FeedReader;
//!
//! #[async_trait]
//! impl Resource for FeedReader {
//!     async fn poll(&mut self) -> Result<WorkUnit, Fault> {
//!         // read one message from the transport...
//!         Ok(WorkUnit::new("payload"))
//!     }
//! }
//!
//! #[async_trait]
//! impl Provider for Feed {
//!     fn name(&self) -> &str { "feed" }
//!
//!     async fn acquire(&self) -> Result<Box<dyn Resource>, Fault> {
//!         Ok(Box::new(FeedReader))
//!     }
//!
//!     async fn release(&self) -> Result<(), Fault> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.pulse = Duration::from_millis(300);
//!
//!     let steward = Steward::builder(cfg)
//!         .with_provider(Arc::new(Feed))
//!         .build();
//!
//!     // Blocks until SIGINT/SIGTERM, healing the connection as needed.
//!     steward.run().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod connect;
mod core;
mod error;
mod events;
mod health;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use connect::{Provider, ProviderRef, Resource, WorkUnit};
pub use crate::core::{Steward, StewardBuilder};
pub use error::{Fault, StewardError};
pub use events::{Bus, Event, EventKind};
pub use health::{default_health_check, HealthCheck};
pub use subscribers::{CycleStats, StatsSnapshot, Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
