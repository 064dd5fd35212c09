//! Runtime core: the supervision hierarchy.
//!
//! This module contains the embedded implementation of the connvisor
//! runtime. The public API from this module is [`Steward`] (plus its
//! builder); the ward and monitor are internal.
//!
//! Internal modules:
//! - [`ward`]: polls one resource on a fixed interval, delivers faults non-blocking;
//! - [`monitor`]: classifies the fault stream, fires the one-shot restart trigger;
//! - [`steward`]: owns acquire/teardown cycles, retries, and shutdown;
//! - [`builder`]: wires config, provider, subscribers, and health check;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod monitor;
mod shutdown;
mod steward;
mod ward;

pub use builder::StewardBuilder;
pub use steward::Steward;
