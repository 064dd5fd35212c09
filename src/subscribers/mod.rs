//! # Event subscribers for the connvisor runtime.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling runtime events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Ward/Monitor/Steward ── publish(Event) ──► Bus ──► steward listener
//!                                                          │
//!                                                   SubscriberSet::emit
//!                                                ┌─────────┼─────────┐
//!                                                ▼         ▼         ▼
//!                                            CycleStats LogWriter  custom
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** - observe and react to events (logging, metrics, alerts)
//! - **Stateful subscribers** - maintain internal state based on events ([`CycleStats`])

mod set;
mod stats;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use stats::{CycleStats, StatsSnapshot};
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
