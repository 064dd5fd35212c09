//! # Runtime events and the bus that carries them.
//!
//! This module provides the observability side of the runtime:
//! - [`Event`] / [`EventKind`] - what happened, with metadata
//! - [`Bus`] - broadcast channel the components publish into
//!
//! Events are fire-and-forget: they never provide backpressure and never
//! influence supervision decisions. The functional fault path (ward to
//! monitor, steward to caller) uses dedicated bounded channels instead.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
