//! # Runtime events emitted by the steward, ward, and monitor.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Connection events**: acquire/release flow of the supervised connection
//! - **Ward events**: polling lifecycle, successful reads, fault delivery
//! - **Monitor events**: classification lifecycle and restart triggers
//! - **Steward events**: shutdown flow of the top-level loop
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! component names, reasons, cycle numbers, and read payloads.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use connvisor::{Event, EventKind};
//!
//! let ev = Event::now(EventKind::ReadFailed)
//!     .with_source("upstream")
//!     .with_reason("read: connection reset")
//!     .with_cycle(2);
//!
//! assert_eq!(ev.kind, EventKind::ReadFailed);
//! assert_eq!(ev.source.as_deref(), Some("upstream"));
//! assert_eq!(ev.cycle, Some(2));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Connection events ===
    /// Acquisition failed; the steward will retry after one pulse.
    ///
    /// Sets:
    /// - `source`: provider name
    /// - `reason`: connect fault message
    /// - `cycle`: supervision cycle number (1-based)
    /// - `delay_ms`: wait before the next attempt
    ConnectFailed,

    /// A connection was acquired and a new cycle is starting.
    ///
    /// Sets:
    /// - `source`: provider name
    /// - `cycle`: supervision cycle number
    Connected,

    /// The connection was released after its ward joined.
    ///
    /// Sets:
    /// - `source`: provider name
    /// - `cycle`: supervision cycle number
    ConnectionReleased,

    /// Releasing the connection reported a fault (ignored beyond this event).
    ///
    /// Sets:
    /// - `source`: provider name
    /// - `reason`: release fault message
    /// - `cycle`: supervision cycle number
    ReleaseFailed,

    // === Ward events ===
    /// A ward started polling a fresh resource.
    ///
    /// Sets:
    /// - `cycle`: supervision cycle number
    /// - `delay_ms`: poll interval
    WardStarting,

    /// A ward observed its stop signal and finished.
    ///
    /// Sets:
    /// - `cycle`: supervision cycle number
    WardStopped,

    /// A poll succeeded.
    ///
    /// Sets:
    /// - `unit`: payload of the unit that was read
    /// - `cycle`: supervision cycle number
    WorkRead,

    /// A poll failed; the fault was handed to the delivery path.
    ///
    /// Sets:
    /// - `reason`: fault message
    /// - `cycle`: supervision cycle number
    ReadFailed,

    /// A fault could not be delivered (no listener or full slot) and was
    /// dropped. Faults discarded after the stop fired are not reported.
    ///
    /// Sets:
    /// - `reason`: drop cause (`"no_listener"`, `"slot_full"`)
    FaultDropped,

    // === Monitor events ===
    /// A monitor started watching a ward's fault stream.
    ///
    /// Sets:
    /// - `cycle`: supervision cycle number
    MonitorStarting,

    /// A monitor finished without requesting a restart.
    ///
    /// Sets:
    /// - `cycle`: supervision cycle number
    MonitorStopped,

    /// A monitor classified a fault as fatal and fired its restart trigger.
    ///
    /// Sets:
    /// - `reason`: the fatal fault message
    /// - `cycle`: supervision cycle number
    RestartTriggered,

    // === Steward events ===
    /// Shutdown requested (OS signal observed or stop token cancelled).
    ShutdownRequested,

    /// The supervision loop finished: children joined, connection released.
    StewardStopped,

    /// Grace period elapsed before the supervision loop joined.
    GraceExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the provider/component this event concerns, if applicable.
    pub source: Option<Arc<str>>,
    /// Human-readable reason (fault messages, drop causes, etc.).
    pub reason: Option<Arc<str>>,
    /// Payload of a successfully read unit.
    pub unit: Option<Arc<str>>,
    /// Supervision cycle number (1-based, increments per acquired connection).
    pub cycle: Option<u64>,
    /// Interval or retry delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next global sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            source: None,
            reason: None,
            unit: None,
            cycle: None,
            delay_ms: None,
        }
    }

    /// Attaches a provider/component name.
    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the payload of a read unit.
    #[inline]
    pub fn with_unit(mut self, unit: impl Into<Arc<str>>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Attaches a supervision cycle number.
    #[inline]
    pub fn with_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Attaches an interval or retry delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::Connected);
        let b = Event::now(EventKind::Connected);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::now(EventKind::ConnectFailed)
            .with_source("net")
            .with_reason("refused")
            .with_cycle(3)
            .with_delay(Duration::from_millis(300));

        assert_eq!(ev.source.as_deref(), Some("net"));
        assert_eq!(ev.reason.as_deref(), Some("refused"));
        assert_eq!(ev.cycle, Some(3));
        assert_eq!(ev.delay_ms, Some(300));
        assert!(ev.unit.is_none());
    }
}
