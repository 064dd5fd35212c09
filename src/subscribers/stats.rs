//! # Stateful subscriber that counts supervision activity.
//!
//! [`CycleStats`] maintains running counters of connection cycles, reads,
//! restarts, and dropped faults by listening to runtime events. It is the
//! natural hook for asserting supervision behavior in tests (how many
//! release+reacquire cycles happened, whether any fault was dropped) and a
//! cheap source of operational numbers in production.
//!
//! ## Tracked transitions
//! ```text
//! Connected          → connects += 1
//! ConnectFailed      → connect_failures += 1
//! ConnectionReleased → releases += 1
//! WorkRead           → reads += 1
//! ReadFailed         → read_failures += 1
//! RestartTriggered   → restarts += 1
//! FaultDropped       → faults_dropped += 1
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Point-in-time copy of the counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Successful acquisitions.
    pub connects: u64,
    /// Failed acquisition attempts.
    pub connect_failures: u64,
    /// Connections released after their ward joined.
    pub releases: u64,
    /// Successful polls.
    pub reads: u64,
    /// Failed polls.
    pub read_failures: u64,
    /// Restarts requested by monitors.
    pub restarts: u64,
    /// Faults dropped by the best-effort delivery path.
    pub faults_dropped: u64,
}

/// Counts supervision activity observed on the event bus.
///
/// Thread-safe and cloneable — multiple references share the same counters.
#[derive(Clone, Default)]
pub struct CycleStats {
    inner: Arc<Mutex<StatsSnapshot>>,
}

impl CycleStats {
    /// Creates a new tracker with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the current counters.
    pub async fn snapshot(&self) -> StatsSnapshot {
        *self.inner.lock().await
    }
}

#[async_trait]
impl Subscribe for CycleStats {
    async fn on_event(&self, event: &Event) {
        let mut stats = self.inner.lock().await;
        match event.kind {
            EventKind::Connected => stats.connects += 1,
            EventKind::ConnectFailed => stats.connect_failures += 1,
            EventKind::ConnectionReleased => stats.releases += 1,
            EventKind::WorkRead => stats.reads += 1,
            EventKind::ReadFailed => stats.read_failures += 1,
            EventKind::RestartTriggered => stats.restarts += 1,
            EventKind::FaultDropped => stats.faults_dropped += 1,
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "cycle_stats"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counters_follow_events() {
        let stats = CycleStats::new();

        stats.on_event(&Event::now(EventKind::Connected)).await;
        stats.on_event(&Event::now(EventKind::WorkRead)).await;
        stats.on_event(&Event::now(EventKind::WorkRead)).await;
        stats.on_event(&Event::now(EventKind::RestartTriggered)).await;
        stats.on_event(&Event::now(EventKind::ConnectionReleased)).await;
        // Ignored kind: must not disturb any counter.
        stats.on_event(&Event::now(EventKind::ShutdownRequested)).await;

        let snap = stats.snapshot().await;
        assert_eq!(snap.connects, 1);
        assert_eq!(snap.reads, 2);
        assert_eq!(snap.restarts, 1);
        assert_eq!(snap.releases, 1);
        assert_eq!(snap.connect_failures, 0);
        assert_eq!(snap.faults_dropped, 0);
    }

    #[tokio::test]
    async fn test_clones_share_counters() {
        let stats = CycleStats::new();
        let peer = stats.clone();

        stats.on_event(&Event::now(EventKind::ConnectFailed)).await;
        assert_eq!(peer.snapshot().await.connect_failures, 1);
    }
}
