//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [connected] source=net cycle=1
//! [read] unit="4521" cycle=1
//! [read-failed] reason="fatal: socket gone" cycle=1
//! [restart] reason="fatal: socket gone" cycle=1
//! [ward-stopped] cycle=1
//! [released] source=net cycle=1
//! [connect-failed] source=net reason="connect: refused" retry_ms=300
//! [shutdown-requested]
//! [steward-stopped]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
#[derive(Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Connected => {
                println!("[connected] source={:?} cycle={:?}", e.source, e.cycle);
            }
            EventKind::ConnectFailed => {
                println!(
                    "[connect-failed] source={:?} reason={:?} retry_ms={:?}",
                    e.source, e.reason, e.delay_ms
                );
            }
            EventKind::ConnectionReleased => {
                println!("[released] source={:?} cycle={:?}", e.source, e.cycle);
            }
            EventKind::ReleaseFailed => {
                println!(
                    "[release-failed] source={:?} reason={:?} cycle={:?}",
                    e.source, e.reason, e.cycle
                );
            }
            EventKind::WardStarting => {
                println!("[ward-starting] cycle={:?} poll_ms={:?}", e.cycle, e.delay_ms);
            }
            EventKind::WardStopped => {
                println!("[ward-stopped] cycle={:?}", e.cycle);
            }
            EventKind::WorkRead => {
                println!("[read] unit={:?} cycle={:?}", e.unit, e.cycle);
            }
            EventKind::ReadFailed => {
                println!("[read-failed] reason={:?} cycle={:?}", e.reason, e.cycle);
            }
            EventKind::FaultDropped => {
                println!("[fault-dropped] reason={:?}", e.reason);
            }
            EventKind::MonitorStarting => {
                println!("[monitor-starting] cycle={:?}", e.cycle);
            }
            EventKind::MonitorStopped => {
                println!("[monitor-stopped] cycle={:?}", e.cycle);
            }
            EventKind::RestartTriggered => {
                println!("[restart] reason={:?} cycle={:?}", e.reason, e.cycle);
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::StewardStopped => {
                println!("[steward-stopped]");
            }
            EventKind::GraceExceeded => {
                println!("[grace-exceeded]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
