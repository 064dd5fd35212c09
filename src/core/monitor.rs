//! # Monitor: classifies a ward's fault stream.
//!
//! The monitor has a single responsibility: watch the faults a ward
//! produces, apply the injected [`HealthCheck`], and fire a one-shot restart
//! trigger on the first fault classified as fatal. It never tears anything
//! down itself — the steward owns that.
//!
//! ## State machine
//! ```text
//!            fatal fault observed
//! Watching ──────────────────────► Restarting   (terminal, fires restart)
//!    │
//!    │ stop fired, or fault stream closed
//!    └───────────────────────────► Stopped      (terminal, no restart)
//! ```
//!
//! The restart trigger is a `oneshot` carrying the fatal fault: it fires at
//! most once per monitor instance, and dropping it without sending (the
//! Stopped path) is observed by the steward as "no restart requested".

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::Fault;
use crate::events::{Bus, Event, EventKind};
use crate::health::HealthCheck;

/// Terminal state a monitor exits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MonitorExit {
    /// First fatal fault observed; restart was requested.
    Restarting,
    /// Stop fired or the fault stream closed without a fatal fault.
    Stopped,
}

/// Watches one ward's fault stream and raises the restart trigger.
pub(crate) struct Monitor {
    faults: mpsc::Receiver<Fault>,
    is_fatal: HealthCheck,
    bus: Bus,
    cycle: u64,
}

impl Monitor {
    /// Spawns a monitor over `faults`.
    ///
    /// Returns the join handle (resolving to the terminal [`MonitorExit`])
    /// and the restart trigger. The trigger resolves to the fatal fault on
    /// restart and errs if the monitor exits without requesting one.
    pub(crate) fn spawn(
        stop: CancellationToken,
        faults: mpsc::Receiver<Fault>,
        is_fatal: HealthCheck,
        bus: Bus,
        cycle: u64,
    ) -> (JoinHandle<MonitorExit>, oneshot::Receiver<Fault>) {
        let (restart_tx, restart_rx) = oneshot::channel();
        let monitor = Monitor {
            faults,
            is_fatal,
            bus,
            cycle,
        };
        (tokio::spawn(monitor.run(stop, restart_tx)), restart_rx)
    }

    /// Watches until a fatal fault, the stop token, or end-of-stream.
    async fn run(mut self, stop: CancellationToken, restart: oneshot::Sender<Fault>) -> MonitorExit {
        self.bus
            .publish(Event::now(EventKind::MonitorStarting).with_cycle(self.cycle));

        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                fault = self.faults.recv() => match fault {
                    // Ward exited and dropped its sender.
                    None => break,
                    Some(fault) => {
                        if (self.is_fatal)(&fault) {
                            self.bus.publish(
                                Event::now(EventKind::RestartTriggered)
                                    .with_reason(fault.as_message())
                                    .with_cycle(self.cycle),
                            );
                            // The steward may already be gone on shutdown races.
                            let _ = restart.send(fault);
                            return MonitorExit::Restarting;
                        }
                        // Non-fatal: keep watching.
                    }
                },
            }
        }

        self.bus
            .publish(Event::now(EventKind::MonitorStopped).with_cycle(self.cycle));
        MonitorExit::Stopped
    }
}
