//! # Steward: owns the connection lifecycle end-to-end.
//!
//! The [`Steward`] is the top-level, user-facing component. Per supervision
//! cycle it acquires a connection from the [`Provider`](crate::Provider),
//! spawns a ward over the resource and a monitor over the ward's fault
//! stream, waits for either the external stop or the monitor's restart
//! trigger, then tears the pair down **completely** before touching the
//! provider again.
//!
//! ## Supervision loop
//! ```text
//! loop {
//!   ├─► stop fired? → exit
//!   ├─► provider.acquire()
//!   │     ├─ Err → forward fault (best-effort), sleep one pulse, retry
//!   │     └─ Ok(resource)
//!   ├─► ward_stop = stop.child_token()
//!   ├─► Ward::spawn(ward_stop, resource, pulse/2)   → (done, faults)
//!   ├─► Monitor::spawn(ward_stop, faults, is_fatal) → restart
//!   ├─► select { stop fired | restart fired }
//!   ├─► ward_stop.cancel()
//!   ├─► join ward, join monitor          ◄── anti-livelock barrier
//!   └─► provider.release()
//! }
//! ```
//!
//! ## Guarantees
//! - The `done` handle completes exactly once, after all children have
//!   joined and the connection (if any) has been released.
//! - No connection is ever acquired while a previous one's ward has not yet
//!   joined. The join before `release()` is what prevents an orphaned ward
//!   from polling a connection nobody is watching.
//! - Connect retries run at a fixed pulse with no attempt cap; the loop is
//!   bounded only by the external stop token.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::connect::ProviderRef;
use crate::core::monitor::Monitor;
use crate::core::shutdown;
use crate::core::ward::Ward;
use crate::error::{Fault, StewardError};
use crate::events::{Bus, Event, EventKind};
use crate::health::HealthCheck;
use crate::subscribers::SubscriberSet;

/// Coordinates connection acquisition, ward/monitor cycles, and shutdown.
///
/// Build one with [`Steward::builder`]. The raw supervision operation is
/// [`Steward::spawn`]; [`Steward::run`] wraps it with OS signal handling and
/// a bounded shutdown wait.
pub struct Steward {
    /// Global runtime configuration.
    pub cfg: Config,
    /// Event bus shared with all components.
    pub bus: Bus,
    /// Fan-out set for subscribers.
    pub subs: Arc<SubscriberSet>,
    provider: ProviderRef,
    is_fatal: HealthCheck,
}

impl Steward {
    /// Returns a builder for constructing a steward.
    pub fn builder(cfg: Config) -> crate::core::builder::StewardBuilder {
        crate::core::builder::StewardBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        subs: Arc<SubscriberSet>,
        provider: ProviderRef,
        is_fatal: HealthCheck,
    ) -> Self {
        Self {
            cfg,
            bus,
            subs,
            provider,
            is_fatal,
        }
    }

    /// Starts supervision under an externally owned stop token.
    ///
    /// Returns the `done` handle, which completes exactly once when the
    /// supervision loop has fully shut down, and the caller-facing fault
    /// stream carrying connect-time and fatal faults. Delivery is best-effort: a full or unwatched stream
    /// drops faults with a [`EventKind::FaultDropped`] diagnostic instead of
    /// blocking supervision.
    pub fn spawn(&self, stop: CancellationToken) -> (JoinHandle<()>, mpsc::Receiver<Fault>) {
        self.subscriber_listener();

        let (tx, rx) = mpsc::channel(self.cfg.errors_capacity_clamped());
        let supervision = Supervision {
            provider: self.provider.clone(),
            is_fatal: self.is_fatal.clone(),
            bus: self.bus.clone(),
            cfg: self.cfg.clone(),
            faults: tx,
        };
        (tokio::spawn(supervision.run(stop)), rx)
    }

    /// Runs supervision until an OS termination signal arrives.
    ///
    /// On signal: publishes [`EventKind::ShutdownRequested`], cancels the
    /// internal stop token, and waits up to [`Config::grace`] for the loop
    /// to join. Returns [`StewardError::GraceExceeded`] if it does not.
    pub async fn run(&self) -> Result<(), StewardError> {
        let stop = CancellationToken::new();
        let (mut done, _faults) = self.spawn(stop.clone());

        tokio::select! {
            _ = shutdown::wait_for_shutdown_signal() => {
                self.bus.publish(Event::now(EventKind::ShutdownRequested));
                stop.cancel();
                self.wait_done_with_grace(&mut done).await
            }
            _ = &mut done => Ok(()),
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget).
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }

    /// Waits for the supervision loop to finish within the grace period.
    async fn wait_done_with_grace(
        &self,
        done: &mut JoinHandle<()>,
    ) -> Result<(), StewardError> {
        let grace = self.cfg.grace;
        match time::timeout(grace, done).await {
            Ok(_) => Ok(()),
            Err(_) => {
                self.bus.publish(Event::now(EventKind::GraceExceeded));
                Err(StewardError::GraceExceeded { grace })
            }
        }
    }
}

/// The supervision loop, detached from the `Steward` handle so it can be
/// moved into its own task.
struct Supervision {
    provider: ProviderRef,
    is_fatal: HealthCheck,
    bus: Bus,
    cfg: Config,
    faults: mpsc::Sender<Fault>,
}

impl Supervision {
    /// Runs acquire → ward/monitor → teardown cycles until the stop fires.
    async fn run(self, stop: CancellationToken) {
        let mut cycle: u64 = 0;

        loop {
            if stop.is_cancelled() {
                break;
            }

            let resource = match self.provider.acquire().await {
                Ok(resource) => resource,
                Err(fault) => {
                    self.bus.publish(
                        Event::now(EventKind::ConnectFailed)
                            .with_source(self.provider.name())
                            .with_reason(fault.as_message())
                            .with_cycle(cycle + 1)
                            .with_delay(self.cfg.pulse),
                    );
                    self.send_fault(fault, &stop);

                    // Fixed-interval retry, bounded only by the stop token.
                    tokio::select! {
                        _ = time::sleep(self.cfg.pulse) => {}
                        _ = stop.cancelled() => {}
                    }
                    continue;
                }
            };

            cycle += 1;
            self.bus.publish(
                Event::now(EventKind::Connected)
                    .with_source(self.provider.name())
                    .with_cycle(cycle),
            );

            // One token per cycle: cancelled explicitly on restart, and
            // implicitly when the external stop cancels the parent.
            let ward_stop = stop.child_token();
            let (ward_done, ward_faults) = Ward::spawn(
                ward_stop.clone(),
                resource,
                self.cfg.ward_interval(),
                self.bus.clone(),
                cycle,
            );
            let (monitor_done, restart) = Monitor::spawn(
                ward_stop.clone(),
                ward_faults,
                self.is_fatal.clone(),
                self.bus.clone(),
                cycle,
            );

            // Whichever fires first wins; the teardown below is identical.
            tokio::select! {
                _ = stop.cancelled() => {}
                fired = restart => {
                    // Fatal faults reach the caller stream alongside
                    // connect-time failures.
                    if let Ok(fault) = fired {
                        self.send_fault(fault, &stop);
                    }
                }
            }

            // Teardown barrier: no new connection until both children have
            // joined and the old connection is released.
            ward_stop.cancel();
            let _ = ward_done.await;
            let _ = monitor_done.await;

            match self.provider.release().await {
                Ok(()) => {
                    self.bus.publish(
                        Event::now(EventKind::ConnectionReleased)
                            .with_source(self.provider.name())
                            .with_cycle(cycle),
                    );
                }
                Err(fault) => {
                    self.bus.publish(
                        Event::now(EventKind::ReleaseFailed)
                            .with_source(self.provider.name())
                            .with_reason(fault.as_message())
                            .with_cycle(cycle),
                    );
                }
            }
        }

        self.bus.publish(Event::now(EventKind::StewardStopped));
        // Dropping `self` drops the fault sender; callers observe closure.
    }

    /// Forwards a fault to the caller-facing stream without blocking.
    ///
    /// Same drop policy as the ward: discard after stop, drop with a
    /// diagnostic when the stream is full or unwatched.
    fn send_fault(&self, fault: Fault, stop: &CancellationToken) {
        if stop.is_cancelled() {
            return;
        }
        match self.faults.try_send(fault) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.bus
                    .publish(Event::now(EventKind::FaultDropped).with_reason("slot_full"));
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.bus
                    .publish(Event::now(EventKind::FaultDropped).with_reason("no_listener"));
            }
        }
    }
}
