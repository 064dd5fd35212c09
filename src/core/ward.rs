//! # Ward: periodic reader over one live resource.
//!
//! The ward is the leaf of the supervision hierarchy. It owns one
//! [`Resource`], polls it on a fixed interval, and hands every fault to a
//! single-slot delivery channel without ever blocking on it.
//!
//! ## Rules
//! - The ward **never stops itself on failure**. It keeps polling even after
//!   a fatal fault; deciding to stop belongs to the monitor and the steward.
//! - Fault delivery is **best-effort**: if the stop token has fired the fault
//!   is discarded, otherwise it is placed into the slot if there is room,
//!   else dropped with a [`EventKind::FaultDropped`] diagnostic. There is no
//!   backpressure from the monitor back to the ward.
//! - On stop the ward drops its sender, which closes the fault stream — the
//!   monitor observes that closure as end-of-stream. The returned join
//!   handle completes exactly once; no sends happen after it resolves.
//!
//! ## Flow
//! ```text
//! loop {
//!   select {
//!     stop fired   → publish WardStopped, exit
//!     tick elapsed → resource.poll()
//!                      ├─ Ok(unit)  → publish WorkRead, continue
//!                      └─ Err(f)    → publish ReadFailed, try_send(f), continue
//!   }
//! }
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::connect::Resource;
use crate::error::Fault;
use crate::events::{Bus, Event, EventKind};

/// Capacity of the ward-to-monitor fault slot.
///
/// A single slot is deliberate: the monitor only cares about the first fatal
/// fault, and anything the slot cannot hold is observable on the bus anyway.
const FAULT_SLOT: usize = 1;

/// Periodic reader over one resource.
pub(crate) struct Ward {
    resource: Box<dyn Resource>,
    interval: Duration,
    faults: mpsc::Sender<Fault>,
    bus: Bus,
    cycle: u64,
}

impl Ward {
    /// Spawns a ward over `resource`, polling every `interval`.
    ///
    /// Returns the join handle (the ward's `done` signal) and the receiving
    /// end of its fault stream. The stream closes when the ward exits.
    pub(crate) fn spawn(
        stop: CancellationToken,
        resource: Box<dyn Resource>,
        interval: Duration,
        bus: Bus,
        cycle: u64,
    ) -> (JoinHandle<()>, mpsc::Receiver<Fault>) {
        let (tx, rx) = mpsc::channel(FAULT_SLOT);
        let ward = Ward {
            resource,
            interval,
            faults: tx,
            bus,
            cycle,
        };
        (tokio::spawn(ward.run(stop)), rx)
    }

    /// Polls until the stop token fires.
    async fn run(mut self, stop: CancellationToken) {
        self.bus.publish(
            Event::now(EventKind::WardStarting)
                .with_cycle(self.cycle)
                .with_delay(self.interval),
        );

        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                _ = ticker.tick() => match self.resource.poll().await {
                    Ok(unit) => {
                        self.bus.publish(
                            Event::now(EventKind::WorkRead)
                                .with_unit(unit.content)
                                .with_cycle(self.cycle),
                        );
                    }
                    Err(fault) => {
                        self.bus.publish(
                            Event::now(EventKind::ReadFailed)
                                .with_reason(fault.as_message())
                                .with_cycle(self.cycle),
                        );
                        self.send_fault(fault, &stop);
                    }
                },
            }
        }

        self.bus
            .publish(Event::now(EventKind::WardStopped).with_cycle(self.cycle));
        // Dropping `self` here drops the sender and closes the fault stream.
    }

    /// Delivers a fault without ever blocking.
    ///
    /// Drop order: stop already fired → discard silently; slot occupied →
    /// drop with diagnostic; receiver gone → drop with diagnostic.
    fn send_fault(&self, fault: Fault, stop: &CancellationToken) {
        if stop.is_cancelled() {
            return;
        }
        match self.faults.try_send(fault) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.bus.publish(
                    Event::now(EventKind::FaultDropped)
                        .with_reason("slot_full")
                        .with_cycle(self.cycle),
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.bus.publish(
                    Event::now(EventKind::FaultDropped)
                        .with_reason("no_listener")
                        .with_cycle(self.cycle),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Succeeds `ok_polls` times, then fails forever with the given fault.
    struct Scripted {
        ok_polls: u64,
        polls: Arc<AtomicU64>,
        fault: Fault,
    }

    #[async_trait]
    impl Resource for Scripted {
        async fn poll(&mut self) -> Result<crate::connect::WorkUnit, Fault> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            if n < self.ok_polls {
                Ok(crate::connect::WorkUnit::new(format!("unit-{n}")))
            } else {
                Err(self.fault.clone())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fault_reaches_the_stream() {
        let stop = CancellationToken::new();
        let bus = Bus::new(64);
        let polls = Arc::new(AtomicU64::new(0));
        let resource = Box::new(Scripted {
            ok_polls: 0,
            polls: polls.clone(),
            fault: Fault::Fatal { error: "boom".into() },
        });

        let (done, mut faults) =
            Ward::spawn(stop.clone(), resource, Duration::from_millis(10), bus, 1);

        let fault = faults.recv().await.expect("fault delivered");
        assert!(fault.is_fatal());

        stop.cancel();
        done.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ward_keeps_polling_after_failures() {
        let stop = CancellationToken::new();
        let bus = Bus::new(64);
        let polls = Arc::new(AtomicU64::new(0));
        let resource = Box::new(Scripted {
            ok_polls: 0,
            polls: polls.clone(),
            fault: Fault::Read { error: "noise".into() },
        });

        // Nobody drains the fault stream: the slot fills after the first
        // fault, further ones are dropped, and polling must continue anyway.
        let (done, _faults) =
            Ward::spawn(stop.clone(), resource, Duration::from_millis(10), bus, 1);

        tokio::time::sleep(Duration::from_millis(105)).await;
        assert!(polls.load(Ordering::SeqCst) >= 5);

        stop.cancel();
        done.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_closes_fault_stream() {
        let stop = CancellationToken::new();
        let bus = Bus::new(64);
        let resource = Box::new(Scripted {
            ok_polls: u64::MAX,
            polls: Arc::new(AtomicU64::new(0)),
            fault: Fault::Read { error: "unused".into() },
        });

        let (done, mut faults) =
            Ward::spawn(stop.clone(), resource, Duration::from_millis(10), bus, 1);

        stop.cancel();
        done.await.unwrap();
        // Sender dropped on exit: the stream must report closure.
        assert!(faults.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_reads_are_published() {
        let stop = CancellationToken::new();
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let resource = Box::new(Scripted {
            ok_polls: u64::MAX,
            polls: Arc::new(AtomicU64::new(0)),
            fault: Fault::Read { error: "unused".into() },
        });

        let (done, _faults) =
            Ward::spawn(stop.clone(), resource, Duration::from_millis(10), bus, 7);

        loop {
            let ev = rx.recv().await.unwrap();
            if ev.kind == EventKind::WorkRead {
                assert_eq!(ev.unit.as_deref(), Some("unit-0"));
                assert_eq!(ev.cycle, Some(7));
                break;
            }
        }

        stop.cancel();
        done.await.unwrap();
    }
}
