//! End-to-end supervision scenarios: healthy connections, fatal faults with
//! restart cycles, connect retries, and shutdown promptness.
//!
//! All tests run with a paused clock, so pulse-scale waits are deterministic
//! and instant. The instrumented provider records every acquire/release so
//! the tests can assert the teardown barrier: a connection is always
//! released before the next one is acquired.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time;
use tokio_util::sync::CancellationToken;

use connvisor::{
    Config, CycleStats, Fault, Provider, Resource, Steward, Subscribe, WorkUnit,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Acquire,
    Release,
}

/// Per-resource failure script.
#[derive(Clone, Copy)]
enum ReadScript {
    /// Every poll succeeds.
    Healthy,
    /// Polls 1..n succeed, poll n and later return a fatal fault.
    FatalOnPoll(u64),
    /// Each poll has a 1-in-4 chance of flipping permanently fatal
    /// (seeded, so runs are reproducible).
    FlakySeed(u64),
}

struct ScriptedResource {
    script: ReadScript,
    polls: u64,
    broken: bool,
    rng: StdRng,
}

#[async_trait]
impl Resource for ScriptedResource {
    async fn poll(&mut self) -> Result<WorkUnit, Fault> {
        self.polls += 1;
        match self.script {
            ReadScript::Healthy => Ok(WorkUnit::new(format!("unit-{}", self.polls))),
            ReadScript::FatalOnPoll(n) => {
                if self.polls >= n {
                    Err(Fault::Fatal {
                        error: "socket gone".into(),
                    })
                } else {
                    Ok(WorkUnit::new(format!("unit-{}", self.polls)))
                }
            }
            ReadScript::FlakySeed(_) => {
                if self.broken {
                    return Err(Fault::Fatal {
                        error: "stuck socket".into(),
                    });
                }
                if self.rng.random_range(0..4) == 3 {
                    self.broken = true;
                    return Err(Fault::Fatal {
                        error: "stuck socket".into(),
                    });
                }
                Ok(WorkUnit::new(format!("unit-{}", self.polls)))
            }
        }
    }
}

/// Provider that records the exact order of acquire/release calls.
struct ScriptedProvider {
    ops: Mutex<Vec<Op>>,
    script: ReadScript,
    connect_failures: AtomicUsize,
    seed_counter: AtomicUsize,
}

impl ScriptedProvider {
    fn new(script: ReadScript, connect_failures: usize) -> Arc<Self> {
        Arc::new(Self {
            ops: Mutex::new(Vec::new()),
            script,
            connect_failures: AtomicUsize::new(connect_failures),
            seed_counter: AtomicUsize::new(0),
        })
    }

    fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    fn acquires(&self) -> usize {
        self.ops().iter().filter(|op| **op == Op::Acquire).count()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn acquire(&self) -> Result<Box<dyn Resource>, Fault> {
        let failed = self
            .connect_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(Fault::Connect {
                error: "refused".into(),
            });
        }

        self.ops.lock().unwrap().push(Op::Acquire);
        let seed = match self.script {
            // Derive a distinct deterministic stream per acquired resource.
            ReadScript::FlakySeed(seed) => {
                seed + self.seed_counter.fetch_add(1, Ordering::SeqCst) as u64
            }
            _ => 0,
        };
        Ok(Box::new(ScriptedResource {
            script: self.script,
            polls: 0,
            broken: false,
            rng: StdRng::seed_from_u64(seed),
        }))
    }

    async fn release(&self) -> Result<(), Fault> {
        self.ops.lock().unwrap().push(Op::Release);
        Ok(())
    }
}

/// Lets the bus listener and subscriber workers drain.
///
/// With the clock paused, a sleep only elapses once every other task is
/// idle, so the counters are settled when it returns.
async fn quiesce() {
    time::sleep(Duration::from_millis(1)).await;
}

fn test_config() -> Config {
    Config {
        pulse: Duration::from_millis(100),
        grace: Duration::from_secs(5),
        ..Config::default()
    }
}

fn build(provider: Arc<ScriptedProvider>) -> (Arc<Steward>, CycleStats) {
    let stats = CycleStats::new();
    let steward = Steward::builder(test_config())
        .with_provider(provider)
        .with_subscribers(vec![Arc::new(stats.clone()) as Arc<dyn Subscribe>])
        .build();
    (steward, stats)
}

/// Every release must precede the next acquire: at no point are two wards
/// polling resources from the same steward.
fn assert_release_before_next_acquire(ops: &[Op]) {
    let mut open = 0usize;
    for op in ops {
        match op {
            Op::Acquire => {
                open += 1;
                assert!(open <= 1, "acquired a connection before releasing the previous one: {ops:?}");
            }
            Op::Release => {
                assert!(open == 1, "release without a matching acquire: {ops:?}");
                open -= 1;
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn healthy_connection_stops_only_on_stop() {
    let provider = ScriptedProvider::new(ReadScript::Healthy, 0);
    let (steward, stats) = build(provider.clone());

    let stop = CancellationToken::new();
    let (done, mut faults) = steward.spawn(stop.clone());

    time::sleep(Duration::from_secs(2)).await;
    assert!(!done.is_finished(), "done must not fire before stop");
    assert!(faults.try_recv().is_err(), "healthy run produces no faults");

    stop.cancel();
    done.await.unwrap();
    quiesce().await;

    let snap = stats.snapshot().await;
    assert_eq!(snap.restarts, 0);
    assert_eq!(snap.connect_failures, 0);
    assert!(snap.reads > 0, "ward read nothing in two seconds");

    let ops = provider.ops();
    assert_eq!(ops, vec![Op::Acquire, Op::Release]);
}

#[tokio::test(start_paused = true)]
async fn fatal_fault_triggers_exactly_one_restart_cycle() {
    // Fatal on the 4th poll of the first resource; replacements stay healthy
    // long enough for the test to stop them first.
    let provider = ScriptedProvider::new(ReadScript::FatalOnPoll(4), 0);
    let (steward, stats) = build(provider.clone());

    let stop = CancellationToken::new();
    let (done, mut faults) = steward.spawn(stop.clone());

    // The fault that forced the restart reaches the caller stream.
    let fault = faults.recv().await.unwrap();
    assert_eq!(fault.as_label(), "fault_fatal");

    // Wait for the first restart to complete: old ward joined, connection
    // released, replacement acquired.
    while provider.acquires() < 2 {
        time::sleep(Duration::from_millis(10)).await;
    }
    stop.cancel();
    done.await.unwrap();
    quiesce().await;

    let snap = stats.snapshot().await;
    assert!(snap.restarts >= 1);
    assert!(
        snap.reads >= 3,
        "three successful reads precede the 4th-poll fatal fault"
    );

    let ops = provider.ops();
    assert_release_before_next_acquire(&ops);
    assert_eq!(ops.iter().filter(|op| **op == Op::Acquire).count(), 2);
    assert_eq!(ops.iter().filter(|op| **op == Op::Release).count(), 2);
}

#[tokio::test(start_paused = true)]
async fn connect_retry_survives_initial_failures() {
    let provider = ScriptedProvider::new(ReadScript::Healthy, 2);
    let (steward, stats) = build(provider.clone());

    let stop = CancellationToken::new();
    let (done, mut faults) = steward.spawn(stop.clone());

    // Both failed attempts forward a connect fault (the receiver is drained
    // here, so neither hits the drop path).
    let first = faults.recv().await.unwrap();
    assert_eq!(first.as_label(), "fault_connect");
    let second = faults.recv().await.unwrap();
    assert_eq!(second.as_label(), "fault_connect");

    // The steward never gives up: a connection is eventually acquired.
    while provider.acquires() < 1 {
        time::sleep(Duration::from_millis(10)).await;
    }
    stop.cancel();
    done.await.unwrap();
    quiesce().await;

    let snap = stats.snapshot().await;
    assert_eq!(snap.connect_failures, 2);
    assert_eq!(snap.connects, 1);
}

#[tokio::test(start_paused = true)]
async fn stop_completes_done_within_one_pulse() {
    let provider = ScriptedProvider::new(ReadScript::Healthy, 0);
    let (steward, _stats) = build(provider.clone());

    let stop = CancellationToken::new();
    let (done, _faults) = steward.spawn(stop.clone());

    time::sleep(Duration::from_millis(500)).await;
    stop.cancel();
    time::timeout(Duration::from_millis(100), done)
        .await
        .expect("done must complete within one pulse of stop")
        .unwrap();

    // No acquisition happens after shutdown.
    let acquires = provider.acquires();
    time::sleep(Duration::from_secs(1)).await;
    assert_eq!(provider.acquires(), acquires);
}

#[tokio::test(start_paused = true)]
async fn repeated_restarts_never_overlap_wards() {
    // Seeded fault injection: each resource eventually flips fatal, forcing
    // restart cycle after restart cycle.
    let provider = ScriptedProvider::new(ReadScript::FlakySeed(7), 0);
    let (steward, stats) = build(provider.clone());

    let stop = CancellationToken::new();
    let (done, _faults) = steward.spawn(stop.clone());

    while stats.snapshot().await.restarts < 3 {
        time::sleep(Duration::from_millis(10)).await;
    }
    stop.cancel();
    done.await.unwrap();

    let ops = provider.ops();
    assert_release_before_next_acquire(&ops);
    assert!(provider.acquires() >= 3);
    // Fully drained teardown: every acquire has its release by the time
    // done resolves.
    assert_eq!(
        ops.iter().filter(|op| **op == Op::Acquire).count(),
        ops.iter().filter(|op| **op == Op::Release).count()
    );
}

#[tokio::test(start_paused = true)]
async fn unwatched_fault_stream_never_stalls_supervision() {
    // Two connect failures with the caller's receiver dropped: faults go to
    // the drop path and the retry loop keeps its cadence regardless.
    let provider = ScriptedProvider::new(ReadScript::Healthy, 2);
    let (steward, stats) = build(provider.clone());

    let stop = CancellationToken::new();
    let (done, faults) = steward.spawn(stop.clone());
    drop(faults);

    while provider.acquires() < 1 {
        time::sleep(Duration::from_millis(10)).await;
    }
    stop.cancel();
    done.await.unwrap();
    quiesce().await;

    let snap = stats.snapshot().await;
    assert_eq!(snap.connect_failures, 2);
    assert_eq!(snap.faults_dropped, 2, "undelivered faults are dropped, not queued");
    assert_eq!(snap.connects, 1);
}
