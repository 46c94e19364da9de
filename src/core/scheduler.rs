//! # Scheduler: the recurring loop behind a timer task.
//!
//! Drives one unit of [`Work`] forever: wait, run under a watchdog, hand the
//! outcome to observers, repeat.
//!
//! ## Architecture
//! ```text
//! TimerTask::start() ──► Scheduler::run(stop, kill)
//!
//! loop {
//!   ├─► stop requested? ─► exit
//!   ├─► first cycle && run_now? ─► skip wait
//!   │     else publish CycleScheduled, sleep(execution_interval) (cancellable by stop/kill)
//!   ├─► stop requested? ─► exit
//!   ├─► publish ExecutionStarting
//!   ├─► run_once(work, args, timeout_interval, kill)
//!   │       ├─ Completed(outcome) ─► observers.emit(outcome)
//!   │       └─ Killed             ─► exit
//!   └─► repeat
//! }
//! publish TimerStopped
//! ```
//!
//! ## Rules
//! - Runs are **sequential**: cycle N+1 never starts before cycle N has resolved
//!   and its outcome has been queued for every observer.
//! - The wait is measured from the end of the previous run, so slow runs push the schedule back.
//! - Stop lets the current run finish; kill aborts it. Both interrupt the wait.
//! - Intervals are re-read every cycle, so setter changes apply from the next wait/run.
//! - The cycle counter lives in [`Shared`] and keeps counting across restarts.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    core::runner::{Resolution, run_once},
    events::{Bus, Event, EventKind},
    observers::ObserverSet,
    tasks::Work,
};

/// Current wait and timeout; adjustable while the timer runs.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Intervals {
    pub execution: Duration,
    pub timeout: Duration,
}

/// State shared between a [`TimerTask`](crate::TimerTask) handle and its loop.
pub(crate) struct Shared<W: Work> {
    pub name: Arc<str>,
    pub work: Arc<W>,
    pub args: Arc<[W::Arg]>,
    pub run_now: bool,
    pub intervals: RwLock<Intervals>,
    pub observers: ObserverSet<W::Output>,
    pub bus: Bus,
    pub cycles: AtomicU64,
}

/// Runs the recurring loop for one timer.
pub(crate) struct Scheduler<W: Work> {
    shared: Arc<Shared<W>>,
}

impl<W: Work> Scheduler<W> {
    pub fn new(shared: Arc<Shared<W>>) -> Self {
        Self { shared }
    }

    /// Runs until `stop` or `kill` is cancelled.
    ///
    /// `stop` must be a child of `kill` (a kill also stops the loop).
    ///
    /// ### Cancellation semantics
    /// - `stop` is checked before every wait and before every run, and
    ///   interrupts the wait; a run in progress is allowed to finish and its
    ///   outcome is delivered.
    /// - `kill` additionally aborts a run in progress; no outcome is
    ///   delivered for that cycle.
    pub async fn run(self, stop: CancellationToken, kill: CancellationToken) {
        let s = &*self.shared;
        s.bus
            .publish(Event::new(EventKind::TimerStarted).with_timer(Arc::clone(&s.name)));
        tracing::debug!(timer = &*s.name, run_now = s.run_now, "timer started");

        let mut first = true;
        loop {
            if stop.is_cancelled() {
                break;
            }
            let cycle = s.cycles.load(Ordering::Acquire) + 1;

            if !(first && s.run_now) {
                let wait = s.intervals.read().execution;
                s.bus.publish(
                    Event::new(EventKind::CycleScheduled)
                        .with_timer(Arc::clone(&s.name))
                        .with_cycle(cycle)
                        .with_delay(wait),
                );

                let sleep = time::sleep(wait);
                tokio::pin!(sleep);
                select! {
                    biased;
                    _ = stop.cancelled() => { break; }
                    _ = &mut sleep => {}
                }
            }
            first = false;

            if stop.is_cancelled() {
                break;
            }
            s.cycles.store(cycle, Ordering::Release);
            let timeout = s.intervals.read().timeout;

            tracing::debug!(timer = &*s.name, cycle, ?timeout, "run starting");
            s.bus.publish(
                Event::new(EventKind::ExecutionStarting)
                    .with_timer(Arc::clone(&s.name))
                    .with_cycle(cycle),
            );

            match run_once(&s.name, &s.work, &s.args, timeout, &kill, cycle, &s.bus).await {
                Resolution::Completed(outcome) => s.observers.emit(Arc::new(outcome)),
                Resolution::Killed => break,
            }
        }

        let mut stopped = Event::new(EventKind::TimerStopped).with_timer(Arc::clone(&s.name));
        let last = s.cycles.load(Ordering::Acquire);
        if last > 0 {
            stopped = stopped.with_cycle(last);
        }
        s.bus.publish(stopped);
        tracing::debug!(timer = &*s.name, cycles = last, "timer stopped");
    }
}
