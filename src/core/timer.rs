//! # TimerTask: recurring work with a per-run timeout.
//!
//! A [`TimerTask`] owns one unit of [`Work`], its call arguments, the
//! observers, and the lifecycle of the scheduler loop that drives them.
//!
//! ## Lifecycle
//! ```text
//!            start()                   stop() / kill()
//! Stopped ─────────────► Running ──────────────────────► Stopped
//!    ▲                      │
//!    └──── drop() ──────────┘ (kills loop and in-flight run)
//! ```
//!
//! - [`start`](TimerTask::start) spawns the loop; fails with
//!   [`TimerError::AlreadyRunning`] if it is still running.
//! - [`stop`](TimerTask::stop) is graceful: a run in progress finishes and its
//!   outcome is delivered, then the loop exits. Waits up to one timeout interval.
//!   A `kill()` issued meanwhile still aborts the run.
//! - [`kill`](TimerTask::kill) is forced: a run in progress is aborted
//!   immediately and the loop exits.
//! - A stopped timer can be started again; cycle numbers keep counting.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use timervisor::{TaskError, TimerConfig, TimerTask, WorkFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = TimerConfig {
//!         execution_interval: Duration::from_millis(50),
//!         timeout_interval: Duration::from_millis(20),
//!         run_now: true,
//!         ..TimerConfig::default()
//!     };
//!
//!     let timer = TimerTask::builder(cfg)
//!         .with_work(WorkFn::arc("probe", |args: Arc<[u16]>| async move {
//!             Ok::<_, TaskError>(args[0])
//!         }))
//!         .with_args([8080])
//!         .start()
//!         .await?;
//!
//!     tokio::time::sleep(Duration::from_millis(120)).await;
//!     assert!(timer.kill().await);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::{
    sync::{Mutex, broadcast},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use super::{
    builder::TimerTaskBuilder,
    config::TimerConfig,
    scheduler::{Scheduler, Shared},
    shutdown,
};
use crate::{
    error::TimerError,
    events::{Event, EventKind},
    observers::{Observe, ObserverId},
    tasks::Work,
};

/// Handle to a running scheduler loop.
///
/// Stays in the slot until the loop has exited, so a pending graceful stop
/// can still be escalated to a kill.
struct Running {
    /// Forced stop; parent of `stop`.
    kill: CancellationToken,
    /// Graceful stop.
    stop: CancellationToken,
    /// Cancelled once the loop task has exited (normally, by panic or abort).
    done: CancellationToken,
    join: JoinHandle<()>,
}

impl Running {
    fn is_live(&self) -> bool {
        !self.done.is_cancelled()
    }
}

/// Recurring unit of work with a per-run timeout and outcome observers.
pub struct TimerTask<W: Work> {
    shared: Arc<Shared<W>>,
    running: Mutex<Option<Running>>,
}

impl<W: Work> TimerTask<W> {
    /// Returns a builder for a timer with the given configuration.
    pub fn builder(cfg: TimerConfig) -> TimerTaskBuilder<W> {
        TimerTaskBuilder::new(cfg)
    }

    pub(crate) fn from_shared(shared: Arc<Shared<W>>) -> Self {
        Self {
            shared,
            running: Mutex::new(None),
        }
    }

    /// Timer name (used in events and logs).
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Current wait between runs.
    pub fn execution_interval(&self) -> Duration {
        self.shared.intervals.read().execution
    }

    /// Changes the wait between runs, starting with the next wait.
    pub fn set_execution_interval(&self, interval: Duration) {
        self.shared.intervals.write().execution = interval;
    }

    /// Current maximum duration of a run.
    pub fn timeout_interval(&self) -> Duration {
        self.shared.intervals.read().timeout
    }

    /// Changes the maximum duration of a run, starting with the next run.
    ///
    /// Not validated against the execution interval.
    pub fn set_timeout_interval(&self, timeout: Duration) {
        self.shared.intervals.write().timeout = timeout;
    }

    /// Whether the first run skips the initial wait.
    pub fn run_now(&self) -> bool {
        self.shared.run_now
    }

    /// Fixed call arguments passed to every run.
    pub fn call_args(&self) -> &[W::Arg] {
        &self.shared.args
    }

    /// Number of runs started so far (across restarts).
    pub fn cycles(&self) -> u64 {
        self.shared.cycles.load(Ordering::Acquire)
    }

    /// Registers an outcome observer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn add_observer(&self, observer: Arc<dyn Observe<W::Output>>) -> ObserverId {
        self.shared.observers.add(observer)
    }

    /// Unregisters an observer; returns `false` if the id is unknown.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.shared.observers.remove(id)
    }

    /// Unregisters every observer, returning how many were removed.
    pub fn clear_observers(&self) -> usize {
        self.shared.observers.clear()
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.shared.observers.len()
    }

    /// Subscribes to lifecycle [`Event`]s published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }

    /// Returns `true` while the scheduler loop is running.
    pub async fn is_running(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(Running::is_live)
    }

    /// Spawns the scheduler loop.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn start(&self) -> Result<(), TimerError> {
        self.reap().await;

        let mut running = self.running.lock().await;
        if running.as_ref().is_some_and(Running::is_live) {
            return Err(TimerError::AlreadyRunning {
                name: self.name().to_string(),
            });
        }

        let kill = CancellationToken::new();
        let stop = kill.child_token();
        let done = CancellationToken::new();
        let scheduler = Scheduler::new(Arc::clone(&self.shared));
        let guard = done.clone().drop_guard();
        let join = tokio::spawn({
            let (stop, kill) = (stop.clone(), kill.clone());
            async move {
                let _done = guard;
                scheduler.run(stop, kill).await;
            }
        });

        *running = Some(Running {
            kill,
            stop,
            done,
            join,
        });
        Ok(())
    }

    /// Stops the loop gracefully and waits for it to exit.
    ///
    /// A run in progress finishes (or times out) and its outcome is
    /// delivered first. A [`kill`](Self::kill) issued while this waits
    /// aborts that run. Returns `false` if the timer was not running.
    pub async fn stop(&self) -> bool {
        self.shutdown(EventKind::StopRequested, false).await
    }

    /// Stops the loop immediately, aborting a run in progress.
    ///
    /// No outcome is delivered for an aborted run. Returns `false` if the
    /// timer was not running.
    pub async fn kill(&self) -> bool {
        self.shutdown(EventKind::KillRequested, true).await
    }

    /// Starts the timer (if needed) and keeps it running until the process
    /// receives a termination signal, then stops it gracefully.
    pub async fn run_until_shutdown(&self) -> Result<(), TimerError> {
        match self.start().await {
            Ok(()) | Err(TimerError::AlreadyRunning { .. }) => {}
            Err(e) => return Err(e),
        }

        let waited = shutdown::wait_for_shutdown_signal().await;
        self.stop().await;
        waited.map_err(|e| TimerError::Signal {
            reason: e.to_string(),
        })
    }

    fn publish(&self, kind: EventKind) {
        self.shared
            .bus
            .publish(Event::new(kind).with_timer(Arc::clone(&self.shared.name)));
    }

    /// Cancels `kill` (forced) or `stop` and waits for the loop to exit.
    ///
    /// The slot lock is released before waiting.
    async fn shutdown(&self, kind: EventKind, force: bool) -> bool {
        let done = {
            let running = self.running.lock().await;
            let Some(r) = running.as_ref().filter(|r| r.is_live()) else {
                return false;
            };
            self.publish(kind);
            if force {
                r.kill.cancel();
            } else {
                r.stop.cancel();
            }
            r.done.clone()
        };

        done.cancelled().await;
        self.reap().await;
        true
    }

    /// Takes an exited loop out of the slot and logs an abnormal end.
    async fn reap(&self) {
        let exited = {
            let mut running = self.running.lock().await;
            if running.as_ref().is_some_and(|r| !r.is_live()) {
                running.take()
            } else {
                None
            }
        };
        let Some(r) = exited else {
            return;
        };
        if let Err(e) = r.join.await {
            tracing::error!(timer = self.name(), error = %e, "scheduler loop ended abnormally");
        }
    }
}

impl<W: Work> Drop for TimerTask<W> {
    fn drop(&mut self) {
        if let Some(r) = self.running.get_mut().take() {
            r.kill.cancel();
            r.join.abort();
        }
    }
}
