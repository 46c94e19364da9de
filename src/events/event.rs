//! # Lifecycle events emitted by the scheduler loop and the observer fan-out.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Timer events**: loop lifecycle (started, stop/kill requested, stopped)
//! - **Cycle events**: one run of the work (scheduled, starting, succeeded, failed, timeout, killed)
//! - **Observer events**: fan-out problems (panicked, overflow)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! timer name, cycle number, reasons, and delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use timervisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TimeoutHit)
//!     .with_timer("health-check")
//!     .with_cycle(3)
//!     .with_timeout(Duration::from_secs(5));
//!
//! assert_eq!(ev.kind, EventKind::TimeoutHit);
//! assert_eq!(ev.timer.as_deref(), Some("health-check"));
//! assert_eq!(ev.timeout_ms, Some(5_000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Timer events ===
    /// Scheduler loop started.
    ///
    /// Sets:
    /// - `timer`: timer name
    TimerStarted,

    /// Graceful stop requested; the current cycle is allowed to finish.
    ///
    /// Sets:
    /// - `timer`: timer name
    StopRequested,

    /// Forced stop requested; the in-flight run is aborted.
    ///
    /// Sets:
    /// - `timer`: timer name
    KillRequested,

    /// Scheduler loop exited.
    ///
    /// Sets:
    /// - `timer`: timer name
    /// - `cycle`: last cycle number (if any run happened)
    TimerStopped,

    // === Cycle events ===
    /// Loop is waiting before the next run.
    ///
    /// Sets:
    /// - `timer`: timer name
    /// - `cycle`: number of the upcoming cycle
    /// - `delay_ms`: wait before the run (ms)
    CycleScheduled,

    /// A run is starting.
    ///
    /// Sets:
    /// - `timer`: timer name
    /// - `cycle`: cycle number (1-based)
    ExecutionStarting,

    /// The work returned a value.
    ///
    /// Sets:
    /// - `timer`: timer name
    /// - `cycle`: cycle number
    ExecutionSucceeded,

    /// The work returned an error, panicked, or timed out.
    ///
    /// Sets:
    /// - `timer`: timer name
    /// - `cycle`: cycle number
    /// - `reason`: failure message
    ExecutionFailed,

    /// The watchdog fired before the work resolved; the run was aborted.
    ///
    /// Always followed by `ExecutionFailed`.
    ///
    /// Sets:
    /// - `timer`: timer name
    /// - `cycle`: cycle number
    /// - `timeout_ms`: configured timeout interval (ms)
    TimeoutHit,

    /// The in-flight run was aborted by a kill request.
    ///
    /// No outcome is delivered for this cycle.
    ///
    /// Sets:
    /// - `timer`: timer name
    /// - `cycle`: cycle number
    WorkerKilled,

    // === Observer events ===
    /// Observer panicked while handling an outcome.
    ///
    /// Sets:
    /// - `timer`: observer name
    /// - `reason`: panic info/message
    ObserverPanicked,

    /// Observer dropped an outcome (queue full or worker closed).
    ///
    /// Sets:
    /// - `timer`: observer name
    /// - `reason`: reason string (e.g., "full", "closed")
    ObserverOverflow,
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

    /// Name of the timer (or of the observer, for observer events).
    pub timer: Option<Arc<str>>,
    /// Cycle number (starting from 1).
    pub cycle: Option<u64>,
    /// Timeout interval in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Wait before the next run in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            timer: None,
            cycle: None,
            timeout_ms: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a timer name.
    #[inline]
    pub fn with_timer(mut self, timer: impl Into<Arc<str>>) -> Self {
        self.timer = Some(timer.into());
        self
    }

    /// Attaches a cycle number.
    #[inline]
    pub fn with_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    /// Creates an observer overflow event.
    #[inline]
    pub fn observer_overflow(observer: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::ObserverOverflow)
            .with_timer(observer)
            .with_reason(format!("observer={observer} reason={reason}"))
    }

    /// Creates an observer panic event.
    #[inline]
    pub fn observer_panicked(observer: &'static str, info: String) -> Self {
        Event::new(EventKind::ObserverPanicked)
            .with_timer(observer)
            .with_reason(info)
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}
