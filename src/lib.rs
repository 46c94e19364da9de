//! # timervisor
//!
//! **Timervisor** runs a unit of async work on a fixed interval, caps how long
//! each run may take, and reports every outcome to registered observers.
//!
//! It is a building block for background maintenance (health checks, cache
//! refresh, periodic flush) where you need both "run every N seconds" and
//! "never let one run hang the process".
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   TimerConfig + Work + call args
//!                │
//!                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TimerTask (handle: start / stop / kill)                          │
//! │  - Bus (broadcast lifecycle events)                               │
//! │  - ObserverSet (fans out outcomes to observers)                   │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        ▼
//!  ┌──────────────┐        one cycle         ┌────────────────────────┐
//!  │  Scheduler   │ ───────────────────────► │ Invocation ‖ Watchdog  │
//!  │ (wait loop)  │ ◄─────── Outcome ─────── │ (own tasks, abortable) │
//!  └──────┬───────┘                          └────────────────────────┘
//!         ▼
//!   ObserverSet ──► [queue] ──► worker ──► observer.notify(at, value, error)
//! ```
//!
//! ### Lifecycle
//! ```text
//! loop {
//!   ├─► wait execution_interval (skipped on the first cycle when run_now)
//!   ├─► spawn Invocation(work, call_args)  ‖  arm Watchdog(timeout_interval)
//!   │       │
//!   │       ├─ run resolves first  ─► cancel watchdog ─► Outcome(value | error)
//!   │       ├─ watchdog fires first ─► abort run      ─► Outcome(TaskError::Timeout)
//!   │       └─ kill requested       ─► abort run      ─► exit (no outcome)
//!   │
//!   ├─► emit Outcome to every observer
//!   └─► exit if stop requested
//! }
//! ```
//!
//! ## Forced termination
//! Runs are terminated by aborting the Tokio task they execute on; the work
//! never has to check a cancellation flag. The future is dropped at its
//! current `.await` point, which releases memory and runs destructors but
//! abandons any operation in progress. Work that blocks the executor thread
//! without yielding cannot be preempted.
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                     |
//! |-------------------|--------------------------------------------------------------|----------------------------------------|
//! | **Timer**         | Recurring runs with timeout, stop and kill.                  | [`TimerTask`], [`TimerTaskBuilder`]    |
//! | **Work**          | Define the unit of work as a trait impl or a closure.        | [`Work`], [`WorkFn`]                   |
//! | **Observers**     | Receive every outcome (value, error, timeout).               | [`Observe`], [`Outcome`]               |
//! | **Events**        | Lifecycle events for diagnostics and metrics.                | [`Event`], [`EventKind`]               |
//! | **Errors**        | Typed errors for construction and for individual runs.       | [`TimerError`], [`TaskError`]          |
//! | **Configuration** | Intervals, run-now flag and named defaults.                  | [`TimerConfig`]                        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] observer _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::{Duration, SystemTime};
//! use async_trait::async_trait;
//! use timervisor::{Observe, TaskError, TimerConfig, TimerTask, WorkFn};
//!
//! struct Print;
//!
//! #[async_trait]
//! impl Observe<usize> for Print {
//!     async fn notify(&self, _at: SystemTime, value: Option<&usize>, error: Option<&TaskError>) {
//!         match (value, error) {
//!             (Some(v), _) => println!("cache holds {v} entries"),
//!             (_, Some(e)) => println!("refresh failed: {e}"),
//!             _ => {}
//!         }
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = TimerConfig::default();
//!     cfg.execution_interval = Duration::from_millis(100);
//!     cfg.timeout_interval = Duration::from_millis(50);
//!     cfg.run_now = true;
//!
//!     let refresh = WorkFn::arc("cache-refresh", |sources: Arc<[&'static str]>| async move {
//!         Ok::<_, TaskError>(sources.len())
//!     });
//!
//!     let timer = TimerTask::builder(cfg)
//!         .with_work(refresh)
//!         .with_args(["db", "disk"])
//!         .with_observer(Arc::new(Print))
//!         .start()
//!         .await?;
//!
//!     tokio::time::sleep(Duration::from_millis(250)).await;
//!     timer.stop().await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod observers;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{
    EXECUTION_INTERVAL, Outcome, TIMEOUT_INTERVAL, TimerConfig, TimerTask, TimerTaskBuilder,
};
pub use error::{TaskError, TimerError};
pub use events::{Event, EventKind};
pub use observers::{Observe, ObserverId};
pub use tasks::{Work, WorkFn};

// Optional: expose a simple built-in outcome printer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
