//! # Outcome observer trait.
//!
//! Provides [`Observe`], the extension point through which callers learn
//! about every run: success value, returned error, panic, or timeout.
//!
//! Each observer gets:
//! - **Dedicated worker task** (runs independently of the scheduler loop)
//! - **Per-observer bounded queue** (capacity via [`Observe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as `EventKind::ObserverPanicked`)
//!
//! ## Rules
//! - A slow observer only affects its own queue.
//! - Queue overflow drops the outcome **for this observer only** and publishes
//!   `EventKind::ObserverOverflow`.
//! - Outcomes are processed sequentially (FIFO) per observer.
//!
//! ## Example
//! ```rust
//! use std::time::SystemTime;
//! use async_trait::async_trait;
//! use timervisor::{Observe, TaskError};
//!
//! struct Alerts;
//!
//! #[async_trait]
//! impl Observe<u64> for Alerts {
//!     async fn notify(&self, _at: SystemTime, _value: Option<&u64>, error: Option<&TaskError>) {
//!         if let Some(err) = error {
//!             eprintln!("health check failed: {err}");
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "alerts" }
//! }
//! ```

use std::time::SystemTime;

use async_trait::async_trait;

use crate::error::TaskError;

/// Observer of run outcomes.
///
/// Exactly one of `value` and `error` is `Some` on every call.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; a panic is caught but the outcome is lost for this observer.
#[async_trait]
pub trait Observe<T>: Send + Sync + 'static
where
    T: Send + Sync + 'static,
{
    /// Handles the outcome of one run.
    ///
    /// Called from a dedicated worker task, never from the scheduler loop.
    async fn notify(&self, at: SystemTime, value: Option<&T>, error: Option<&TaskError>);

    /// Returns the observer name used in logs and overflow/panic events.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this observer.
    ///
    /// The runtime clamps capacity to a minimum of 1.
    ///
    /// Default: 64.
    fn queue_capacity(&self) -> usize {
        64
    }
}
