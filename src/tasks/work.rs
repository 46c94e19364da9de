//! # Work abstraction.
//!
//! This module defines the [`Work`] trait: the unit of work a
//! [`TimerTask`](crate::TimerTask) runs once per cycle.
//!
//! Unlike a cooperative task, `Work` receives no cancellation token. The
//! runtime terminates an overrunning run by aborting the Tokio task it runs
//! on, so implementations never have to check for cancellation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;

/// # Asynchronous unit of work executed on every cycle.
///
/// `execute` receives the fixed call arguments configured on the timer, in
/// the order they were supplied, and returns either a value or a [`TaskError`].
///
/// ### Forced termination
/// A run that exceeds the timeout interval (or is killed) is aborted: its
/// future is dropped at the current `.await` point. Values owned by the
/// future are dropped normally, but an operation in progress is abandoned
/// midway. Code that blocks the executor thread without yielding cannot be
/// preempted; move such work to `tokio::task::spawn_blocking` and accept
/// that the blocking thread itself runs to completion.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use timervisor::{TaskError, Work};
///
/// struct Sum;
///
/// #[async_trait]
/// impl Work for Sum {
///     type Arg = u64;
///     type Output = u64;
///
///     fn name(&self) -> &str { "sum" }
///
///     async fn execute(&self, args: Arc<[u64]>) -> Result<u64, TaskError> {
///         Ok(args.iter().sum())
///     }
/// }
/// ```
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Type of the fixed call arguments.
    type Arg: Send + Sync + 'static;
    /// Value produced by a successful run.
    type Output: Send + Sync + 'static;

    /// Returns a stable, human-readable name (used in events and logs).
    fn name(&self) -> &str;

    /// Executes one run with the configured call arguments.
    async fn execute(&self, args: Arc<[Self::Arg]>) -> Result<Self::Output, TaskError>;
}
