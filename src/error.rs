//! Error types used by the timer runtime and by the scheduled work.
//!
//! This module defines two main error enums:
//!
//! - [`TimerError`] — errors raised by the timer itself (construction, lifecycle).
//! - [`TaskError`] — errors produced by a single run of the work.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! Only [`TimerError`] is ever returned to a caller; every [`TaskError`] is
//! delivered to observers as part of an [`Outcome`](crate::Outcome).

use std::any::Any;
use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the timer runtime.
///
/// These represent failures of the timer itself, never of a single run.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// No unit of work was supplied at construction.
    ///
    /// Returned before any task or timer is spawned.
    #[error("no task definition: a unit of work must be supplied")]
    MissingTask,

    /// `start` was called while the scheduler loop is still running.
    #[error("timer {name:?} is already running")]
    AlreadyRunning {
        /// Name of the timer.
        name: String,
    },

    /// OS signal listeners could not be registered.
    #[error("failed to listen for shutdown signals: {reason}")]
    Signal {
        /// The underlying I/O error message.
        reason: String,
    },
}

impl TimerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use timervisor::TimerError;
    ///
    /// assert_eq!(TimerError::MissingTask.as_label(), "timer_missing_task");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TimerError::MissingTask => "timer_missing_task",
            TimerError::AlreadyRunning { .. } => "timer_already_running",
            TimerError::Signal { .. } => "timer_signal_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TimerError::MissingTask => "missing task definition".to_string(),
            TimerError::AlreadyRunning { name } => format!("already running: {name}"),
            TimerError::Signal { reason } => format!("signal listener: {reason}"),
        }
    }
}

/// # Errors produced by a single run of the work.
///
/// Captured at the invocation boundary and handed to observers; the
/// scheduler loop keeps going regardless of how many runs fail in a row.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The run exceeded the timeout interval and was forcibly terminated.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout interval that was exceeded.
        timeout: Duration,
    },

    /// The work returned an error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The work panicked; the panic was caught at the invocation boundary.
    #[error("execution panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },

    /// The run's task was cancelled by the runtime itself (runtime shutdown).
    ///
    /// Timeouts and kills never produce this variant: a timeout is reported
    /// as [`TaskError::Timeout`] and a killed run has no outcome at all.
    #[error("execution cancelled")]
    Canceled,
}

impl TaskError {
    /// Convenience constructor for [`TaskError::Fail`].
    ///
    /// # Example
    /// ```
    /// use timervisor::TaskError;
    ///
    /// let err = TaskError::fail("connection refused");
    /// assert_eq!(err.to_string(), "execution failed: connection refused");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use timervisor::TaskError;
    /// use std::time::Duration;
    ///
    /// let err = TaskError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "task_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Timeout { .. } => "task_timeout",
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
            TaskError::Canceled => "cancelled".to_string(),
        }
    }

    /// Returns `true` if the run was terminated by the watchdog.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TaskError::Timeout { .. })
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
