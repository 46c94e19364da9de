//! # Outcome of one cycle.
//!
//! An [`Outcome`] is built by the scheduler loop once a run resolves (value,
//! error, panic, or timeout) and handed to every observer behind an `Arc`.
//! The value and the error are stored as a single `Result`, so an outcome
//! can never carry both.

use std::time::SystemTime;

use crate::error::TaskError;

/// Immutable result record of one cycle.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    cycle: u64,
    at: SystemTime,
    result: Result<T, TaskError>,
}

impl<T> Outcome<T> {
    /// Builds an outcome stamped with the current wall-clock time.
    pub fn new(cycle: u64, result: Result<T, TaskError>) -> Self {
        Self {
            cycle,
            at: SystemTime::now(),
            result,
        }
    }

    /// Cycle number (starting from 1).
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Time the run concluded.
    pub fn at(&self) -> SystemTime {
        self.at
    }

    /// Value returned by the work; `None` on error or timeout.
    pub fn value(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    /// Error of the run; `None` on success.
    pub fn error(&self) -> Option<&TaskError> {
        self.result.as_ref().err()
    }

    /// Borrowed view of the underlying result.
    pub fn result(&self) -> Result<&T, &TaskError> {
        self.result.as_ref()
    }

    /// Consumes the outcome and returns the underlying result.
    pub fn into_result(self) -> Result<T, TaskError> {
        self.result
    }

    /// Returns `true` if the run produced a value.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn value_and_error_are_exclusive() {
        let ok = Outcome::new(1, Ok::<_, TaskError>(42));
        assert_eq!(ok.value(), Some(&42));
        assert!(ok.error().is_none());
        assert!(ok.is_success());

        let timeout = TaskError::Timeout {
            timeout: Duration::from_secs(1),
        };
        let err = Outcome::<u32>::new(2, Err(timeout.clone()));
        assert!(err.value().is_none());
        assert_eq!(err.error(), Some(&timeout));
        assert_eq!(err.cycle(), 2);
    }
}
