//! # Timer configuration.
//!
//! Provides [`TimerConfig`], the construction-time settings of a
//! [`TimerTask`](crate::TimerTask), and the named defaults
//! [`EXECUTION_INTERVAL`] and [`TIMEOUT_INTERVAL`].
//!
//! The unit of work and its call arguments are supplied through
//! [`TimerTaskBuilder`](crate::TimerTaskBuilder), because their types depend
//! on the work.
//!
//! ## Intervals
//! No relationship between `execution_interval` and `timeout_interval` is
//! enforced. A timeout longer than the execution interval is accepted as is;
//! keeping the timeout at or below the interval is the caller's
//! responsibility.

use std::time::Duration;

/// Default wait between the end of one run and the start of the next.
pub const EXECUTION_INTERVAL: Duration = Duration::from_secs(60);

/// Default maximum duration of a single run.
pub const TIMEOUT_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration of a timer task.
///
/// ## Field semantics
/// - `execution_interval`: wait between the end of a run and the start of the next
/// - `timeout_interval`: a run still going after this long is aborted
/// - `run_now`: fire the first run immediately instead of waiting one interval
/// - `event_capacity`: lifecycle event bus ring buffer size (min 1; clamped)
#[derive(Clone, Debug)]
pub struct TimerConfig {
    /// Wait between runs (measured from the end of the previous run).
    pub execution_interval: Duration,

    /// Maximum duration of a single run.
    ///
    /// When exceeded, the run is forcibly terminated and observers receive
    /// [`TaskError::Timeout`](crate::TaskError::Timeout).
    pub timeout_interval: Duration,

    /// Skip the wait before the first run.
    pub run_now: bool,

    /// Capacity of the lifecycle event bus.
    ///
    /// Slow receivers that lag behind more than `event_capacity` events
    /// observe `Lagged` and skip older items.
    pub event_capacity: usize,
}

impl TimerConfig {
    /// Returns a config with the given intervals and all other fields defaulted.
    pub fn with_intervals(execution_interval: Duration, timeout_interval: Duration) -> Self {
        Self {
            execution_interval,
            timeout_interval,
            ..Self::default()
        }
    }

    /// Returns an event bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn event_capacity_clamped(&self) -> usize {
        self.event_capacity.max(1)
    }
}

impl Default for TimerConfig {
    /// Default configuration:
    ///
    /// - `execution_interval = EXECUTION_INTERVAL` (60s)
    /// - `timeout_interval = TIMEOUT_INTERVAL` (30s)
    /// - `run_now = false`
    /// - `event_capacity = 256`
    fn default() -> Self {
        Self {
            execution_interval: EXECUTION_INTERVAL,
            timeout_interval: TIMEOUT_INTERVAL,
            run_now: false,
            event_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_named_constants() {
        let cfg = TimerConfig::default();
        assert_eq!(cfg.execution_interval, EXECUTION_INTERVAL);
        assert_eq!(cfg.timeout_interval, TIMEOUT_INTERVAL);
        assert!(!cfg.run_now);
    }

    #[test]
    fn explicit_intervals_are_kept_exactly() {
        let cfg = TimerConfig::with_intervals(Duration::from_millis(1500), Duration::from_secs(90));
        assert_eq!(cfg.execution_interval, Duration::from_millis(1500));
        // A timeout above the execution interval is accepted.
        assert_eq!(cfg.timeout_interval, Duration::from_secs(90));
    }

    #[test]
    fn event_capacity_is_clamped() {
        let cfg = TimerConfig {
            event_capacity: 0,
            ..TimerConfig::default()
        };
        assert_eq!(cfg.event_capacity_clamped(), 1);
    }
}
