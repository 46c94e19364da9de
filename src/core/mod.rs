//! Runtime core: scheduling, timeouts and lifecycle.
//!
//! The public API from this module is [`TimerTask`] (with its builder and
//! configuration) and the [`Outcome`] record handed to observers.
//!
//! Internal modules:
//! - [`scheduler`]: the recurring wait → run → notify loop;
//! - [`runner`]: one cycle, racing the invocation against the watchdog;
//! - [`invocation`]: runs the work on its own abortable task;
//! - [`watchdog`]: single-shot timeout timer;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod config;
mod invocation;
mod outcome;
mod runner;
mod scheduler;
mod shutdown;
mod timer;
mod watchdog;

pub use builder::TimerTaskBuilder;
pub use config::{EXECUTION_INTERVAL, TIMEOUT_INTERVAL, TimerConfig};
pub use outcome::Outcome;
pub use timer::TimerTask;
