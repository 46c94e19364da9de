//! Lifecycle events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the scheduler loop, `runner::run_once`, `TimerTask`
//!   lifecycle calls, and `ObserverSet` workers (overflow/panic).
//! - **Consumers**: anything holding a receiver from `TimerTask::subscribe()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
