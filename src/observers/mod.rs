//! # Outcome observers.
//!
//! This module provides the [`Observe`] trait and the fan-out that delivers
//! every [`Outcome`](crate::Outcome) to the registered observers.
//!
//! ## Architecture
//! ```text
//! Scheduler ── emit(Arc<Outcome>) ──► ObserverSet ──► per-observer queue
//!                                                        │
//!                                                        ├──► Observe::notify(at, value, error)
//!                                                        │         │
//!                                                        │    ┌────┴────┬─────────┐
//!                                                        │    ▼         ▼         ▼
//!                                                        │  LogWriter  Alerts   Custom
//!                                                        │
//!                                                        └──► panic/overflow → Bus events
//! ```

#[cfg(feature = "logging")]
mod log;
mod observer;
mod set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observer::Observe;
pub(crate) use set::ObserverSet;
pub use set::ObserverId;
