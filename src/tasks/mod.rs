//! # Work abstractions.
//!
//! This module provides the unit-of-work types:
//! - [`Work`] - trait for the async work a timer runs every cycle
//! - [`WorkFn`] - function-backed implementation

mod work;
mod work_fn;

pub use work::Work;
pub use work_fn::WorkFn;
