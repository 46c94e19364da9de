//! # Run a single cycle of the work.
//!
//! Races one [`Invocation`] against one [`Watchdog`] (and the kill token),
//! publishes lifecycle events to [`Bus`], and turns the winner into an
//! [`Outcome`].
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   invocation → Ok(v)   → cancel watchdog → publish ExecutionSucceeded
//!
//! Failure:
//!   invocation → Err(e)  → cancel watchdog → publish ExecutionFailed
//!
//! Timeout:
//!   watchdog fires → abort invocation → publish TimeoutHit
//!                                     → publish ExecutionFailed (timeout)
//!
//! Kill:
//!   kill token cancelled → abort invocation → publish WorkerKilled
//!                                           → no outcome
//! ```
//!
//! ## Rules
//! - The loser of the race is always cancelled/aborted before returning.
//! - When two branches are ready at once, kill wins, then the invocation's own result.
//! - `TimeoutHit` is published **in addition to** `ExecutionFailed` on timeout.

use std::sync::Arc;
use std::time::Duration;

use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{invocation::Invocation, outcome::Outcome, watchdog::Watchdog},
    error::TaskError,
    events::{Bus, Event, EventKind},
    tasks::Work,
};

/// How a cycle ended.
pub(crate) enum Resolution<T> {
    /// The run finished, failed, or timed out; the outcome goes to observers.
    Completed(Outcome<T>),
    /// The run was aborted by a kill request.
    Killed,
}

/// Executes one cycle of `work`, bounded by `timeout`.
///
/// ### Flow
/// 1. Spawn the invocation and arm the watchdog
/// 2. Wait for the first of: invocation result, watchdog expiry, kill
/// 3. Cancel/abort the loser and publish the terminal event
pub(crate) async fn run_once<W: Work>(
    name: &str,
    work: &Arc<W>,
    args: &Arc<[W::Arg]>,
    timeout: Duration,
    kill: &CancellationToken,
    cycle: u64,
    bus: &Bus,
) -> Resolution<W::Output> {
    let mut invocation = Invocation::spawn(Arc::clone(work), Arc::clone(args));
    let mut watchdog = Watchdog::arm(timeout);

    let race = select! {
        biased;
        _ = kill.cancelled() => Race::Killed,
        res = &mut invocation => Race::Finished(res),
        _ = watchdog.expired() => Race::Expired,
    };

    match race {
        Race::Killed => {
            watchdog.cancel();
            invocation.terminate().await;
            publish_killed(bus, name, cycle);
            Resolution::Killed
        }
        Race::Expired => {
            invocation.terminate().await;
            publish_timeout(bus, name, timeout, cycle);

            let err = TaskError::Timeout { timeout };
            publish_failed(bus, name, cycle, &err);
            Resolution::Completed(Outcome::new(cycle, Err(err)))
        }
        Race::Finished(res) => {
            watchdog.cancel();
            match &res {
                Ok(_) => publish_succeeded(bus, name, cycle),
                Err(e) => publish_failed(bus, name, cycle, e),
            }
            Resolution::Completed(Outcome::new(cycle, res))
        }
    }
}

/// Winner of the race between the run, the watchdog and a kill request.
enum Race<T> {
    Killed,
    Finished(Result<T, TaskError>),
    Expired,
}

fn publish_succeeded(bus: &Bus, name: &str, cycle: u64) {
    bus.publish(
        Event::new(EventKind::ExecutionSucceeded)
            .with_timer(name)
            .with_cycle(cycle),
    );
}

fn publish_failed(bus: &Bus, name: &str, cycle: u64, err: &TaskError) {
    bus.publish(
        Event::new(EventKind::ExecutionFailed)
            .with_timer(name)
            .with_cycle(cycle)
            .with_reason(err.to_string()),
    );
}

/// Publishes `TimeoutHit` (always followed by `ExecutionFailed`).
fn publish_timeout(bus: &Bus, name: &str, timeout: Duration, cycle: u64) {
    tracing::warn!(timer = name, cycle, ?timeout, "run exceeded timeout, aborted");
    bus.publish(
        Event::new(EventKind::TimeoutHit)
            .with_timer(name)
            .with_cycle(cycle)
            .with_timeout(timeout),
    );
}

fn publish_killed(bus: &Bus, name: &str, cycle: u64) {
    tracing::debug!(timer = name, cycle, "in-flight run killed");
    bus.publish(
        Event::new(EventKind::WorkerKilled)
            .with_timer(name)
            .with_cycle(cycle),
    );
}
