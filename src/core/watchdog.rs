//! # Single-shot timeout timer.
//!
//! A [`Watchdog`] is armed once per cycle, next to the run it guards. The
//! timer lives on its own Tokio task, so it fires independently of the work
//! and of the scheduler loop; the loop only waits for its signal.
//!
//! ## Rules
//! - Fires **at most once**; after firing, [`Watchdog::expired`] never completes again.
//! - [`Watchdog::cancel`] after the deadline passed is a no-op (returns `false`).
//! - Cancelling or dropping the watchdog aborts its timer task (no leak).

use std::time::Duration;

use tokio::{sync::oneshot, task::JoinHandle, time};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Armed,
    Fired,
    Disarmed,
}

/// Single-shot timer signalling that a run exceeded its timeout.
pub(crate) struct Watchdog {
    rx: oneshot::Receiver<()>,
    timer: JoinHandle<()>,
    state: State,
}

impl Watchdog {
    /// Arms a watchdog that fires once `after` has elapsed.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn arm(after: Duration) -> Self {
        let (tx, rx) = oneshot::channel();
        let timer = tokio::spawn(async move {
            time::sleep(after).await;
            let _ = tx.send(());
        });
        Self {
            rx,
            timer,
            state: State::Armed,
        }
    }

    /// Completes when the watchdog fires.
    ///
    /// Cancel-safe: dropping the returned future before completion does not
    /// lose the signal.
    pub async fn expired(&mut self) {
        if self.state == State::Armed {
            match (&mut self.rx).await {
                Ok(()) => {
                    self.state = State::Fired;
                    return;
                }
                Err(_dropped) => self.state = State::Disarmed,
            }
        }
        std::future::pending::<()>().await
    }

    /// Disarms the watchdog.
    ///
    /// Returns `true` if it was cancelled before firing, `false` if the
    /// deadline had already passed.
    pub fn cancel(mut self) -> bool {
        self.timer.abort();
        match self.state {
            State::Fired => false,
            State::Disarmed => true,
            State::Armed => self.rx.try_recv().is_err(),
        }
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.timer.abort();
    }
}
