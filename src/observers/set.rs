//! # Non-blocking outcome fan-out to multiple observers.
//!
//! Provides [`ObserverSet`] — distributes each [`Outcome`] to every
//! registered observer without blocking the scheduler loop.
//!
//! ## Architecture
//! ```text
//! emit(outcome)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► observer1.notify()
//!     │    (bounded)         └──────► panic → ObserverPanicked
//!     ├──► [queue 2] ──► worker 2 ──► observer2.notify()
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► observerN.notify()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **No cross-observer ordering**: observer A may handle cycle N while B handles N+2
//! - **Overflow**: outcome dropped for that observer only, `ObserverOverflow` published
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Isolation**: a slow or panicking observer doesn't affect others or the loop
//! - **Per-observer FIFO**: each observer sees outcomes in cycle order
//! - **Mutable**: observers can be added and removed while the timer runs
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if an observer uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::core::Outcome;
use crate::error::panic_message;
use crate::events::{Bus, Event};
use crate::observers::Observe;

/// Handle identifying a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Per-observer channel metadata.
struct ObserverChannel<T> {
    id: ObserverId,
    name: &'static str,
    sender: mpsc::Sender<Arc<Outcome<T>>>,
}

/// Fan-out coordinator for outcome observers.
pub(crate) struct ObserverSet<T> {
    channels: Mutex<Vec<ObserverChannel<T>>>,
    next_id: AtomicU64,
    bus: Bus,
}

impl<T: Send + Sync + 'static> ObserverSet<T> {
    /// Creates an empty set publishing overflow/panic events to `bus`.
    pub fn new(bus: Bus) -> Self {
        Self {
            channels: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            bus,
        }
    }

    /// Registers an observer and spawns its worker task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn add(&self, observer: Arc<dyn Observe<T>>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let name = observer.name();
        let (tx, mut rx) = mpsc::channel::<Arc<Outcome<T>>>(observer.queue_capacity().max(1));
        let bus = self.bus.clone();

        tokio::spawn(async move {
            while let Some(outcome) = rx.recv().await {
                let fut = observer.notify(outcome.at(), outcome.value(), outcome.error());

                if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                    let info = panic_message(panic_err.as_ref());
                    tracing::error!(observer = observer.name(), cycle = outcome.cycle(), %info, "observer panicked");
                    bus.publish(Event::observer_panicked(observer.name(), info));
                }
            }
        });

        self.channels.lock().push(ObserverChannel {
            id,
            name,
            sender: tx,
        });
        id
    }

    /// Unregisters an observer.
    ///
    /// Outcomes already queued for it are still delivered. Returns `false`
    /// if the id is unknown.
    pub fn remove(&self, id: ObserverId) -> bool {
        let mut channels = self.channels.lock();
        let before = channels.len();
        channels.retain(|ch| ch.id != id);
        channels.len() != before
    }

    /// Unregisters every observer, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut channels = self.channels.lock();
        let count = channels.len();
        channels.clear();
        count
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.channels.lock().len()
    }

    /// Emits an outcome to all observers.
    ///
    /// - Uses `try_send` (non-blocking)
    /// - On queue full: drops the outcome for that observer, publishes `ObserverOverflow`
    /// - On queue closed: publishes `ObserverOverflow` with reason "closed"
    pub fn emit(&self, outcome: Arc<Outcome<T>>) {
        for channel in self.channels.lock().iter() {
            let reason = match channel.sender.try_send(Arc::clone(&outcome)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            tracing::warn!(observer = channel.name, cycle = outcome.cycle(), reason, "outcome dropped");
            self.bus
                .publish(Event::observer_overflow(channel.name, reason));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    use async_trait::async_trait;
    use tokio::sync::mpsc::UnboundedSender;

    use crate::error::TaskError;
    use crate::events::EventKind;

    struct Forward(UnboundedSender<(Option<u32>, Option<TaskError>)>);

    #[async_trait]
    impl Observe<u32> for Forward {
        async fn notify(&self, _at: SystemTime, value: Option<&u32>, error: Option<&TaskError>) {
            let _ = self.0.send((value.copied(), error.cloned()));
        }

        fn name(&self) -> &'static str {
            "forward"
        }
    }

    struct Panics;

    #[async_trait]
    impl Observe<u32> for Panics {
        async fn notify(&self, _at: SystemTime, _value: Option<&u32>, _error: Option<&TaskError>) {
            panic!("observer bug");
        }

        fn name(&self) -> &'static str {
            "panics"
        }
    }

    /// Never returns, so its queue fills up.
    struct Stuck;

    #[async_trait]
    impl Observe<u32> for Stuck {
        async fn notify(&self, _at: SystemTime, _value: Option<&u32>, _error: Option<&TaskError>) {
            std::future::pending::<()>().await;
        }

        fn name(&self) -> &'static str {
            "stuck"
        }

        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn panicking_observer_does_not_block_others() {
        let bus = Bus::new(16);
        let mut events = bus.subscribe();
        let set: ObserverSet<u32> = ObserverSet::new(bus);
        let (tx, mut rx) = mpsc::unbounded_channel();

        set.add(Arc::new(Panics));
        set.add(Arc::new(Forward(tx)));

        set.emit(Arc::new(Outcome::new(1, Ok(10))));
        set.emit(Arc::new(Outcome::new(2, Err(TaskError::fail("boom")))));

        assert_eq!(rx.recv().await, Some((Some(10), None)));
        assert_eq!(rx.recv().await, Some((None, Some(TaskError::fail("boom")))));

        let ev = events.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ObserverPanicked);
        assert_eq!(ev.reason.as_deref(), Some("observer bug"));
    }

    #[tokio::test]
    async fn removed_observer_stops_receiving() {
        let set: ObserverSet<u32> = ObserverSet::new(Bus::new(16));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = set.add(Arc::new(Forward(tx)));
        assert_eq!(set.len(), 1);

        assert!(set.remove(id));
        assert!(!set.remove(id));
        set.emit(Arc::new(Outcome::new(1, Ok(1))));

        // The worker exits once its sender is gone; nothing was queued.
        let got = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
        assert!(matches!(got, Ok(None)));
    }

    #[tokio::test]
    async fn full_queue_reports_overflow() {
        let bus = Bus::new(16);
        let mut events = bus.subscribe();
        let set: ObserverSet<u32> = ObserverSet::new(bus);
        set.add(Arc::new(Stuck));

        for cycle in 1..=3 {
            set.emit(Arc::new(Outcome::new(cycle, Ok(0))));
            tokio::task::yield_now().await;
        }

        let ev = events.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ObserverOverflow);
        assert_eq!(ev.timer.as_deref(), Some("stuck"));
        assert_eq!(set.clear(), 1);
        assert_eq!(set.len(), 0);
    }
}
