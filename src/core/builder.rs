use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use parking_lot::RwLock;

use super::{
    config::TimerConfig,
    scheduler::{Intervals, Shared},
    timer::TimerTask,
};
use crate::{
    error::TimerError,
    events::Bus,
    observers::{Observe, ObserverSet},
    tasks::Work,
};

/// Builder for constructing a [`TimerTask`].
///
/// The unit of work is mandatory; [`build`](Self::build) and
/// [`start`](Self::start) fail with [`TimerError::MissingTask`] without it.
pub struct TimerTaskBuilder<W: Work> {
    cfg: TimerConfig,
    name: Option<String>,
    work: Option<Arc<W>>,
    args: Vec<W::Arg>,
    observers: Vec<Arc<dyn Observe<W::Output>>>,
}

impl<W: Work> TimerTaskBuilder<W> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: TimerConfig) -> Self {
        Self {
            cfg,
            name: None,
            work: None,
            args: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Sets the unit of work run on every cycle.
    pub fn with_work(mut self, work: Arc<W>) -> Self {
        self.work = Some(work);
        self
    }

    /// Sets the fixed call arguments passed, in order, to every run.
    pub fn with_args(mut self, args: impl IntoIterator<Item = W::Arg>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    /// Adds one outcome observer.
    pub fn with_observer(mut self, observer: Arc<dyn Observe<W::Output>>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Adds outcome observers.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe<W::Output>>>) -> Self {
        self.observers.extend(observers);
        self
    }

    /// Overrides the timer name (defaults to [`Work::name`]).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the timer without starting it.
    ///
    /// Registering observers spawns their workers, so a builder with
    /// observers must be built inside a Tokio runtime.
    pub fn build(self) -> Result<TimerTask<W>, TimerError> {
        let work = self.work.ok_or(TimerError::MissingTask)?;
        let name: Arc<str> = match self.name {
            Some(name) => name.into(),
            None => work.name().into(),
        };

        let bus = Bus::new(self.cfg.event_capacity_clamped());
        let observers = ObserverSet::new(bus.clone());
        for observer in self.observers {
            observers.add(observer);
        }

        let shared = Shared {
            name,
            work,
            args: self.args.into(),
            run_now: self.cfg.run_now,
            intervals: RwLock::new(Intervals {
                execution: self.cfg.execution_interval,
                timeout: self.cfg.timeout_interval,
            }),
            observers,
            bus,
            cycles: AtomicU64::new(0),
        };
        Ok(TimerTask::from_shared(Arc::new(shared)))
    }

    /// Builds the timer and starts it immediately.
    ///
    /// One-call form of `build()?` followed by [`TimerTask::start`].
    pub async fn start(self) -> Result<TimerTask<W>, TimerError> {
        let timer = self.build()?;
        timer.start().await?;
        Ok(timer)
    }
}
