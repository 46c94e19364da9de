#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use timervisor::{Observe, TaskError, TimerConfig, Work};

/// What an observer saw for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Seen<T> {
    pub value: Option<T>,
    pub error: Option<TaskError>,
}

/// Observer forwarding every notification into a channel.
pub struct Collect<T>(UnboundedSender<Seen<T>>);

#[async_trait]
impl<T> Observe<T> for Collect<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn notify(&self, _at: SystemTime, value: Option<&T>, error: Option<&TaskError>) {
        let _ = self.0.send(Seen {
            value: value.cloned(),
            error: error.cloned(),
        });
    }

    fn name(&self) -> &'static str {
        "collect"
    }
}

pub fn collector<T>() -> (Arc<Collect<T>>, UnboundedReceiver<Seen<T>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(Collect(tx)), rx)
}

pub fn config(execution_ms: u64, timeout_ms: u64, run_now: bool) -> TimerConfig {
    TimerConfig {
        execution_interval: Duration::from_millis(execution_ms),
        timeout_interval: Duration::from_millis(timeout_ms),
        run_now,
        ..TimerConfig::default()
    }
}

/// Increments the counter when the owning future is torn down.
struct DropCount(Arc<AtomicUsize>);

impl Drop for DropCount {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Work that never finishes on its own.
#[derive(Default)]
pub struct Hang {
    pub started: Arc<AtomicUsize>,
    pub torn_down: Arc<AtomicUsize>,
}

#[async_trait]
impl Work for Hang {
    type Arg = ();
    type Output = ();

    fn name(&self) -> &str {
        "hang"
    }

    async fn execute(&self, _args: Arc<[()]>) -> Result<(), TaskError> {
        let _guard = DropCount(Arc::clone(&self.torn_down));
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Work recording the arguments of every run and returning the run count.
#[derive(Default)]
pub struct Record {
    pub calls: Mutex<Vec<Vec<u32>>>,
}

#[async_trait]
impl Work for Record {
    type Arg = u32;
    type Output = usize;

    fn name(&self) -> &str {
        "record"
    }

    async fn execute(&self, args: Arc<[u32]>) -> Result<usize, TaskError> {
        let mut calls = self.calls.lock();
        calls.push(args.to_vec());
        Ok(calls.len())
    }
}

impl Record {
    pub fn runs(&self) -> usize {
        self.calls.lock().len()
    }
}
