//! # Example: custom_observer
//!
//! Combines the built-in [`LogWriter`] with a custom observer that keeps
//! running statistics, and shows observers being added and removed while the
//! timer runs.
//!
//! ## Run
//! ```bash
//! cargo run --example custom_observer --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use timervisor::{LogWriter, Observe, TaskError, TimerConfig, TimerTask, WorkFn};

/// Counts successes, failures and timeouts.
#[derive(Default)]
struct Stats {
    ok: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
}

#[async_trait]
impl Observe<u64> for Stats {
    async fn notify(&self, _at: SystemTime, _value: Option<&u64>, error: Option<&TaskError>) {
        let counter = match error {
            None => &self.ok,
            Some(e) if e.is_timeout() => &self.timed_out,
            Some(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn name(&self) -> &'static str {
        "stats"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== custom_observer example ===\n");

    let cfg = TimerConfig {
        execution_interval: Duration::from_millis(200),
        timeout_interval: Duration::from_millis(100),
        run_now: true,
        ..TimerConfig::default()
    };

    // Returns the sum of its arguments; fails on every third call.
    let calls = Arc::new(AtomicU64::new(0));
    let work = WorkFn::arc("sum", move |nums: Arc<[u64]>| {
        let n = calls.fetch_add(1, Ordering::Relaxed) + 1;
        async move {
            if n % 3 == 0 {
                return Err(TaskError::fail(format!("call {n} rejected")));
            }
            Ok::<u64, TaskError>(nums.iter().sum())
        }
    });

    let stats = Arc::new(Stats::default());
    let timer = TimerTask::builder(cfg)
        .with_work(work)
        .with_args([1, 2, 3])
        .with_observer(stats.clone())
        .start()
        .await?;

    // Attach the printer for one second only.
    let printer = timer.add_observer(Arc::new(LogWriter::new()));
    tokio::time::sleep(Duration::from_secs(1)).await;
    timer.remove_observer(printer);
    println!("[main] printer removed, {} observer(s) left", timer.observer_count());

    tokio::time::sleep(Duration::from_secs(1)).await;
    timer.stop().await;

    println!(
        "\nok={} failed={} timed_out={}",
        stats.ok.load(Ordering::Relaxed),
        stats.failed.load(Ordering::Relaxed),
        stats.timed_out.load(Ordering::Relaxed),
    );
    Ok(())
}
