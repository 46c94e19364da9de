//! # Example: hung_work
//!
//! Work that sometimes never returns. The watchdog aborts it after the
//! timeout interval and the observer receives a timeout error instead of a
//! value; the next cycle runs on schedule.
//!
//! ## Flow
//! ```text
//! cycle 1: answers in 50ms      → value
//! cycle 2: hangs forever        → aborted after 300ms → TaskError::Timeout
//! cycle 3: answers in 50ms      → value
//! ...
//! kill() aborts whatever is in flight and exits
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example hung_work
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use timervisor::{Observe, TaskError, TimerConfig, TimerTask, Work};

/// Flaky upstream: every second call hangs.
#[derive(Default)]
struct Flaky {
    calls: AtomicU64,
}

#[async_trait]
impl Work for Flaky {
    type Arg = String;
    type Output = String;

    fn name(&self) -> &str {
        "flaky-upstream"
    }

    async fn execute(&self, args: Arc<[String]>) -> Result<String, TaskError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        if call % 2 == 0 {
            println!("[work] call #{call} hangs");
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(format!("call #{call}: {}", args.join(",")))
    }
}

struct Report;

#[async_trait]
impl Observe<String> for Report {
    async fn notify(&self, _at: SystemTime, value: Option<&String>, error: Option<&TaskError>) {
        match (value, error) {
            (Some(v), _) => println!("[observer] ok    {v}"),
            (_, Some(e)) if e.is_timeout() => println!("[observer] TIMEOUT {e}"),
            (_, Some(e)) => println!("[observer] error {e}"),
            _ => {}
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("timervisor=warn"))
        .init();

    println!("=== hung_work example ===\n");

    let cfg = TimerConfig {
        execution_interval: Duration::from_millis(400),
        timeout_interval: Duration::from_millis(300),
        run_now: true,
        ..TimerConfig::default()
    };

    let timer = TimerTask::builder(cfg)
        .with_work(Arc::new(Flaky::default()))
        .with_args(["eu".to_string(), "us".to_string()])
        .with_observer(Arc::new(Report))
        .start()
        .await?;

    tokio::time::sleep(Duration::from_secs(3)).await;

    timer.kill().await;
    println!("\nkilled after {} cycles", timer.cycles());
    Ok(())
}
