//! # Example: heartbeat
//!
//! A timer that "pings" a fixed list of hosts every 500ms.
//!
//! Shows how to:
//! - Define work as a closure with [`WorkFn`]
//! - Pass fixed call arguments with `with_args`
//! - Watch lifecycle [`Event`](timervisor::Event)s through `subscribe()`
//! - Stop the timer gracefully with [`TimerTask::stop`]
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► build TimerTask (run_now, every 500ms, timeout 200ms)
//!   ├─► spawn event printer (subscribe)
//!   ├─► start
//!   │     └─► every cycle: ping(hosts) → ExecutionSucceeded
//!   ├─► sleep 2 seconds
//!   └─► stop (graceful) → TimerStopped
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=timervisor=debug cargo run --example heartbeat
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use timervisor::{TaskError, TimerConfig, TimerTask, WorkFn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== heartbeat example ===\n");

    // 1. Configure the schedule
    let cfg = TimerConfig {
        execution_interval: Duration::from_millis(500),
        timeout_interval: Duration::from_millis(200),
        run_now: true,
        ..TimerConfig::default()
    };

    // 2. Define the work; the counter is captured so it survives across runs
    let beats = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&beats);
    let ping = WorkFn::arc("heartbeat", move |hosts: Arc<[&'static str]>| {
        let counter = Arc::clone(&counter);
        async move {
            let beat = counter.fetch_add(1, Ordering::Relaxed) + 1;
            for host in hosts.iter() {
                println!("[heartbeat #{beat}] ping {host}");
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, TaskError>(hosts.len())
        }
    });

    // 3. Build, subscribe to events, then start
    let timer = TimerTask::builder(cfg)
        .with_work(ping)
        .with_args(["db-1", "cache-1"])
        .build()?;

    let mut events = timer.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(ev) = events.recv().await {
            println!("  [event] {:?} cycle={:?}", ev.kind, ev.cycle);
        }
    });

    timer.start().await?;

    // 4. Let it beat a few times
    tokio::time::sleep(Duration::from_secs(2)).await;

    // 5. Graceful stop
    timer.stop().await;
    println!("\nstopped after {} runs", beats.load(Ordering::Relaxed));

    drop(timer);
    let _ = printer.await;
    Ok(())
}
