mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::{self, Instant};

use common::{Hang, Record, collector, config};
use timervisor::{
    EXECUTION_INTERVAL, EventKind, TIMEOUT_INTERVAL, TaskError, TimerConfig, TimerError, TimerTask,
    WorkFn,
};

#[test]
fn defaults_apply_when_nothing_is_configured() {
    let timer = TimerTask::builder(TimerConfig::default())
        .with_work(Arc::new(Record::default()))
        .build()
        .expect("work is set");

    assert_eq!(timer.execution_interval(), EXECUTION_INTERVAL);
    assert_eq!(timer.timeout_interval(), TIMEOUT_INTERVAL);
    assert_eq!(EXECUTION_INTERVAL, Duration::from_secs(60));
    assert_eq!(TIMEOUT_INTERVAL, Duration::from_secs(30));
    assert!(!timer.run_now());
    assert!(timer.call_args().is_empty());
    assert_eq!(timer.name(), "record");
}

#[tokio::test]
async fn building_without_work_fails() {
    let built = TimerTask::<Record>::builder(TimerConfig::default()).build();
    assert_eq!(built.err(), Some(TimerError::MissingTask));

    let started = TimerTask::<Record>::builder(TimerConfig::default())
        .with_args([1, 2])
        .start()
        .await;
    assert_eq!(started.err(), Some(TimerError::MissingTask));
}

#[tokio::test(start_paused = true)]
async fn run_now_runs_immediately() {
    let work = Arc::new(Record::default());
    let timer = TimerTask::builder(config(10_000, 1_000, true))
        .with_work(Arc::clone(&work))
        .start()
        .await
        .expect("start");

    time::sleep(Duration::from_millis(10)).await;
    assert_eq!(work.runs(), 1);
    assert_eq!(timer.cycles(), 1);
    timer.kill().await;
}

#[tokio::test(start_paused = true)]
async fn without_run_now_waits_one_interval() {
    let work = Arc::new(Record::default());
    let timer = TimerTask::builder(config(1_000, 500, false))
        .with_work(Arc::clone(&work))
        .start()
        .await
        .expect("start");

    time::sleep(Duration::from_millis(900)).await;
    assert_eq!(work.runs(), 0);

    time::sleep(Duration::from_millis(200)).await;
    assert_eq!(work.runs(), 1);
    timer.kill().await;
}

#[tokio::test(start_paused = true)]
async fn call_args_reach_every_run_in_order() {
    let work = Arc::new(Record::default());
    let timer = TimerTask::builder(config(100, 50, true))
        .with_work(Arc::clone(&work))
        .with_args([3, 1, 2])
        .start()
        .await
        .expect("start");

    assert_eq!(timer.call_args(), &[3, 1, 2]);
    time::sleep(Duration::from_millis(250)).await;
    timer.kill().await;

    let calls = work.calls.lock();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|args| args == &[3, 1, 2]));
}

#[tokio::test(start_paused = true)]
async fn successful_value_is_delivered() {
    let (observer, mut rx) = collector::<u32>();
    let timer = TimerTask::builder(config(60_000, 1_000, true))
        .with_work(WorkFn::arc("answer", |_args: Arc<[()]>| async move {
            time::sleep(Duration::from_millis(100)).await;
            Ok::<_, TaskError>(42u32)
        }))
        .with_observer(observer)
        .start()
        .await
        .expect("start");

    let seen = time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("outcome within 1s")
        .expect("channel open");
    assert_eq!(seen.value, Some(42));
    assert_eq!(seen.error, None);
    timer.kill().await;
}

#[tokio::test(start_paused = true)]
async fn work_error_is_delivered_as_error() {
    let (observer, mut rx) = collector::<u32>();
    let timer = TimerTask::builder(config(60_000, 1_000, true))
        .with_work(WorkFn::arc("broken", |_args: Arc<[()]>| async move {
            Err::<u32, _>(TaskError::fail("boom"))
        }))
        .with_observer(observer)
        .start()
        .await
        .expect("start");

    let seen = rx.recv().await.expect("outcome");
    assert_eq!(seen.value, None);
    assert_eq!(seen.error, Some(TaskError::fail("boom")));
    timer.kill().await;
}

#[tokio::test(start_paused = true)]
async fn panicking_work_is_reported_and_the_timer_continues() {
    let (observer, mut rx) = collector::<u32>();
    let timer = TimerTask::builder(config(100, 50, true))
        .with_work(WorkFn::arc("panics", |_args: Arc<[()]>| async move {
            if true {
                panic!("kaboom");
            }
            Ok::<u32, TaskError>(0)
        }))
        .with_observer(observer)
        .start()
        .await
        .expect("start");

    for _ in 0..2 {
        let seen = rx.recv().await.expect("outcome");
        assert!(matches!(
            seen.error,
            Some(TaskError::Panicked { ref info }) if info.contains("kaboom")
        ));
    }
    assert!(timer.is_running().await);
    timer.kill().await;
}

#[tokio::test(start_paused = true)]
async fn hung_work_times_out_within_the_timeout() {
    let work = Arc::new(Hang::default());
    let (observer, mut rx) = collector::<()>();
    let timer = TimerTask::builder(config(60_000, 1_000, true))
        .with_work(Arc::clone(&work))
        .with_observer(observer)
        .start()
        .await
        .expect("start");

    let began = Instant::now();
    let seen = time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timeout outcome within 2s")
        .expect("channel open");

    assert!(began.elapsed() >= Duration::from_secs(1));
    assert_eq!(seen.value, None);
    assert_eq!(
        seen.error,
        Some(TaskError::Timeout {
            timeout: Duration::from_secs(1)
        })
    );
    assert_eq!(work.torn_down.load(Ordering::SeqCst), 1);
    timer.kill().await;
}

#[tokio::test(start_paused = true)]
async fn hung_work_is_terminated_every_cycle() {
    let work = Arc::new(Hang::default());
    let timer = TimerTask::builder(config(500, 500, false))
        .with_work(Arc::clone(&work))
        .build()
        .expect("build");
    let mut events = timer.subscribe();
    timer.start().await.expect("start");

    // First run starts at 0.5s and is aborted at 1.0s.
    time::sleep(Duration::from_millis(1_100)).await;
    assert_eq!(work.started.load(Ordering::SeqCst), 1);
    assert_eq!(work.torn_down.load(Ordering::SeqCst), 1);

    // Second run starts at 1.5s and is aborted at 2.0s.
    time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(work.torn_down.load(Ordering::SeqCst), 2);
    timer.kill().await;

    let mut timeouts = 0;
    while let Ok(ev) = events.try_recv() {
        if ev.kind == EventKind::TimeoutHit {
            assert_eq!(ev.timeout_ms, Some(500));
            timeouts += 1;
        }
    }
    assert_eq!(timeouts, 2);
}

#[tokio::test(start_paused = true)]
async fn runs_never_overlap() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (a, p) = (Arc::clone(&active), Arc::clone(&peak));

    let timer = TimerTask::builder(config(10, 1_000, true))
        .with_work(WorkFn::arc("slow", move |_args: Arc<[()]>| {
            let (active, peak) = (Arc::clone(&a), Arc::clone(&p));
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                time::sleep(Duration::from_millis(50)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, TaskError>(())
            }
        }))
        .start()
        .await
        .expect("start");

    time::sleep(Duration::from_millis(500)).await;
    timer.kill().await;

    assert!(timer.cycles() >= 5);
    assert_eq!(peak.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn a_panicking_observer_does_not_starve_the_others() {
    struct Explodes;

    #[async_trait::async_trait]
    impl timervisor::Observe<usize> for Explodes {
        async fn notify(
            &self,
            _at: std::time::SystemTime,
            _value: Option<&usize>,
            _error: Option<&TaskError>,
        ) {
            panic!("observer bug");
        }
    }

    let (observer, mut rx) = collector::<usize>();
    let timer = TimerTask::builder(config(100, 50, true))
        .with_work(Arc::new(Record::default()))
        .with_observer(Arc::new(Explodes))
        .with_observer(observer)
        .start()
        .await
        .expect("start");

    for expected in 1..=3 {
        let seen = rx.recv().await.expect("outcome");
        assert_eq!(seen.value, Some(expected));
    }
    assert!(timer.is_running().await);
    timer.kill().await;
}
