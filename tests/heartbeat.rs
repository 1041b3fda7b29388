//! End-to-end probe scenarios against a mock heartbeat endpoint.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use heartbeat_monitor::config::{parse_config, OverlapPolicy};
use heartbeat_monitor::lifecycle::Runtime;
use heartbeat_monitor::health::HealthState;

mod common;
use common::{closed_addr, heart_classes, monitor_for, monitor_with, start_programmable_backend, Reply};

const ALIVE: &str = "text-green-500 animate-pulse";
const DOWN: &str = "text-red-500 opacity-70";

#[tokio::test]
async fn test_ok_response_marks_alive() {
    let addr = start_programmable_backend(|| async { Reply::json(200, r#"{"status":"ok"}"#) }).await;
    let (monitor, document, selector) = monitor_for(addr);

    assert_eq!(monitor.check_once().await, HealthState::Alive);
    assert_eq!(heart_classes(&document, &selector).as_deref(), Some(ALIVE));
}

#[tokio::test]
async fn test_network_error_marks_down() {
    let addr = closed_addr().await;
    let (monitor, document, selector) = monitor_for(addr);

    assert_eq!(monitor.check_once().await, HealthState::Down);
    assert_eq!(heart_classes(&document, &selector).as_deref(), Some(DOWN));
}

#[tokio::test]
async fn test_server_error_marks_down() {
    let addr = start_programmable_backend(|| async { Reply::json(500, r#"{"status":"error"}"#) }).await;
    let (monitor, document, selector) = monitor_for(addr);

    assert_eq!(monitor.check_once().await, HealthState::Down);
    assert_eq!(heart_classes(&document, &selector).as_deref(), Some(DOWN));
}

#[tokio::test]
async fn test_non_json_body_marks_down() {
    let addr = start_programmable_backend(|| async { Reply::json(200, "<html>ok</html>") }).await;
    let (monitor, document, selector) = monitor_for(addr);

    assert_eq!(monitor.check_once().await, HealthState::Down);
    assert_eq!(heart_classes(&document, &selector).as_deref(), Some(DOWN));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let addr = start_programmable_backend(|| async {
        Reply::json(200, r#"{"status":"alive"}"#).delayed(Duration::from_secs(2))
    })
    .await;
    let (monitor, document, selector) = monitor_with(addr, OverlapPolicy::Allow, Duration::from_millis(200));

    assert_eq!(monitor.check_once().await, HealthState::Down);
    assert_eq!(heart_classes(&document, &selector).as_deref(), Some(DOWN));
}

#[tokio::test]
async fn test_latest_probe_wins() {
    let healthy = Arc::new(AtomicBool::new(true));
    let h = healthy.clone();
    let addr = start_programmable_backend(move || {
        let h = h.clone();
        async move {
            if h.load(Ordering::SeqCst) {
                Reply::json(200, r#"{"status":"alive"}"#)
            } else {
                Reply::json(503, "")
            }
        }
    })
    .await;
    let (monitor, document, selector) = monitor_for(addr);

    for (up, expected) in [(true, ALIVE), (false, DOWN), (true, ALIVE), (false, DOWN)] {
        healthy.store(up, Ordering::SeqCst);
        monitor.check_once().await;
        assert_eq!(heart_classes(&document, &selector).as_deref(), Some(expected));
    }
    assert_eq!(monitor.last_state(), Some(HealthState::Down));
}

#[tokio::test]
async fn test_missing_indicator_is_not_an_error() {
    let addr = start_programmable_backend(|| async { Reply::json(200, r#"{"status":"ok"}"#) }).await;
    let (monitor, document, selector) = monitor_for(addr);
    document.write().remove_matching(&selector);

    assert_eq!(monitor.check_once().await, HealthState::Alive);
    assert_eq!(heart_classes(&document, &selector), None);
    assert_eq!(monitor.last_state(), Some(HealthState::Alive));
}

#[tokio::test]
async fn test_start_repeats_until_stopped() {
    let calls = Arc::new(AtomicU32::new(0));
    let c = calls.clone();
    let addr = start_programmable_backend(move || {
        let c = c.clone();
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            Reply::json(200, r#"{"status":"alive"}"#)
        }
    })
    .await;
    let (monitor, document, selector) = monitor_for(addr);

    let handle = monitor.start(Duration::from_millis(100));
    tokio::time::sleep(Duration::from_millis(550)).await;
    handle.shutdown().await;
    // Let a request that was already on the wire land.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let seen = calls.load(Ordering::SeqCst);
    assert!(seen >= 3, "expected repeated probes, got {}", seen);
    assert_eq!(heart_classes(&document, &selector).as_deref(), Some(ALIVE));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(calls.load(Ordering::SeqCst), seen, "no probes after shutdown");
}

/// Mock endpoint that holds each request for `delay` and records the
/// highest number of requests it served at once.
async fn slow_backend(delay: Duration) -> (std::net::SocketAddr, Arc<AtomicUsize>) {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let p = peak.clone();
    let addr = start_programmable_backend(move || {
        let active = active.clone();
        let peak = p.clone();
        async move {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            active.fetch_sub(1, Ordering::SeqCst);
            Reply::json(200, r#"{"status":"alive"}"#)
        }
    })
    .await;
    (addr, peak)
}

#[tokio::test]
async fn test_skip_policy_never_overlaps() {
    let (addr, peak) = slow_backend(Duration::from_millis(300)).await;
    let (monitor, document, selector) = monitor_with(addr, OverlapPolicy::Skip, Duration::from_secs(2));

    let handle = monitor.start(Duration::from_millis(50));
    tokio::time::sleep(Duration::from_millis(1000)).await;
    handle.shutdown().await;

    assert_eq!(peak.load(Ordering::SeqCst), 1);
    assert_eq!(heart_classes(&document, &selector).as_deref(), Some(ALIVE));
}

#[tokio::test]
async fn test_allow_policy_overlaps_slow_probes() {
    let (addr, peak) = slow_backend(Duration::from_millis(300)).await;
    let (monitor, _document, _selector) = monitor_with(addr, OverlapPolicy::Allow, Duration::from_secs(2));

    let handle = monitor.start(Duration::from_millis(50));
    tokio::time::sleep(Duration::from_millis(500)).await;
    handle.shutdown().await;

    assert!(peak.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_one_shot_check_exit_status() {
    let up = start_programmable_backend(|| async { Reply::json(200, r#"{"status":"alive"}"#) }).await;
    let down = closed_addr().await;
    let config = parse_config("[monitor]\ntimeout_ms = 2000\n").unwrap();

    let runtime = Runtime::from_config(&config, Some(&format!("http://{}/heartbeat", up))).unwrap();
    let state = runtime.monitor.check_once().await;
    assert_eq!(state.exit_status(), 0);
    assert_eq!(runtime.indicator_classes().as_deref(), Some(ALIVE));

    let runtime = Runtime::from_config(&config, Some(&format!("http://{}/heartbeat", down))).unwrap();
    let state = runtime.monitor.check_once().await;
    assert_eq!(state.exit_status(), 1);
    assert_eq!(runtime.indicator_classes().as_deref(), Some(DOWN));
}
