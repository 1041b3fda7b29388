//! Periodic heartbeat monitor.
//!
//! # Responsibilities
//! - Probe the endpoint immediately, then on every tick
//! - Map each outcome to a health state and show it on the indicator
//! - Publish the latest state to subscribers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};

use crate::config::OverlapPolicy;
use crate::health::indicator::Indicator;
use crate::health::probe::HttpProbe;
use crate::health::state::{HealthState, LastState};
use crate::observability::metrics;

/// Shortest period the ticker accepts.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

pub struct HeartbeatMonitor {
    probe: HttpProbe,
    indicator: Arc<dyn Indicator>,
    overlap: OverlapPolicy,
    in_flight: AtomicBool,
    last: LastState,
    state_tx: watch::Sender<Option<HealthState>>,
}

/// Clears the in-flight flag when a probe finishes, even if it panicked.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl HeartbeatMonitor {
    pub fn new(probe: HttpProbe, indicator: Arc<dyn Indicator>) -> Self {
        let (state_tx, _) = watch::channel(None);
        Self {
            probe,
            indicator,
            overlap: OverlapPolicy::Allow,
            in_flight: AtomicBool::new(false),
            last: LastState::default(),
            state_tx,
        }
    }

    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    /// State applied by the most recently completed probe.
    pub fn last_state(&self) -> Option<HealthState> {
        self.last.load()
    }

    /// Receive state changes. Repeating the current state does not notify.
    pub fn subscribe(&self) -> watch::Receiver<Option<HealthState>> {
        self.state_tx.subscribe()
    }

    /// Probe once and show the result. Never fails: every error means Down.
    pub async fn check_once(&self) -> HealthState {
        let state = match self.probe.probe().await {
            Ok(payload) => {
                tracing::debug!(
                    endpoint = %self.probe.endpoint(),
                    status = payload.status.as_deref().unwrap_or("-"),
                    "Heartbeat probe succeeded"
                );
                metrics::record_probe("alive");
                HealthState::Alive
            }
            Err(e) => {
                tracing::debug!(
                    endpoint = %self.probe.endpoint(),
                    reason = e.reason(),
                    error = %e,
                    "Heartbeat probe failed"
                );
                metrics::record_probe(e.reason());
                HealthState::Down
            }
        };

        if !self.indicator.show(state) {
            tracing::debug!("Indicator element not found, skipping update");
        }

        let previous = self.last.swap(state);
        if previous != Some(state) {
            match state {
                HealthState::Alive => tracing::info!(endpoint = %self.probe.endpoint(), "Endpoint is alive"),
                HealthState::Down => tracing::warn!(endpoint = %self.probe.endpoint(), "Endpoint is down"),
            }
        }

        metrics::record_health(state);
        self.state_tx.send_if_modified(|current| {
            if *current == Some(state) {
                return false;
            }
            *current = Some(state);
            true
        });
        state
    }

    /// Start probing every `interval`, beginning now. A zero interval is
    /// raised to 1ms.
    pub fn start(self: &Arc<Self>, interval: Duration) -> MonitorHandle {
        let (stop_tx, stop_rx) = broadcast::channel(1);
        let task = tokio::spawn(Arc::clone(self).run(interval, stop_rx));
        MonitorHandle { stop_tx, task }
    }

    /// Probe loop. Returns when `shutdown` fires; runs forever once every
    /// sender is gone.
    pub async fn run(self: Arc<Self>, interval: Duration, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            endpoint = %self.probe.endpoint(),
            interval_ms = interval.as_millis() as u64,
            overlap = ?self.overlap,
            "Heartbeat monitor starting"
        );

        let interval = interval.max(MIN_INTERVAL);
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut probes = JoinSet::new();
        let mut detached = false;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.spawn_probe(&mut probes);
                }
                Some(res) = probes.join_next(), if !probes.is_empty() => {
                    if let Err(e) = res {
                        if e.is_panic() {
                            tracing::error!(error = %e, "Heartbeat probe panicked");
                        }
                    }
                }
                res = shutdown.recv(), if !detached => {
                    if let Err(broadcast::error::RecvError::Closed) = res {
                        // Handle dropped: keep probing for the life of the process.
                        detached = true;
                        continue;
                    }
                    tracing::info!("Heartbeat monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        probes.shutdown().await;
    }

    fn spawn_probe(self: &Arc<Self>, probes: &mut JoinSet<()>) {
        match self.overlap {
            OverlapPolicy::Allow => {
                let monitor = Arc::clone(self);
                probes.spawn(async move {
                    monitor.check_once().await;
                });
            }
            OverlapPolicy::Skip => {
                if self.in_flight.swap(true, Ordering::AcqRel) {
                    tracing::debug!("Previous probe still in flight, skipping tick");
                    metrics::record_skipped_probe();
                    return;
                }
                let monitor = Arc::clone(self);
                probes.spawn(async move {
                    let _guard = InFlightGuard(&monitor.in_flight);
                    monitor.check_once().await;
                });
            }
        }
    }
}

/// Handle to a running monitor loop.
pub struct MonitorHandle {
    stop_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Ask the loop to stop. In-flight probes are cancelled.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(());
    }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(self) {
        self.stop();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Heartbeat monitor task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use url::Url;

    #[derive(Default)]
    struct RecordingIndicator {
        shown: Mutex<Vec<HealthState>>,
    }

    impl Indicator for RecordingIndicator {
        fn show(&self, state: HealthState) -> bool {
            self.shown.lock().unwrap().push(state);
            true
        }
    }

    async fn unreachable_monitor() -> (Arc<HeartbeatMonitor>, Arc<RecordingIndicator>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/heartbeat", addr)).unwrap();
        let indicator = Arc::new(RecordingIndicator::default());
        let probe = HttpProbe::new(url).with_timeout(Some(Duration::from_secs(2)));
        let monitor = HeartbeatMonitor::new(probe, indicator.clone());
        (Arc::new(monitor), indicator)
    }

    #[tokio::test]
    async fn test_check_once_maps_connection_error_to_down() {
        let (monitor, indicator) = unreachable_monitor().await;
        let mut rx = monitor.subscribe();
        assert_eq!(monitor.last_state(), None);

        assert_eq!(monitor.check_once().await, HealthState::Down);
        assert_eq!(monitor.last_state(), Some(HealthState::Down));
        assert_eq!(*indicator.shown.lock().unwrap(), vec![HealthState::Down]);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(HealthState::Down));
    }

    #[tokio::test]
    async fn test_start_probes_immediately_and_stops() {
        let (monitor, indicator) = unreachable_monitor().await;
        let mut rx = monitor.subscribe();
        let handle = monitor.start(Duration::from_secs(3600));

        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("first probe should run without waiting for the interval")
            .unwrap();
        assert_eq!(indicator.shown.lock().unwrap().len(), 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_zero_interval_still_probes() {
        let (monitor, indicator) = unreachable_monitor().await;
        let mut rx = monitor.subscribe();
        let handle = monitor.start(Duration::ZERO);

        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("loop should survive a zero interval")
            .unwrap();
        assert!(!indicator.shown.lock().unwrap().is_empty());
        assert_eq!(monitor.last_state(), Some(HealthState::Down));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_repeated_state_does_not_notify() {
        let (monitor, _indicator) = unreachable_monitor().await;
        let mut rx = monitor.subscribe();

        monitor.check_once().await;
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        monitor.check_once().await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), Some(HealthState::Down));
    }

    #[test]
    fn test_in_flight_guard_resets_flag() {
        let flag = AtomicBool::new(true);
        drop(InFlightGuard(&flag));
        assert!(!flag.load(Ordering::Acquire));
    }
}
