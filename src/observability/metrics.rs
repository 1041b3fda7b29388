//! Metrics collection and exposition.
//!
//! # Metrics
//! - `heartbeat_probes_total` (counter): probes by outcome
//!   (`alive`, `network`, `timeout`, `status`, `payload`)
//! - `heartbeat_alive` (gauge): 1=alive, 0=down
//! - `heartbeat_probes_skipped_total` (counter): ticks dropped by the skip policy
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::HealthState;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_probe(outcome: &'static str) {
    metrics::counter!("heartbeat_probes_total", "outcome" => outcome).increment(1);
}

pub fn record_skipped_probe() {
    metrics::counter!("heartbeat_probes_skipped_total").increment(1);
}

pub fn record_health(state: HealthState) {
    let value = if state.is_alive() { 1.0 } else { 0.0 };
    metrics::gauge!("heartbeat_alive").set(value);
}
