//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling interval used by the status page.
pub const DEFAULT_INTERVAL_MS: u64 = 3000;

/// Root configuration for the heartbeat monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Health-check endpoint.
    pub endpoint: EndpointConfig,

    /// Probe scheduling.
    pub monitor: ScheduleConfig,

    /// Indicator element and its presentation classes.
    pub indicator: IndicatorConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Endpoint configuration.
///
/// The host page's `data-heartbeat-url` takes precedence; this value is the
/// fallback when the page carries none.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EndpointConfig {
    /// Absolute URL of the heartbeat endpoint.
    pub url: Option<String>,
}

/// What to do when a tick fires while the previous probe is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Start the new probe anyway; the last one to finish wins.
    #[default]
    Allow,
    /// Drop the tick.
    Skip,
}

/// Probe scheduling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Interval between probes in milliseconds.
    pub interval_ms: u64,

    /// Per-probe deadline in milliseconds. Unset leaves it to the HTTP client.
    pub timeout_ms: Option<u64>,

    /// Overlapping probe handling.
    pub overlap: OverlapPolicy,
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            timeout_ms: None,
            overlap: OverlapPolicy::Allow,
        }
    }
}

/// Indicator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Attribute selector locating the indicator element.
    pub selector: String,

    /// Classes the element carries before the first probe completes.
    pub initial_classes: Vec<String>,

    /// Classes applied when the endpoint is alive.
    pub alive_classes: Vec<String>,

    /// Classes applied when the endpoint is down.
    pub down_classes: Vec<String>,

    /// Leftover static-markup classes stripped on the first alive result.
    pub stale_classes: Vec<String>,
}

fn classes(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            selector: r#"[data-lucide="heart"]"#.to_string(),
            initial_classes: classes(&["text-red-500", "opacity-50"]),
            alive_classes: classes(&["text-green-500", "animate-pulse"]),
            down_classes: classes(&["text-red-500", "opacity-70"]),
            stale_classes: classes(&["opacity-50"]),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
