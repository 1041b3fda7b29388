//! Heartbeat monitor library.
//!
//! Polls a health endpoint on a fixed interval and reflects the result on a
//! heart indicator: alive (green, pulsing) or down (red, dimmed).

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod page;

pub use config::MonitorConfig;
pub use health::{HealthState, HeartbeatMonitor, MonitorHandle};
pub use lifecycle::Runtime;
