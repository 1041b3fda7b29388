//! Heartbeat subsystem.
//!
//! # Data Flow
//! ```text
//! monitor.rs:
//!     Periodic timer (first tick immediate)
//!     → probe.rs (HTTP GET, success status, JSON body)
//!     → state.rs (Alive / Down)
//!     → indicator.rs (class list mutation on the page)
//! ```
//!
//! # Design Decisions
//! - Every probe error collapses to Down; nothing propagates to callers
//! - No hysteresis: each probe's outcome is applied as-is
//! - Probes may overlap unless the skip policy is configured; last write wins

pub mod indicator;
pub mod monitor;
pub mod probe;
pub mod state;

pub use indicator::{Indicator, IndicatorStyles, PageIndicator};
pub use monitor::{HeartbeatMonitor, MonitorHandle};
pub use probe::{HeartbeatPayload, HttpProbe, ProbeError};
pub use state::HealthState;
