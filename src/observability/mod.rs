//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Monitor produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (probe counters, health gauge)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
