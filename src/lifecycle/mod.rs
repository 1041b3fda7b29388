//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Build page → Resolve endpoint → Build monitor
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop the monitor loop
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Shutdown stops the loop and cancels in-flight probes

pub mod signals;
pub mod startup;

pub use signals::wait_for_signal;
pub use startup::{build_page, resolve_endpoint, Runtime, StartupError};
