//! In-process model of the status page.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     body data attributes → endpoint URL (data-heartbeat-url)
//!     indicator element → seeded with static markup classes
//!
//! Every probe:
//!     selector.rs locates the indicator (never cached)
//!     → document.rs class list mutation
//! ```
//!
//! # Design Decisions
//! - Flat element list; the page has no meaningful hierarchy
//! - Selectors are attribute selectors only
//! - Shared behind a lock; every mutation is a short critical section

pub mod document;
pub mod selector;

pub use document::{ClassList, Document, Element, SharedDocument};
pub use selector::{Selector, SelectorError};

/// Body data attribute carrying the heartbeat endpoint.
pub const HEARTBEAT_URL_KEY: &str = "heartbeat-url";
