//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//!     → handed to the monitor at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the endpoint never changes at runtime
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::EndpointConfig;
pub use schema::IndicatorConfig;
pub use schema::MonitorConfig;
pub use schema::ObservabilityConfig;
pub use schema::OverlapPolicy;
pub use schema::ScheduleConfig;
