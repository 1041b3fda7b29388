//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval > 0, timeout > 0)
//! - Check the endpoint and selector are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::MonitorConfig;
use crate::page::Selector;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("monitor.interval_ms must be greater than zero")]
    ZeroInterval,

    #[error("monitor.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("endpoint.url {url:?} is not a valid http(s) URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("indicator.selector {selector:?} is invalid: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("indicator.{0} must name at least one class")]
    EmptyClassSet(&'static str),

    #[error("indicator.{field} contains invalid class name {name:?}")]
    InvalidClassName { field: &'static str, name: String },
}

/// Parse an endpoint URL, accepting only http and https.
pub fn parse_endpoint(raw: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {}", other))),
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.monitor.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.monitor.timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if let Some(raw) = &config.endpoint.url {
        if let Err(e) = parse_endpoint(raw) {
            errors.push(e);
        }
    }

    let indicator = &config.indicator;
    if let Err(e) = Selector::parse(&indicator.selector) {
        errors.push(ValidationError::InvalidSelector {
            selector: indicator.selector.clone(),
            reason: e.to_string(),
        });
    }

    for (field, set) in [
        ("alive_classes", &indicator.alive_classes),
        ("down_classes", &indicator.down_classes),
    ] {
        if set.is_empty() {
            errors.push(ValidationError::EmptyClassSet(field));
        }
    }

    for (field, set) in [
        ("initial_classes", &indicator.initial_classes),
        ("alive_classes", &indicator.alive_classes),
        ("down_classes", &indicator.down_classes),
        ("stale_classes", &indicator.stale_classes),
    ] {
        for name in set {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                errors.push(ValidationError::InvalidClassName {
                    field,
                    name: name.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
