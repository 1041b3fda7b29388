//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the status page with its indicator in the static-markup state
//! - Resolve the endpoint (page data first, config second)
//! - Wire probe, indicator and monitor together

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::validation::{parse_endpoint, ValidationError};
use crate::config::{EndpointConfig, IndicatorConfig, MonitorConfig};
use crate::health::{HeartbeatMonitor, HttpProbe, IndicatorStyles, PageIndicator};
use crate::page::{Document, Element, Selector, SelectorError, SharedDocument, HEARTBEAT_URL_KEY};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no heartbeat endpoint: set data-{} on the page or endpoint.url in the config", HEARTBEAT_URL_KEY)]
    MissingEndpoint,

    #[error("invalid heartbeat endpoint: {0}")]
    InvalidEndpoint(#[from] ValidationError),

    #[error("invalid indicator selector: {0}")]
    InvalidSelector(#[from] SelectorError),
}

/// Build the status page: a body carrying the endpoint as data, and one
/// indicator element with its static-markup classes.
pub fn build_page(indicator: &IndicatorConfig, selector: &Selector, heartbeat_url: Option<&str>) -> Document {
    let mut body = Element::new("body");
    if let Some(url) = heartbeat_url {
        body.set_attribute(format!("data-{}", HEARTBEAT_URL_KEY), url);
    }

    let mut document = Document::with_body(body);
    document.append(selector.template("i").with_classes(&indicator.initial_classes));
    document
}

/// Resolve the endpoint from page data, falling back to configuration.
///
/// A relative page value is resolved against the configured URL.
pub fn resolve_endpoint(document: &Document, config: &EndpointConfig) -> Result<Url, StartupError> {
    let configured = config.url.as_deref().map(parse_endpoint).transpose()?;

    match (document.body().data(HEARTBEAT_URL_KEY), configured) {
        (Some(raw), base) => match (parse_endpoint(raw), base) {
            (Ok(url), _) => Ok(url),
            (Err(_), Some(base)) => base.join(raw).map_err(|e| {
                StartupError::InvalidEndpoint(ValidationError::InvalidUrl {
                    url: raw.to_string(),
                    reason: e.to_string(),
                })
            }),
            (Err(e), None) => Err(e.into()),
        },
        (None, Some(url)) => Ok(url),
        (None, None) => Err(StartupError::MissingEndpoint),
    }
}

/// Everything the binary needs to run.
pub struct Runtime {
    pub document: SharedDocument,
    pub selector: Selector,
    pub monitor: Arc<HeartbeatMonitor>,
    pub interval: Duration,
}

impl Runtime {
    /// Build the page and monitor from validated configuration.
    ///
    /// `page_url` plays the role of the host page's `data-heartbeat-url`.
    pub fn from_config(config: &MonitorConfig, page_url: Option<&str>) -> Result<Self, StartupError> {
        let selector = Selector::parse(&config.indicator.selector)?;
        let document = build_page(&config.indicator, &selector, page_url);
        let endpoint = resolve_endpoint(&document, &config.endpoint)?;

        let document = SharedDocument::new(document);
        let indicator = PageIndicator::new(
            document.clone(),
            selector.clone(),
            IndicatorStyles::from_config(&config.indicator),
        );
        let probe = HttpProbe::new(endpoint).with_timeout(config.monitor.timeout());
        let monitor = HeartbeatMonitor::new(probe, Arc::new(indicator))
            .with_overlap(config.monitor.overlap);

        Ok(Self {
            document,
            selector,
            monitor: Arc::new(monitor),
            interval: config.monitor.interval(),
        })
    }

    /// Current classes of the indicator element, if it exists.
    pub fn indicator_classes(&self) -> Option<String> {
        self.document
            .read()
            .query_selector(&self.selector)
            .map(|e| e.classes().to_string())
    }
}
