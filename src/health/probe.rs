//! Single liveness probe against the heartbeat endpoint.
//!
//! # Responsibilities
//! - Issue the GET request
//! - Classify the outcome (success status + JSON body, or a `ProbeError`)
//!
//! # Design Decisions
//! - Any JSON body is accepted; known fields are decoded for logging only
//! - The deadline is optional; without one the HTTP client's own limits apply

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tokio::time;
use url::Url;

/// Ways a probe can fail. All of them mean Down.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("connection error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("non-success status {0}")]
    NonSuccess(StatusCode),

    #[error("response body is not JSON: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

impl ProbeError {
    /// Short label used in logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            ProbeError::Network(_) => "network",
            ProbeError::Timeout(_) => "timeout",
            ProbeError::NonSuccess(_) => "status",
            ProbeError::InvalidPayload(_) => "payload",
        }
    }
}

/// Fields the heartbeat endpoint usually returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeartbeatPayload {
    pub status: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
}

/// HTTP prober for a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    endpoint: Url,
    timeout: Option<Duration>,
}

impl HttpProbe {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn probe(&self) -> Result<HeartbeatPayload, ProbeError> {
        match self.timeout {
            Some(limit) => time::timeout(limit, self.fetch())
                .await
                .map_err(|_| ProbeError::Timeout(limit))?,
            None => self.fetch().await,
        }
    }

    async fn fetch(&self) -> Result<HeartbeatPayload, ProbeError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header("user-agent", "heartbeat-monitor")
            .send()
            .await
            .map_err(ProbeError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::NonSuccess(status));
        }

        let body = response.bytes().await.map_err(ProbeError::Network)?;
        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(ProbeError::InvalidPayload)?;

        // Non-object bodies still count as alive.
        Ok(serde_json::from_value(value).unwrap_or_default())
    }
}
