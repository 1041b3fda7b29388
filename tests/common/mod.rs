//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use heartbeat_monitor::config::{IndicatorConfig, OverlapPolicy};
use heartbeat_monitor::health::{HeartbeatMonitor, HttpProbe, IndicatorStyles, PageIndicator};
use heartbeat_monitor::lifecycle::build_page;
use heartbeat_monitor::page::{Selector, SharedDocument};
use url::Url;

/// Canned response from a mock endpoint.
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    #[allow(dead_code)]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        204 => "204 No Content",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a programmable mock endpoint on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        // Drain the request head; the monitor only sends GETs.
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;

                        let reply = f().await;
                        tokio::time::sleep(reply.delay).await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line(reply.status),
                            reply.body.len(),
                            reply.body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A page with the default heart indicator and a monitor pointed at `addr`.
pub fn monitor_for(addr: SocketAddr) -> (Arc<HeartbeatMonitor>, SharedDocument, Selector) {
    monitor_with(addr, OverlapPolicy::Allow, Duration::from_secs(2))
}

pub fn monitor_with(
    addr: SocketAddr,
    overlap: OverlapPolicy,
    timeout: Duration,
) -> (Arc<HeartbeatMonitor>, SharedDocument, Selector) {
    let config = IndicatorConfig::default();
    let selector = Selector::parse(&config.selector).unwrap();
    let document = SharedDocument::new(build_page(&config, &selector, None));

    let indicator = PageIndicator::new(
        document.clone(),
        selector.clone(),
        IndicatorStyles::from_config(&config),
    );
    let url = Url::parse(&format!("http://{}/heartbeat", addr)).unwrap();
    let probe = HttpProbe::new(url).with_timeout(Some(timeout));
    let monitor = HeartbeatMonitor::new(probe, Arc::new(indicator)).with_overlap(overlap);

    (Arc::new(monitor), document, selector)
}

/// Classes currently on the heart, or `None` if it is gone.
pub fn heart_classes(document: &SharedDocument, selector: &Selector) -> Option<String> {
    document
        .read()
        .query_selector(selector)
        .map(|e| e.classes().to_string())
}
