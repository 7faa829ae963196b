//! Network seam for scriptdeck
//!
//! Every remote read (metadata document, raw script text) goes through
//! [`Transport`]. Production uses [`HttpTransport`] (reqwest); tests and
//! offline demos use [`MemoryTransport`].

use crate::error::CoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Raw result of one GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches a URL as text
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one GET request
    ///
    /// Non-success statuses are returned, not raised; only a transport
    /// failure (DNS, TLS, connection reset) is an `Err`.
    async fn fetch(&self, url: &str) -> Result<FetchResponse, CoreError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("scriptdeck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CoreError::InvalidConfig {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, CoreError> {
        tracing::debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CoreError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|source| CoreError::Transport {
                url: url.to_string(),
                source,
            })?;

        Ok(FetchResponse { status, body })
    }
}

/// In-memory transport keyed by URL, with per-URL call counting
///
/// Unknown URLs answer 404.
#[derive(Default)]
pub struct MemoryTransport {
    responses: DashMap<String, FetchResponse>,
    calls: DashMap<String, usize>,
    total: AtomicUsize,
    delay: Option<Duration>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response, to hold requests in flight
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Serve `body` with status 200 at `url`
    pub fn with_text(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(url, FetchResponse::ok(body));
        self
    }

    /// Answer `url` with a bare status code
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.insert(
            url,
            FetchResponse {
                status,
                body: String::new(),
            },
        );
        self
    }

    /// Replace the response for `url`
    pub fn insert(&self, url: impl Into<String>, response: FetchResponse) {
        self.responses.insert(url.into(), response);
    }

    /// Requests issued for `url` so far
    pub fn calls(&self, url: &str) -> usize {
        self.calls.get(url).map(|c| *c).unwrap_or(0)
    }

    /// Requests issued for any URL so far
    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, CoreError> {
        *self.calls.entry(url.to_string()).or_insert(0) += 1;
        self.total.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self
            .responses
            .get(url)
            .map(|r| r.value().clone())
            .unwrap_or(FetchResponse {
                status: 404,
                body: "404: Not Found".to_string(),
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(FetchResponse::ok("x").is_success());
        assert!(FetchResponse {
            status: 204,
            body: String::new()
        }
        .is_success());
        assert!(!FetchResponse {
            status: 404,
            body: String::new()
        }
        .is_success());
        assert!(!FetchResponse {
            status: 301,
            body: String::new()
        }
        .is_success());
    }

    #[tokio::test]
    async fn test_memory_transport_counts_calls() {
        let transport = MemoryTransport::new()
            .with_text("https://host/a", "alpha")
            .with_status("https://host/b", 500);

        let a = transport.fetch("https://host/a").await.unwrap();
        assert_eq!(a.body, "alpha");

        let b = transport.fetch("https://host/b").await.unwrap();
        assert_eq!(b.status, 500);

        let missing = transport.fetch("https://host/c").await.unwrap();
        assert_eq!(missing.status, 404);

        transport.fetch("https://host/a").await.unwrap();
        assert_eq!(transport.calls("https://host/a"), 2);
        assert_eq!(transport.calls("https://host/zzz"), 0);
        assert_eq!(transport.total_calls(), 4);
    }
}
