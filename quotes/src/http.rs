//! HTTP transport seam.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::error::{QuoteError, QuoteResult};

/// Default HTTP request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw response as handed to the mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Trait for the transport that performs feed requests.
///
/// Implementations perform exactly one GET per call and must report every
/// failure to complete the exchange (DNS, TLS, timeout, reset, cancellation)
/// as [`QuoteError::Connectivity`]. Any response that arrives, whatever its
/// status, is returned as `Ok`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &Url) -> QuoteResult<HttpResponse>;
}

/// [`HttpClient`] backed by `reqwest`.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a client with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client, falling back to defaults without timeout");
                Client::new()
            });

        Self { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &Url) -> QuoteResult<HttpResponse> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| QuoteError::Connectivity(e.to_string()))?;

        let status = response.status().as_u16();

        // A body cut off mid-stream is a transport failure, not bad data.
        let body = response
            .bytes()
            .await
            .map_err(|e| QuoteError::Connectivity(e.to_string()))?;

        debug!(url = %url, status, bytes = body.len(), "Feed responded");

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

/// Recording HTTP client for tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct HttpClientSpy {
    requested_urls: parking_lot::Mutex<Vec<Url>>,
    result: parking_lot::Mutex<Option<Result<HttpResponse, String>>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl HttpClientSpy {
    /// Create a spy with no scripted result. Calls fail until one is set.
    pub fn new() -> Self {
        Self {
            requested_urls: parking_lot::Mutex::new(Vec::new()),
            result: parking_lot::Mutex::new(None),
        }
    }

    /// URLs requested so far, in call order.
    pub fn requested_urls(&self) -> Vec<Url> {
        self.requested_urls.lock().clone()
    }

    /// Answer every call with the given status and body.
    pub fn complete_with(&self, status: u16, body: impl Into<Vec<u8>>) {
        *self.result.lock() = Some(Ok(HttpResponse::new(status, body)));
    }

    /// Answer every call with `200 {}`.
    pub fn complete_with_empty_response(&self) {
        self.complete_with(200, b"{}".to_vec());
    }

    /// Fail every call at the transport level.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.result.lock() = Some(Err(message.into()));
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for HttpClientSpy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl HttpClient for HttpClientSpy {
    async fn get(&self, url: &Url) -> QuoteResult<HttpResponse> {
        self.requested_urls.lock().push(url.clone());

        let scripted = self.result.lock().clone();
        match scripted {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(QuoteError::Connectivity(message)),
            None => Err(QuoteError::Connectivity("no scripted result".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spy_records_urls_and_replays_result() {
        let spy = HttpClientSpy::new();
        spy.complete_with(200, b"{}".to_vec());
        let url = Url::parse("http://any-url.com/a").unwrap();

        let response = spy.get(&url).await.unwrap();

        assert_eq!(response, HttpResponse::new(200, b"{}".to_vec()));
        assert_eq!(spy.requested_urls(), vec![url]);
    }

    #[tokio::test]
    async fn test_spy_without_result_fails_as_connectivity() {
        let spy = HttpClientSpy::new();
        let url = Url::parse("http://any-url.com/a").unwrap();

        let result = spy.get(&url).await;

        assert!(matches!(result, Err(QuoteError::Connectivity(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connectivity_error() {
        let client = ReqwestHttpClient::with_timeout(Duration::from_millis(500));
        let url = Url::parse("http://127.0.0.1:1/currencies/last/USD-BRL").unwrap();

        let result = client.get(&url).await;

        assert!(matches!(result, Err(QuoteError::Connectivity(_))));
    }
}
