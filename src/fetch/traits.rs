//! Transport seam between the fetcher and the HTTP stack.

use async_trait::async_trait;
use reqwest::Url;

use crate::error::NetworkError;

/// Raw HTTP answer: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a single GET request.
///
/// Implementations must not retry; retries and per-attempt timeouts belong
/// to [`RetryingFetcher`](super::RetryingFetcher). Dropping the returned
/// future aborts the request. Failures before a status line is received
/// are reported as [`NetworkError::Timeout`] or [`NetworkError::Unknown`];
/// non-2xx statuses are returned as a normal [`HttpResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging/metrics.
    fn name(&self) -> &str;

    async fn get(&self, url: &Url) -> Result<HttpResponse, NetworkError>;
}
