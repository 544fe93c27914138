//! Retry policy and the retrying fetcher.
//!
//! Unlike exponential schemes, the delay between attempts is constant. A
//! timed-out attempt is cancelled on its own; the retry sequence carries on
//! with the next attempt.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tracing::{debug, warn};

use super::traits::Transport;
use crate::error::NetworkError;
use crate::telemetry;
use crate::types::CatalogPayload;

/// Retry configuration for catalog fetches.
///
/// ```rust
/// # use prodcat::RetryPolicy;
/// # use std::time::Duration;
/// let policy = RetryPolicy::new()
///     .max_attempts(5)
///     .delay(Duration::from_millis(250))
///     .timeout(Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Default: 3.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one. Default: 1s.
    pub delay: Duration,
    /// Upper bound on a single attempt. Default: 10s.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single attempt, no retry.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Run `f` up to `policy.max_attempts` times.
///
/// Each call is raced against `policy.timeout`; losing the race counts as a
/// [`NetworkError::Timeout`] attempt. Transient failures are retried after
/// `policy.delay` (never after the last attempt). Permanent failures return
/// immediately. The closure receives the 1-indexed attempt number.
pub(crate) async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    transport: &str,
    f: F,
) -> Result<T, NetworkError>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<T, NetworkError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_err = None;
    for attempt in 1..=max_attempts {
        metrics::counter!(telemetry::FETCH_ATTEMPTS_TOTAL, "transport" => transport.to_owned())
            .increment(1);
        let err = match tokio::time::timeout(policy.timeout, f(attempt)).await {
            Ok(Ok(value)) => {
                debug!(transport, attempt, max_attempts, "fetch attempt succeeded");
                return Ok(value);
            }
            Ok(Err(e)) if !e.is_transient() => return Err(e),
            Ok(Err(e)) => e,
            Err(_) => NetworkError::Timeout,
        };
        warn!(
            transport,
            attempt,
            max_attempts,
            error = %err,
            "fetch attempt failed"
        );
        if attempt < max_attempts {
            metrics::counter!(telemetry::RETRIES_TOTAL, "transport" => transport.to_owned())
                .increment(1);
            tokio::time::sleep(policy.delay).await;
        }
        last_err = Some(err);
    }
    Err(last_err.unwrap_or_else(|| NetworkError::Unknown("no fetch attempt made".into())))
}

/// Fetches and validates catalog payloads over a [`Transport`], with retry.
pub struct RetryingFetcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET `url` and parse the body as a [`CatalogPayload`].
    ///
    /// Non-2xx statuses surface as [`NetworkError::HttpStatus`] and are
    /// retried. A body without the expected shape is
    /// [`NetworkError::MalformedResponse`] and is not.
    pub async fn fetch(&self, url: &Url) -> Result<CatalogPayload, NetworkError> {
        let transport = self.transport.as_ref();
        let response = with_retry(&self.policy, transport.name(), |_attempt| async move {
            let response = transport.get(url).await?;
            if !response.is_success() {
                return Err(NetworkError::HttpStatus(response.status));
            }
            Ok(response)
        })
        .await?;
        CatalogPayload::from_json(&response.body)
    }
}
