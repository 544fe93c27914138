//! Resilient fetching of catalog payloads.
//!
//! A [`Transport`] performs single HTTP GETs. [`RetryingFetcher`] wraps one
//! with a [`RetryPolicy`]: every attempt is bounded by a timeout, failed
//! attempts are retried after a constant delay, and only the final failure
//! leaves the fetcher.

pub mod http;
pub mod retry;
pub mod traits;

pub use http::ReqwestTransport;
pub use retry::{RetryPolicy, RetryingFetcher};
pub use traits::{HttpResponse, Transport};
