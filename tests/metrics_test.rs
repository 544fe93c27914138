//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use reqwest::Url;
use serde_json::json;

use prodcat::telemetry;
use prodcat::{
    CacheConfig, HttpResponse, NetworkError, Prodcat, ProductCatalog, QueryParams, RetryPolicy,
    Transport,
};

// ============================================================================
// Mock transport
// ============================================================================

/// Fails the first `failures` requests, then serves a two-product catalog.
struct FlakyTransport {
    failures: u32,
    calls: AtomicU32,
}

impl FlakyTransport {
    fn new(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            failures,
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl Transport for FlakyTransport {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn get(&self, _url: &Url) -> Result<HttpResponse, NetworkError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if n < self.failures {
            return Err(NetworkError::Unknown("connection reset".into()));
        }
        let body = json!({"data": {"products": [{"product_no": "A1"}, {"product_no": "B2"}]}});
        Ok(HttpResponse::new(200, body.to_string()))
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn policy() -> RetryPolicy {
    RetryPolicy::new()
        .max_attempts(3)
        .delay(Duration::from_millis(1))
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn retries_are_counted_per_attempt() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let catalog = Prodcat::builder()
                    .transport(FlakyTransport::new(2))
                    .retry_policy(policy())
                    .build()
                    .unwrap();
                catalog.get_catalog(&QueryParams::new(), false).await
            })
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::FETCH_ATTEMPTS_TOTAL), 3);
    assert_eq!(counter_total(&snapshot, telemetry::RETRIES_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::CATALOG_CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CATALOG_CACHE_HITS_TOTAL), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_hits_and_misses_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let catalog = Prodcat::builder()
                    .transport(FlakyTransport::new(0))
                    .retry_policy(policy())
                    .cache(CacheConfig::new().max_size(1))
                    .build()
                    .unwrap();
                catalog.preload().await;
                catalog.search_by_identifier("A1", true).await.unwrap();
                catalog.search_by_identifier("A1", true).await.unwrap();
                catalog.search_by_identifier("B2", true).await.unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    // preload misses; the two scanning searches hit the fresh catalog
    assert_eq!(counter_total(&snapshot, telemetry::CATALOG_CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CATALOG_CACHE_HITS_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::SEARCH_CACHE_MISSES_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::SEARCH_CACHE_HITS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::SEARCH_CACHE_EVICTIONS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::FETCH_ATTEMPTS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::RETRIES_TOTAL), 0);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let catalog = Prodcat::builder()
        .transport(FlakyTransport::new(1))
        .retry_policy(policy())
        .build()
        .unwrap();
    catalog.search_by_identifier("B2", true).await.unwrap();
}
