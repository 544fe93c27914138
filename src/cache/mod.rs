//! Caching subsystem.
//!
//! Two caches sit in front of the network:
//!
//! - [`CatalogSlot`] - the last fetched catalog with a TTL. Consulted by
//!   [`CatalogService`](crate::service::CatalogService) before any fetch.
//!
//! - [`SearchHistory`] - search results memoized by raw query string,
//!   bounded with FIFO eviction.
//!
//! Search results are derived from the catalog, so the two are kept behind
//! one lock in [`CacheLayer`] and cleared together.

pub mod catalog;
pub mod history;

pub use catalog::CatalogSlot;
pub use history::SearchHistory;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::telemetry;
use crate::types::{CatalogPayload, ProductRecord};

/// Configuration for both caches.
///
/// ```rust
/// # use prodcat::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .ttl(Duration::from_secs(60))
///     .max_size(500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a fetched catalog stays fresh. Default: 5 minutes.
    pub ttl: Duration,
    /// Maximum number of memoized search queries. Default: 100.
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_size: 100,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn max_size(mut self, n: usize) -> Self {
        self.max_size = n;
        self
    }
}

#[derive(Debug)]
struct CacheState {
    catalog: CatalogSlot,
    history: SearchHistory,
    /// Bumped by every [`CacheLayer::clear`].
    generation: u64,
}

/// Catalog slot and search history guarded by a single lock.
///
/// Construct one per gateway and share it through an `Arc`; tests get
/// isolation by building a fresh instance.
#[derive(Debug)]
pub struct CacheLayer {
    state: Mutex<CacheState>,
}

impl CacheLayer {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            state: Mutex::new(CacheState {
                catalog: CatalogSlot::new(config.ttl),
                history: SearchHistory::new(config.max_size),
                generation: 0,
            }),
        }
    }

    pub async fn is_catalog_valid(&self) -> bool {
        self.state.lock().await.catalog.is_valid_at(Instant::now())
    }

    /// The cached catalog if still fresh.
    pub async fn catalog(&self) -> Option<Arc<CatalogPayload>> {
        self.state.lock().await.catalog.get_at(Instant::now())
    }

    /// Store a freshly fetched catalog, restarting its TTL.
    pub async fn put_catalog(&self, payload: Arc<CatalogPayload>) {
        self.state
            .lock()
            .await
            .catalog
            .put_at(payload, Instant::now());
    }

    /// Memoized results for an exact query string.
    pub async fn search_result(&self, query: &str) -> Option<Vec<ProductRecord>> {
        self.state.lock().await.history.get(query).map(<[_]>::to_vec)
    }

    pub async fn store_search(&self, query: &str, results: Vec<ProductRecord>) {
        let evicted = self
            .state
            .lock()
            .await
            .history
            .insert(query.to_string(), results);
        record_evictions(&evicted);
    }

    /// Store results computed while the cache was at `generation`.
    ///
    /// Returns `false` without storing when a [`clear`](Self::clear) has
    /// happened since.
    pub async fn store_search_from(
        &self,
        generation: u64,
        query: &str,
        results: Vec<ProductRecord>,
    ) -> bool {
        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!(query, "cache cleared during search, result not memoized");
            return false;
        }
        let evicted = state.history.insert(query.to_string(), results);
        drop(state);
        record_evictions(&evicted);
        true
    }

    /// Current clear count, for use with [`store_search_from`](Self::store_search_from).
    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }

    pub async fn search_history_len(&self) -> usize {
        self.state.lock().await.history.len()
    }

    /// Drop the catalog and every memoized search in one step.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.catalog.clear();
        state.history.clear();
        state.generation = state.generation.wrapping_add(1);
    }
}

fn record_evictions(evicted: &[String]) {
    if !evicted.is_empty() {
        debug!(count = evicted.len(), "evicted oldest search results");
        metrics::counter!(telemetry::SEARCH_CACHE_EVICTIONS_TOTAL).increment(evicted.len() as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Arc<CatalogPayload> {
        Arc::new(CatalogPayload::from_products(vec![ProductRecord::new("A1")]))
    }

    #[test]
    fn config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_size, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn catalog_expires_with_clock() {
        let layer = CacheLayer::new(&CacheConfig::new().ttl(Duration::from_secs(60)));
        layer.put_catalog(payload()).await;
        assert!(layer.is_catalog_valid().await);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(layer.catalog().await.is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(layer.catalog().await.is_none());
        assert!(!layer.is_catalog_valid().await);
    }

    #[tokio::test]
    async fn clear_cascades_to_search_history() {
        let layer = CacheLayer::new(&CacheConfig::default());
        layer.put_catalog(payload()).await;
        layer.store_search("A1", vec![ProductRecord::new("A1")]).await;
        assert_eq!(layer.search_history_len().await, 1);

        layer.clear().await;
        assert!(layer.catalog().await.is_none());
        assert!(layer.search_result("A1").await.is_none());
        assert_eq!(layer.search_history_len().await, 0);
    }

    #[tokio::test]
    async fn stale_generation_is_not_memoized() {
        let layer = CacheLayer::new(&CacheConfig::default());
        let before = layer.generation().await;
        layer.clear().await;

        let stored = layer
            .store_search_from(before, "A1", vec![ProductRecord::new("A1")])
            .await;
        assert!(!stored);
        assert!(layer.search_result("A1").await.is_none());

        let current = layer.generation().await;
        assert_ne!(current, before);
        assert!(layer.store_search_from(current, "A1", vec![]).await);
        assert_eq!(layer.search_result("A1").await, Some(vec![]));
    }

    #[tokio::test]
    async fn store_search_respects_bound() {
        let layer = CacheLayer::new(&CacheConfig::new().max_size(2));
        for q in ["a", "b", "c"] {
            layer.store_search(q, vec![]).await;
        }
        assert_eq!(layer.search_history_len().await, 2);
        assert!(layer.search_result("a").await.is_none());
        assert!(layer.search_result("c").await.is_some());
    }
}
