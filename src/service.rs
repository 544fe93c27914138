//! Catalog service: TTL cache in front of the retrying fetcher.

use std::sync::Arc;

use reqwest::Url;
use tracing::{debug, error, info, warn};

use crate::cache::CacheLayer;
use crate::fetch::RetryingFetcher;
use crate::telemetry;
use crate::types::{CatalogPayload, CatalogStats, ParamValue, QueryParams, merge_params};
use crate::{ProdcatError, Result};

/// Page size requested when computing statistics on a cache miss.
pub const DEFAULT_STATS_PAGE_SIZE: u32 = 1000;

/// Fetches the catalog through the cache and derives statistics from it.
pub struct CatalogService {
    fetcher: RetryingFetcher,
    cache: Arc<CacheLayer>,
    endpoint: Url,
    default_params: QueryParams,
    stats_page_size: u32,
}

impl CatalogService {
    pub fn new(
        fetcher: RetryingFetcher,
        cache: Arc<CacheLayer>,
        endpoint: Url,
        default_params: QueryParams,
    ) -> Self {
        Self {
            fetcher,
            cache,
            endpoint,
            default_params,
            stats_page_size: DEFAULT_STATS_PAGE_SIZE,
        }
    }

    /// Set the page size used by [`get_stats`](Self::get_stats).
    pub fn stats_page_size(mut self, n: u32) -> Self {
        self.stats_page_size = n;
        self
    }

    pub fn cache(&self) -> &Arc<CacheLayer> {
        &self.cache
    }

    /// Endpoint URL with `params` merged over the default parameter set.
    pub fn catalog_url(&self, params: &QueryParams) -> Url {
        let merged = merge_params(&self.default_params, params);
        let mut url = self.endpoint.clone();
        if !merged.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(merged.iter().map(|(k, v)| (k, v.to_string())));
        }
        url
    }

    /// Return the catalog, fetching only if the cache is stale or
    /// `force_refresh` is set.
    ///
    /// A fresh cached payload is returned whatever `params` says: the cache
    /// holds one catalog, not one per parameter set.
    pub async fn get_catalog(
        &self,
        params: &QueryParams,
        force_refresh: bool,
    ) -> Result<Arc<CatalogPayload>> {
        if !force_refresh {
            if let Some(payload) = self.cache.catalog().await {
                debug!("catalog served from cache");
                metrics::counter!(telemetry::CATALOG_CACHE_HITS_TOTAL).increment(1);
                return Ok(payload);
            }
        }
        metrics::counter!(telemetry::CATALOG_CACHE_MISSES_TOTAL).increment(1);

        let url = self.catalog_url(params);
        let payload = match self.fetcher.fetch(&url).await {
            Ok(payload) => Arc::new(payload),
            Err(e) => {
                error!(%url, error = %e, "failed to fetch catalog");
                return Err(ProdcatError::Network(e));
            }
        };
        info!(
            products = payload.products().len(),
            force_refresh, "catalog refreshed"
        );
        self.cache.put_catalog(Arc::clone(&payload)).await;
        Ok(payload)
    }

    /// Count records by status and by type.
    ///
    /// Uses the cached catalog when fresh; otherwise fetches one large page.
    pub async fn get_stats(&self) -> Result<CatalogStats> {
        let params = QueryParams::from([(
            "page_size".to_string(),
            ParamValue::from(self.stats_page_size),
        )]);
        let payload = self.get_catalog(&params, false).await?;
        Ok(CatalogStats::from_products(payload.products()))
    }

    /// Warm the catalog cache. Failures are logged and swallowed.
    pub async fn preload(&self) {
        info!("preloading catalog");
        match self.get_catalog(&QueryParams::new(), false).await {
            Ok(payload) => info!(products = payload.products().len(), "catalog preloaded"),
            Err(e) => warn!(error = %e, "catalog preload failed"),
        }
    }

    /// Drop the cached catalog and all memoized searches.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        info!("catalog and search caches cleared");
    }
}
