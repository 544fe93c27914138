//! Core ProductCatalog trait

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::types::{CatalogPayload, CatalogStats, ProductRecord, QueryParams};

/// Operations exposed to hosts (UI panels, CLIs, services).
///
/// Implementations share one catalog cache and one search memo across all
/// calls; clearing one clears both.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch the catalog, serving a fresh cached copy unless `force_refresh`.
    async fn get_catalog(
        &self,
        params: &QueryParams,
        force_refresh: bool,
    ) -> Result<Arc<CatalogPayload>>;

    /// Exact-match lookup on the product identifier.
    async fn search_by_identifier(&self, query: &str, use_cache: bool)
    -> Result<Vec<ProductRecord>>;

    /// Record counts by status and type.
    async fn get_stats(&self) -> Result<CatalogStats>;

    /// Warm the catalog cache; never fails.
    async fn preload(&self);

    /// Drop the cached catalog and all memoized searches.
    async fn clear_cache(&self);
}
