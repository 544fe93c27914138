//! CatalogGateway - in-process catalog access

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::CacheLayer;
use crate::search::SearchEngine;
use crate::service::CatalogService;
use crate::types::{CatalogPayload, CatalogStats, ProductRecord, QueryParams};
use crate::{ProductCatalog, Result};

/// Catalog service and search engine sharing one cache layer.
///
/// Built via [`Prodcat::builder()`](super::Prodcat::builder).
pub struct CatalogGateway {
    service: Arc<CatalogService>,
    search: SearchEngine,
}

impl CatalogGateway {
    pub(crate) fn new(service: Arc<CatalogService>, search: SearchEngine) -> Self {
        Self { service, search }
    }

    pub fn service(&self) -> &CatalogService {
        &self.service
    }

    pub fn search_engine(&self) -> &SearchEngine {
        &self.search
    }

    pub fn cache(&self) -> &Arc<CacheLayer> {
        self.service.cache()
    }
}

#[async_trait]
impl ProductCatalog for CatalogGateway {
    async fn get_catalog(
        &self,
        params: &QueryParams,
        force_refresh: bool,
    ) -> Result<Arc<CatalogPayload>> {
        self.service.get_catalog(params, force_refresh).await
    }

    async fn search_by_identifier(
        &self,
        query: &str,
        use_cache: bool,
    ) -> Result<Vec<ProductRecord>> {
        self.search.search_by_identifier(query, use_cache).await
    }

    async fn get_stats(&self) -> Result<CatalogStats> {
        self.service.get_stats().await
    }

    async fn preload(&self) {
        self.service.preload().await
    }

    async fn clear_cache(&self) {
        self.service.clear_cache().await
    }
}
