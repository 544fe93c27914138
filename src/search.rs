//! Exact identifier search over the cached catalog.
//!
//! Matching is a linear scan: the query is trimmed and (unless
//! case-sensitive) lower-cased, each identifier is lower-cased the same way,
//! and only equal strings match. Identifiers are not trimmed, so a catalog
//! entry `"A1 "` never matches. No index is built over the catalog; only
//! query results are memoized, keyed by the raw query string.

use std::sync::Arc;

use tracing::debug;

use crate::cache::CacheLayer;
use crate::error::InvalidQuery;
use crate::service::CatalogService;
use crate::telemetry;
use crate::types::{ProductRecord, QueryParams};
use crate::Result;

/// Search behaviour.
///
/// ```rust
/// # use prodcat::SearchConfig;
/// let config = SearchConfig::new().min_length(3).case_sensitive(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Minimum trimmed query length in characters. Default: 1.
    pub min_length: usize,
    /// Compare identifiers without case folding. Default: false.
    pub case_sensitive: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_length: 1,
            case_sensitive: false,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = n;
        self
    }

    pub fn case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }
}

/// Reject blank queries and queries shorter than `min_length` once trimmed.
pub fn validate_query(query: &str, min_length: usize) -> std::result::Result<(), InvalidQuery> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(InvalidQuery::Empty);
    }
    let len = trimmed.chars().count();
    if len < min_length {
        return Err(InvalidQuery::TooShort {
            min: min_length,
            len,
        });
    }
    Ok(())
}

fn fold(s: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        s.to_string()
    } else {
        s.to_lowercase()
    }
}

/// All records whose identifier equals the normalized query, in catalog order.
///
/// Records without an identifier are skipped.
pub fn match_identifier(
    products: &[ProductRecord],
    query: &str,
    case_sensitive: bool,
) -> Vec<ProductRecord> {
    let needle = fold(query.trim(), case_sensitive);
    if needle.is_empty() {
        return Vec::new();
    }
    products
        .iter()
        .filter(|p| {
            p.identifier()
                .is_some_and(|id| fold(id, case_sensitive) == needle)
        })
        .cloned()
        .collect()
}

/// Identifier lookups backed by the catalog service and the search memo.
pub struct SearchEngine {
    service: Arc<CatalogService>,
    cache: Arc<CacheLayer>,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(service: Arc<CatalogService>, config: SearchConfig) -> Self {
        let cache = Arc::clone(service.cache());
        Self {
            service,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find every product whose identifier matches `query` exactly.
    ///
    /// Validation failures return before touching any cache. With
    /// `use_cache`, a memoized result for the raw `query` string is returned
    /// without consulting the catalog, and fresh results (including empty
    /// ones) are memoized unless the cache was cleared mid-search.
    pub async fn search_by_identifier(
        &self,
        query: &str,
        use_cache: bool,
    ) -> Result<Vec<ProductRecord>> {
        validate_query(query, self.config.min_length)?;

        if use_cache {
            if let Some(results) = self.cache.search_result(query).await {
                debug!(query, matches = results.len(), "search served from history");
                metrics::counter!(telemetry::SEARCH_CACHE_HITS_TOTAL).increment(1);
                return Ok(results);
            }
            metrics::counter!(telemetry::SEARCH_CACHE_MISSES_TOTAL).increment(1);
        }

        let generation = self.cache.generation().await;
        let catalog = self.service.get_catalog(&QueryParams::new(), false).await?;
        let results = match_identifier(catalog.products(), query, self.config.case_sensitive);
        debug!(
            query,
            matches = results.len(),
            scanned = catalog.products().len(),
            "catalog scanned"
        );

        if use_cache {
            self.cache
                .store_search_from(generation, query, results.clone())
                .await;
        }
        Ok(results)
    }
}
