//! Builder for configuring gateway instances

use std::sync::Arc;

use reqwest::Url;

use super::CatalogGateway;
use crate::cache::{CacheConfig, CacheLayer};
use crate::fetch::{ReqwestTransport, RetryPolicy, RetryingFetcher, Transport};
use crate::search::{SearchConfig, SearchEngine};
use crate::service::{CatalogService, DEFAULT_STATS_PAGE_SIZE};
use crate::types::{ParamValue, QueryParams, default_query_params};
use crate::{ProdcatError, Result};

/// Default catalog service root.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api";

/// Default product list path, appended to the base URL.
pub const DEFAULT_ENDPOINT: &str = "/product/list";

/// Main entry point for creating gateway instances.
pub struct Prodcat;

impl Prodcat {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> ProdcatBuilder {
        ProdcatBuilder::new()
    }
}

/// Builder for configuring gateway instances.
pub struct ProdcatBuilder {
    base_url: String,
    endpoint: String,
    default_params: QueryParams,
    retry: RetryPolicy,
    cache: CacheConfig,
    search: SearchConfig,
    stats_page_size: u32,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for ProdcatBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProdcatBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            default_params: default_query_params(),
            retry: RetryPolicy::default(),
            cache: CacheConfig::default(),
            search: SearchConfig::default(),
            stats_page_size: DEFAULT_STATS_PAGE_SIZE,
            transport: None,
        }
    }

    /// Service root, e.g. `https://shop.example.com/api`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Path of the product list endpoint under the base URL.
    pub fn endpoint(mut self, path: impl Into<String>) -> Self {
        self.endpoint = path.into();
        self
    }

    /// Replace the whole default parameter set.
    pub fn default_params(mut self, params: QueryParams) -> Self {
        self.default_params = params;
        self
    }

    /// Set or override one default parameter.
    pub fn default_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.default_params.insert(key.into(), value.into());
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    pub fn search(mut self, config: SearchConfig) -> Self {
        self.search = config;
        self
    }

    /// Page size requested by `get_stats` on a cache miss (default: 1000).
    pub fn stats_page_size(mut self, n: u32) -> Self {
        self.stats_page_size = n;
        self
    }

    /// Use a custom transport instead of the default reqwest client.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the gateway.
    pub fn build(self) -> Result<CatalogGateway> {
        if self.retry.max_attempts == 0 {
            return Err(ProdcatError::Configuration(
                "retry policy needs at least one attempt".into(),
            ));
        }
        if self.retry.timeout.is_zero() {
            return Err(ProdcatError::Configuration(
                "request timeout must be greater than zero".into(),
            ));
        }
        if self.cache.max_size == 0 {
            return Err(ProdcatError::Configuration(
                "search cache max size must be at least 1".into(),
            ));
        }

        let url = endpoint_url(&self.base_url, &self.endpoint)?;
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new()?),
        };

        let fetcher = RetryingFetcher::new(transport, self.retry);
        let cache = Arc::new(CacheLayer::new(&self.cache));
        let service = Arc::new(
            CatalogService::new(fetcher, cache, url, self.default_params)
                .stats_page_size(self.stats_page_size),
        );
        let search = SearchEngine::new(Arc::clone(&service), self.search);
        Ok(CatalogGateway::new(service, search))
    }
}

/// Join a base URL and an endpoint path with exactly one `/` between them.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> Result<Url> {
    let base = base_url.trim_end_matches('/');
    let path = endpoint.trim_start_matches('/');
    let joined = if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    };
    Url::parse(&joined)
        .map_err(|e| ProdcatError::Configuration(format!("invalid catalog URL {joined:?}: {e}")))
}
