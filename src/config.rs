//! Configuration loading for the prodcat CLI.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.prodcat/config.toml` (user)
//! 3. `/etc/prodcat/config.toml` (system)
//!
//! When no file exists the built-in defaults apply. `PRODCAT_BASE_URL`
//! overrides `api.base_url` in every case.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;
use crate::fetch::RetryPolicy;
use crate::gateway::{DEFAULT_BASE_URL, DEFAULT_ENDPOINT, Prodcat, ProdcatBuilder};
use crate::search::SearchConfig;
use crate::service::DEFAULT_STATS_PAGE_SIZE;
use crate::types::{QueryParams, default_query_params};
use crate::{ProdcatError, Result};

/// Environment variable overriding the catalog base URL.
pub const BASE_URL_ENV: &str = "PRODCAT_BASE_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub stats: StatsSection,
}

/// Remote catalog service location and default query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Parameters sent with every catalog request unless overridden.
    #[serde(default = "default_query_params")]
    pub default_params: QueryParams,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            default_params: default_query_params(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Timeout and retry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Per-attempt timeout in milliseconds (default: 10000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Total attempts per fetch (default: 3).
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    /// Delay between attempts in milliseconds (default: 1000).
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSection {
    /// Catalog freshness in seconds (default: 300).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum memoized searches (default: 100).
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Warm the catalog before running a command (default: true).
    #[serde(default = "default_true")]
    pub preload_on_startup: bool,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_size: default_max_size(),
            preload_on_startup: true,
        }
    }
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_max_size() -> usize {
    100
}

fn default_true() -> bool {
    true
}

/// Search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSection {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            case_sensitive: false,
        }
    }
}

fn default_min_length() -> usize {
    1
}

/// Statistics settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSection {
    /// Page size requested to approximate the whole catalog (default: 1000).
    #[serde(default = "default_stats_page_size")]
    pub page_size: u32,
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            page_size: default_stats_page_size(),
        }
    }
}

fn default_stats_page_size() -> u32 {
    DEFAULT_STATS_PAGE_SIZE
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the user and system files
    /// are tried in turn and the defaults apply if neither exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.api.base_url = url;
        }
        Ok(config)
    }

    /// Parse a single TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ProdcatError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ProdcatError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(ProdcatError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".prodcat").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/prodcat/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new()
            .max_attempts(self.request.retry_count)
            .timeout(Duration::from_millis(self.request.timeout_ms))
            .delay(Duration::from_millis(self.request.retry_delay_ms))
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .ttl(Duration::from_secs(self.cache.ttl_secs))
            .max_size(self.cache.max_size)
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::new()
            .min_length(self.search.min_length)
            .case_sensitive(self.search.case_sensitive)
    }

    /// A gateway builder carrying every setting in this configuration.
    pub fn builder(&self) -> ProdcatBuilder {
        Prodcat::builder()
            .base_url(&self.api.base_url)
            .endpoint(&self.api.endpoint)
            .default_params(self.api.default_params.clone())
            .retry_policy(self.retry_policy())
            .cache(self.cache_config())
            .search(self.search_config())
            .stats_page_size(self.stats.page_size)
    }
}
