//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus,
//! statsd); without a recorder installed, all metric calls are no-ops.
//!
//! All metrics are prefixed with `prodcat_` and are counters ending in
//! `_total`.

/// Fetch attempts issued, including the first of each sequence.
///
/// Labels: `transport`.
pub const FETCH_ATTEMPTS_TOTAL: &str = "prodcat_fetch_attempts_total";

/// Retries after a failed attempt (not counting the first attempt).
///
/// Labels: `transport`.
pub const RETRIES_TOTAL: &str = "prodcat_retries_total";

/// Catalog served from the TTL cache without a fetch.
pub const CATALOG_CACHE_HITS_TOTAL: &str = "prodcat_catalog_cache_hits_total";

/// Catalog requests that had to fetch (stale, empty, or forced).
pub const CATALOG_CACHE_MISSES_TOTAL: &str = "prodcat_catalog_cache_misses_total";

/// Searches answered from the search history cache.
pub const SEARCH_CACHE_HITS_TOTAL: &str = "prodcat_search_cache_hits_total";

/// Searches that scanned the catalog.
pub const SEARCH_CACHE_MISSES_TOTAL: &str = "prodcat_search_cache_misses_total";

/// Entries dropped from the search history cache to respect its bound.
pub const SEARCH_CACHE_EVICTIONS_TOTAL: &str = "prodcat_search_cache_evictions_total";
