//! Prodcat - resilient product catalog access
//!
//! Fetches a product catalog from a remote HTTP service, retries transient
//! failures with a fixed delay, keeps the last catalog in a TTL cache and
//! answers exact identifier lookups through a bounded search memo.
//!
//! # Example
//!
//! ```rust,no_run
//! use prodcat::{Prodcat, ProductCatalog, RetryPolicy};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> prodcat::Result<()> {
//!     let catalog = Prodcat::builder()
//!         .base_url("https://shop.example.com/api")
//!         .retry_policy(RetryPolicy::new().delay(Duration::from_millis(500)))
//!         .build()?;
//!
//!     catalog.preload().await;
//!     for product in catalog.search_by_identifier("SKU-1042", true).await? {
//!         println!("{:?} {:?}", product.identifier, product.status);
//!     }
//!
//!     let stats = catalog.get_stats().await?;
//!     println!("{} products", stats.total);
//!     Ok(())
//! }
//! ```

pub mod cache;
#[cfg(feature = "cli")]
pub mod config;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod search;
pub mod service;
pub mod telemetry;
pub mod traits;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheLayer};
pub use error::{InvalidQuery, NetworkError, ProdcatError, Result};
pub use fetch::{HttpResponse, ReqwestTransport, RetryPolicy, RetryingFetcher, Transport};
pub use gateway::{CatalogGateway, Prodcat, ProdcatBuilder};
pub use search::{SearchConfig, SearchEngine};
pub use service::CatalogService;
pub use traits::ProductCatalog;

pub use types::{
    CatalogData, CatalogPayload, CatalogStats, ParamValue, ProductRecord, QueryParams,
};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
