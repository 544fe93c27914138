//! Gateway implementations

mod builder;
mod embedded;

pub use builder::{DEFAULT_BASE_URL, DEFAULT_ENDPOINT, Prodcat, ProdcatBuilder, endpoint_url};
pub use embedded::CatalogGateway;
