//! Public types for the Prodcat API.

mod params;
mod product;
mod stats;

pub use params::{ParamValue, QueryParams, default_query_params, merge_params};
pub use product::{CatalogData, CatalogPayload, ProductRecord};
pub use stats::{CatalogStats, UNKNOWN_LABEL};
