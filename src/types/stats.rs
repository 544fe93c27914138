//! Catalog statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ProductRecord;

/// Bucket for records with no status or type label.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Record counts grouped by status label and by type label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
}

impl CatalogStats {
    /// Aggregate a slice of records.
    pub fn from_products(products: &[ProductRecord]) -> Self {
        let mut stats = Self {
            total: products.len(),
            ..Self::default()
        };
        for product in products {
            let status = product.status_label().unwrap_or(UNKNOWN_LABEL);
            *stats.by_status.entry(status.to_string()).or_default() += 1;
            let kind = product.type_label().unwrap_or(UNKNOWN_LABEL);
            *stats.by_type.entry(kind.to_string()).or_default() += 1;
        }
        stats
    }
}
