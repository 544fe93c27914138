//! Catalog payload and product records

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::NetworkError;

/// A single product as returned by the catalog service.
///
/// Only the identifier, status and type labels are interpreted; every other
/// field is kept verbatim in [`attributes`](Self::attributes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(
        rename = "product_no",
        default,
        deserialize_with = "scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub identifier: Option<String>,
    #[serde(
        rename = "product_status_name",
        default,
        deserialize_with = "scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        rename = "product_type_name",
        default,
        deserialize_with = "scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_type: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ProductRecord {
    /// Create a record with only an identifier set.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            ..Self::default()
        }
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The identifier, or `None` if absent or empty (unmatchable).
    pub fn identifier(&self) -> Option<&str> {
        non_empty(self.identifier.as_deref())
    }

    /// Status label; absent or empty labels read as `None`.
    pub fn status_label(&self) -> Option<&str> {
        non_empty(self.status.as_deref())
    }

    /// Type label; absent or empty labels read as `None`.
    pub fn type_label(&self) -> Option<&str> {
        non_empty(self.product_type.as_deref())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Accept strings and numbers for label fields; anything else reads as absent.
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Read the `products` array, treating `null` as empty and dropping rows
/// that are not objects.
fn object_rows<'de, D>(deserializer: D) -> std::result::Result<Vec<ProductRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let total = rows.len();
    let products = rows
        .into_iter()
        .filter(Value::is_object)
        .map(|row| serde_json::from_value(row).map_err(serde::de::Error::custom))
        .collect::<std::result::Result<Vec<ProductRecord>, D::Error>>()?;
    if products.len() < total {
        debug!(skipped = total - products.len(), "ignored non-object product rows");
    }
    Ok(products)
}

/// The `data` section of a catalog response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default, deserialize_with = "object_rows")]
    pub products: Vec<ProductRecord>,
    /// Pagination and other service fields, passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A full catalog response: `{ "data": { "products": [...] }, ... }`.
///
/// Immutable once cached; a newer fetch replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPayload {
    pub data: CatalogData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogPayload {
    /// Build a payload directly from a list of records.
    pub fn from_products(products: Vec<ProductRecord>) -> Self {
        Self {
            data: CatalogData {
                products,
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.data.products
    }

    /// Parse a response body and validate the payload shape.
    ///
    /// The top level must be an object carrying a `data` object. A missing
    /// or `null` `products` array reads as an empty catalog.
    pub fn from_json(body: &str) -> std::result::Result<Self, NetworkError> {
        if body.trim().is_empty() {
            return Err(NetworkError::MalformedResponse("empty body".into()));
        }
        let value: Value = serde_json::from_str(body)
            .map_err(|e| NetworkError::MalformedResponse(format!("invalid JSON: {e}")))?;
        match value.get("data") {
            Some(Value::Object(_)) => {}
            Some(_) | None => {
                return Err(NetworkError::MalformedResponse(
                    "missing `data` object".into(),
                ));
            }
        }
        serde_json::from_value(value)
            .map_err(|e| NetworkError::MalformedResponse(format!("unexpected shape: {e}")))
    }
}
