use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single catalog entry that can be recommended
///
/// `id` is assigned by the catalog owner and is the only deduplication key:
/// two products with the same id are the same product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: String,
    pub company_name: String,
    pub product_line: String,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        company_name: impl Into<String>,
        product_line: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            company_name: company_name.into(),
            product_line: product_line.into(),
        }
    }
}

/// Aggregate counts describing a catalog backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogStats {
    pub source: String,
    pub companies: i64,
    pub products: i64,
    /// Only known for backends that track sales
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales: Option<i64>,
    pub as_of: DateTime<Utc>,
}
