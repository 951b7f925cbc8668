/// Catalog provider abstraction
///
/// The recommendation engine never owns product storage. A catalog provider
/// hands it the complete, ordered list of products for each request. Reads
/// are idempotent, which is what makes them safe to cache.
use crate::{
    error::AppResult,
    models::{CatalogStats, Product},
};

pub mod cached;
pub mod demo;
pub mod postgres;

pub use cached::CachedCatalog;
pub use demo::DemoCatalog;
pub use postgres::PostgresCatalog;

/// Trait for product catalog backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Every recommendable product, in the backend's stable order
    async fn products(&self) -> AppResult<Vec<Product>>;

    /// Distinct company names, sorted
    async fn companies(&self) -> AppResult<Vec<String>>;

    /// Aggregate counts for diagnostics
    async fn stats(&self) -> AppResult<CatalogStats>;

    /// Backend name for logging and cache namespacing
    fn name(&self) -> &'static str;
}

/// Distinct company names of a product list, sorted
pub(crate) fn distinct_companies(products: &[Product]) -> Vec<String> {
    let mut companies: Vec<String> = products.iter().map(|p| p.company_name.clone()).collect();
    companies.sort();
    companies.dedup();
    companies
}
