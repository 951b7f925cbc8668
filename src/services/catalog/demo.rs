use chrono::Utc;

use crate::{
    error::AppResult,
    models::{CatalogStats, Product},
    services::catalog::{distinct_companies, CatalogProvider},
};

const DEMO_PRODUCTS: &[(&str, &str, &str)] = &[
    ("demo_1", "Apple", "smartphones"),
    ("demo_2", "Apple", "laptops"),
    ("demo_3", "Samsung", "smartphones"),
    ("demo_4", "Samsung", "televisions"),
    ("demo_5", "Nike", "shoes"),
    ("demo_6", "Nike", "apparel"),
    ("demo_7", "Microsoft", "laptops"),
    ("demo_8", "Sony", "headphones"),
    ("demo_9", "Google", "smartphones"),
    ("demo_10", "Tesla", "vehicles"),
];

/// Fixed in-memory catalog for running without a database
#[derive(Debug, Clone)]
pub struct DemoCatalog {
    products: Vec<Product>,
}

impl DemoCatalog {
    pub fn new() -> Self {
        Self::with_products(
            DEMO_PRODUCTS
                .iter()
                .map(|(id, company, line)| Product::new(*id, *company, *line))
                .collect(),
        )
    }

    /// Demo catalog over caller-supplied products
    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl Default for DemoCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CatalogProvider for DemoCatalog {
    async fn products(&self) -> AppResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn companies(&self) -> AppResult<Vec<String>> {
        Ok(distinct_companies(&self.products))
    }

    async fn stats(&self) -> AppResult<CatalogStats> {
        Ok(CatalogStats {
            source: self.name().to_string(),
            companies: distinct_companies(&self.products).len() as i64,
            products: self.products.len() as i64,
            sales: None,
            as_of: Utc::now(),
        })
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_catalog_contents() {
        let catalog = DemoCatalog::new();
        let products = catalog.products().await.unwrap();

        assert_eq!(products.len(), 10);
        assert_eq!(products[0], Product::new("demo_1", "Apple", "smartphones"));
        assert_eq!(products[9].id, "demo_10");
    }

    #[tokio::test]
    async fn test_demo_companies_are_distinct_and_sorted() {
        let companies = DemoCatalog::new().companies().await.unwrap();
        assert_eq!(
            companies,
            vec!["Apple", "Google", "Microsoft", "Nike", "Samsung", "Sony", "Tesla"]
        );
    }

    #[tokio::test]
    async fn test_demo_stats() {
        let stats = DemoCatalog::new().stats().await.unwrap();
        assert_eq!(stats.source, "demo");
        assert_eq!(stats.companies, 7);
        assert_eq!(stats.products, 10);
        assert_eq!(stats.sales, None);
    }

    #[test]
    fn test_demo_catalog_is_stable_between_reads() {
        let catalog = DemoCatalog::new();
        let first = tokio_test::block_on(catalog.products()).unwrap();
        let second = tokio_test::block_on(catalog.products()).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_demo_catalog() {
        let catalog = DemoCatalog::with_products(Vec::new());
        assert!(catalog.products().await.unwrap().is_empty());
        assert!(catalog.companies().await.unwrap().is_empty());
    }
}
