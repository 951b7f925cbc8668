/// PostgreSQL catalog
///
/// Reads active products joined with their owning company. Schema management
/// and seeding belong to other tools; this provider only reads.
use chrono::Utc;
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{CatalogStats, Product},
    services::catalog::CatalogProvider,
};

const MAX_PRODUCTS: i64 = 10_000;
const MAX_COMPANIES: i64 = 100;
const MOCK_COMPANIES: i64 = 50;

/// Product lines synthesized per company when the products table is empty
const MOCK_PRODUCT_LINES: &[&str] = &["VFD", "VFD Spares", "Pump"];

#[derive(Clone)]
pub struct PostgresCatalog {
    db_pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    async fn active_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id::text AS id, c.name AS company_name, p.product_line
            FROM products p
            JOIN companies c ON p.company_id = c.id
            WHERE p.is_active = true
            ORDER BY c.name, p.product_line, p.id
            LIMIT $1
            "#,
        )
        .bind(MAX_PRODUCTS)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(products)
    }

    async fn company_names(&self, limit: i64) -> AppResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT name FROM companies ORDER BY name LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(names)
    }

    async fn count(&self, table: &'static str) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.db_pool)
            .await?;
        Ok(count)
    }
}

/// Placeholder products for a database that has companies but no products yet
pub fn mock_products(companies: &[String]) -> Vec<Product> {
    companies
        .iter()
        .enumerate()
        .flat_map(|(i, company)| {
            MOCK_PRODUCT_LINES
                .iter()
                .enumerate()
                .map(move |(j, line)| Product::new(format!("mock_{}_{}", i, j), company.as_str(), *line))
        })
        .collect()
}

#[async_trait::async_trait]
impl CatalogProvider for PostgresCatalog {
    async fn products(&self) -> AppResult<Vec<Product>> {
        let products = self.active_products().await?;

        if !products.is_empty() {
            tracing::info!(count = products.len(), "Loaded products from database");
            return Ok(products);
        }

        let companies = self.company_names(MOCK_COMPANIES).await?;
        let mocks = mock_products(&companies);
        tracing::warn!(
            companies = companies.len(),
            count = mocks.len(),
            "No active products in database, using mock products"
        );

        Ok(mocks)
    }

    async fn companies(&self) -> AppResult<Vec<String>> {
        self.company_names(MAX_COMPANIES).await
    }

    async fn stats(&self) -> AppResult<CatalogStats> {
        Ok(CatalogStats {
            source: self.name().to_string(),
            companies: self.count("companies").await?,
            products: self.count("products").await?,
            sales: Some(self.count("sales").await?),
            as_of: Utc::now(),
        })
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
