use std::sync::Arc;

use crate::{
    cached,
    db::{CacheKey, CacheStore},
    error::AppResult,
    models::{CatalogStats, Product},
    services::catalog::CatalogProvider,
};

/// Read-through cache in front of another catalog
///
/// Products and company names are cached for `ttl` seconds. Stats always hit
/// the underlying catalog. When the cache cannot be read, the underlying
/// catalog answers instead.
pub struct CachedCatalog {
    inner: Arc<dyn CatalogProvider>,
    cache: Arc<dyn CacheStore>,
    ttl: u64,
}

impl CachedCatalog {
    pub fn new(inner: Arc<dyn CatalogProvider>, cache: Arc<dyn CacheStore>, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for CachedCatalog {
    async fn products(&self) -> AppResult<Vec<Product>> {
        cached!(
            self.cache,
            CacheKey::Products(self.inner.name().to_string()),
            self.ttl,
            self.inner.products()
        )
    }

    async fn companies(&self) -> AppResult<Vec<String>> {
        cached!(
            self.cache,
            CacheKey::Companies(self.inner.name().to_string()),
            self.ttl,
            self.inner.companies()
        )
    }

    async fn stats(&self) -> AppResult<CatalogStats> {
        self.inner.stats().await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::redis::cache::MockCacheStore;
    use crate::error::AppError;
    use crate::services::catalog::{DemoCatalog, MockCatalogProvider};

    fn demo_products() -> Vec<Product> {
        vec![
            Product::new("demo_1", "Apple", "smartphones"),
            Product::new("demo_3", "Samsung", "smartphones"),
        ]
    }

    fn demo() -> Arc<dyn CatalogProvider> {
        Arc::new(DemoCatalog::with_products(demo_products()))
    }

    fn redis_down() -> AppError {
        AppError::Cache(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "broken pipe",
        )))
    }

    #[tokio::test]
    async fn test_miss_reads_inner_and_fills_cache() {
        let mut store = MockCacheStore::new();
        store
            .expect_get_raw()
            .withf(|key| key.to_string() == "catalog:demo:products")
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_set_raw()
            .withf(|key, value, ttl| {
                key.to_string() == "catalog:demo:products"
                    && serde_json::from_str::<Vec<Product>>(value).ok() == Some(demo_products())
                    && *ttl == 60
            })
            .times(1)
            .return_const(());

        let catalog = CachedCatalog::new(demo(), Arc::new(store), 60);
        assert_eq!(catalog.products().await.unwrap(), demo_products());
    }

    #[tokio::test]
    async fn test_hit_skips_inner() {
        let mut inner = MockCatalogProvider::new();
        inner.expect_name().return_const("postgres");
        inner.expect_products().never();

        let mut store = MockCacheStore::new();
        store
            .expect_get_raw()
            .withf(|key| key.to_string() == "catalog:postgres:products")
            .times(1)
            .returning(|_| Ok(Some(serde_json::to_string(&demo_products()).unwrap())));
        store.expect_set_raw().never();

        let catalog = CachedCatalog::new(Arc::new(inner), Arc::new(store), 60);
        assert_eq!(catalog.products().await.unwrap(), demo_products());
    }

    #[tokio::test]
    async fn test_cache_error_reads_through() {
        let mut store = MockCacheStore::new();
        store
            .expect_get_raw()
            .times(1)
            .returning(|_| Err(redis_down()));
        store.expect_set_raw().return_const(());

        let catalog = CachedCatalog::new(Arc::new(DemoCatalog::new()), Arc::new(store), 60);
        let products = catalog.products().await.unwrap();

        assert_eq!(products.len(), 10);
        assert_eq!(products[0].id, "demo_1");
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let mut store = MockCacheStore::new();
        store
            .expect_get_raw()
            .times(1)
            .returning(|_| Ok(Some("{not json".to_string())));
        store
            .expect_set_raw()
            .withf(|_, value, _| serde_json::from_str::<Vec<Product>>(value).is_ok())
            .times(1)
            .return_const(());

        let catalog = CachedCatalog::new(demo(), Arc::new(store), 60);
        assert_eq!(catalog.products().await.unwrap(), demo_products());
    }

    #[tokio::test]
    async fn test_companies_use_their_own_key() {
        let mut store = MockCacheStore::new();
        store
            .expect_get_raw()
            .withf(|key| key.to_string() == "catalog:demo:companies")
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_set_raw()
            .withf(|key, value, _| {
                key.to_string() == "catalog:demo:companies"
                    && serde_json::from_str::<Vec<String>>(value).ok()
                        == Some(vec!["Apple".to_string(), "Samsung".to_string()])
            })
            .times(1)
            .return_const(());

        let catalog = CachedCatalog::new(demo(), Arc::new(store), 60);
        assert_eq!(catalog.companies().await.unwrap(), vec!["Apple", "Samsung"]);
    }

    #[tokio::test]
    async fn test_inner_error_is_not_cached() {
        let mut inner = MockCatalogProvider::new();
        inner.expect_name().return_const("postgres");
        inner
            .expect_products()
            .times(1)
            .returning(|| Err(AppError::NotFound("gone".to_string())));

        let mut store = MockCacheStore::new();
        store.expect_get_raw().returning(|_| Ok(None));
        store.expect_set_raw().never();

        let catalog = CachedCatalog::new(Arc::new(inner), Arc::new(store), 60);
        assert!(matches!(catalog.products().await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_bypass_cache() {
        let store = MockCacheStore::new();
        let catalog = CachedCatalog::new(demo(), Arc::new(store), 60);

        let stats = catalog.stats().await.unwrap();
        assert_eq!(stats.products, 2);
        assert_eq!(catalog.name(), "demo");
    }
}
