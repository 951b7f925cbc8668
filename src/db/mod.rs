pub mod postgres;
pub mod redis;

pub use postgres::create_pool;
pub use redis::create_redis_client;
pub use redis::{Cache, CacheKey, CacheStore, CacheWriterHandle};
