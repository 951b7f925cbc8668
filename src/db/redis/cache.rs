use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::AppResult;

/// Keys of cached catalog reads
///
/// Keys are namespaced by catalog source so switching backends never serves
/// another backend's snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Products(String),
    Companies(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Products(source) => write!(f, "catalog:{}:products", source.to_lowercase()),
            CacheKey::Companies(source) => write!(f, "catalog:{}:companies", source.to_lowercase()),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Pending cache write, applied by the writer task
struct CacheWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Read-through cache for catalog snapshots stored as JSON in Redis
///
/// Reads go straight to Redis. Writes are queued to a background task so a
/// cache fill never adds latency to the request that produced the value.
#[derive(Clone)]
pub struct Cache {
    conn: ConnectionManager,
    write_tx: mpsc::UnboundedSender<CacheWrite>,
}

/// Handle for stopping the cache writer task
pub struct CacheWriterHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Stops accepting writes, flushes everything already queued and waits
    /// for the writer task to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
        tracing::info!("Cache writer stopped");
    }
}

impl Cache {
    /// Connects to Redis and starts the background writer task
    pub async fn new(redis_client: Client) -> AppResult<(Self, CacheWriterHandle)> {
        let conn = ConnectionManager::new(redis_client).await?;
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(Self::writer_task(conn.clone(), write_rx, shutdown_rx));

        Ok((Self { conn, write_tx }, CacheWriterHandle { shutdown_tx, task }))
    }

    async fn writer_task(
        mut conn: ConnectionManager,
        mut write_rx: mpsc::UnboundedReceiver<CacheWrite>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        tracing::debug!("Cache writer started");

        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => Self::apply(&mut conn, write).await,
                _ = &mut shutdown_rx => break,
            }
        }

        // Close first so the drain terminates even while Cache clones are alive
        write_rx.close();
        let mut flushed = 0usize;
        while let Some(write) = write_rx.recv().await {
            Self::apply(&mut conn, write).await;
            flushed += 1;
        }
        tracing::info!(flushed, "Cache writer flushed pending writes");
    }

    async fn apply(conn: &mut ConnectionManager, write: CacheWrite) {
        let result: redis::RedisResult<()> = conn.set_ex(&write.key, write.value, write.ttl).await;
        if let Err(e) = result {
            tracing::error!(key = %write.key, error = %e, "Failed to write to Redis cache");
        }
    }
}

/// Raw JSON storage behind the catalog cache
///
/// `Cache` is the Redis implementation. Typed access goes through
/// `get_from_cache` and `set_in_background` on `dyn CacheStore`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads the raw entry stored under `key`
    async fn get_raw(&self, key: &CacheKey) -> AppResult<Option<String>>;

    /// Queues `value` to be stored under `key` for `ttl` seconds
    fn set_raw(&self, key: &CacheKey, value: String, ttl: u64);
}

#[async_trait::async_trait]
impl CacheStore for Cache {
    async fn get_raw(&self, key: &CacheKey) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let cached: Option<String> = conn.get(key.to_string()).await?;
        Ok(cached)
    }

    fn set_raw(&self, key: &CacheKey, value: String, ttl: u64) {
        let write = CacheWrite {
            key: key.to_string(),
            value,
            ttl,
        };

        if self.write_tx.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer stopped, dropping write");
        }
    }
}

impl dyn CacheStore {
    /// Reads a cached value
    ///
    /// An entry that no longer deserializes is treated as a miss.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let cached = self.get_raw(key).await?;

        Ok(cached.and_then(|json| match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }))
    }

    /// Queues a value to be cached with a TTL in seconds, without waiting
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(json) => self.set_raw(key, json, ttl),
            Err(e) => tracing::error!(key = %key, error = %e, "Cache serialization error"),
        }
    }
}
