use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::fmt::Display;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Raw external place lookups, keyed by their search text
    PlacesSearch(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::PlacesSearch(text) => {
                let normalized: Vec<String> =
                    text.split_whitespace().map(str::to_lowercase).collect();
                write!(f, "places:{}", normalized.join(" "))
            }
        }
    }
}

/// A serialized value waiting to be written by the background writer
struct PendingWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Redis-backed cache for external lookups
///
/// Reads go straight to Redis. Writes are queued to a background task so a
/// slow cache never delays a response.
#[derive(Clone)]
pub struct Cache {
    conn: ConnectionManager,
    write_tx: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the background writer once queued writes are flushed
pub struct CacheWriterHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Connects to Redis and starts the background writer
    pub async fn connect(redis_url: &str) -> AppResult<(Self, CacheWriterHandle)> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(Self::run_writer(conn.clone(), write_rx, shutdown_rx));

        tracing::info!("Cache connected");

        Ok((Self { conn, write_tx }, CacheWriterHandle { shutdown_tx, task }))
    }

    async fn run_writer(
        mut conn: ConnectionManager,
        mut write_rx: mpsc::UnboundedReceiver<PendingWrite>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => {
                    Self::write(&mut conn, write).await;
                }
                _ = &mut shutdown_rx => {
                    // stop accepting new writes, then drain what is queued
                    write_rx.close();
                    let mut flushed = 0usize;
                    while let Some(write) = write_rx.recv().await {
                        Self::write(&mut conn, write).await;
                        flushed += 1;
                    }
                    tracing::info!(flushed, "Cache writer stopped");
                    break;
                }
            }
        }
    }

    async fn write(conn: &mut ConnectionManager, write: PendingWrite) {
        let result: redis::RedisResult<()> = conn.set_ex(&write.key, write.value, write.ttl).await;
        if let Err(e) = result {
            tracing::error!(error = %e, key = %write.key, "Failed to write to Redis cache");
        }
    }

    /// Returns the cached value for `key`, or `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.conn.clone();
        let cached: Option<String> = conn.get(key.to_string()).await?;

        cached
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })
            })
            .transpose()
    }

    /// Queues `value` for writing under `key` with a TTL in seconds
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let value = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            value,
            ttl,
        };

        if self.write_tx.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer is stopped, dropping write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[test]
    fn test_cache_key_display_places_search() {
        let key = CacheKey::PlacesSearch("Restaurant near Hongdae".to_string());
        assert_eq!(format!("{}", key), "places:restaurant near hongdae");
    }

    #[test]
    fn test_cache_key_display_collapses_whitespace() {
        let key = CacheKey::PlacesSearch("  bar   cafe ".to_string());
        assert_eq!(format!("{}", key), "places:bar cafe");
    }

    #[tokio::test]
    #[ignore = "needs a running Redis at REDIS_URL"]
    async fn test_cache_miss() {
        let (cache, _handle) = Cache::connect(&redis_url()).await.unwrap();

        let key = CacheKey::PlacesSearch("nonexistent_key_12345".to_string());
        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();

        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    #[ignore = "needs a running Redis at REDIS_URL"]
    async fn test_shutdown_flushes_queued_writes() {
        let (cache, handle) = Cache::connect(&redis_url()).await.unwrap();

        let key = CacheKey::PlacesSearch("test_shutdown_flush".to_string());
        let value = vec!["queued".to_string()];
        cache.set_in_background(&key, &value, 60);

        handle.shutdown().await;

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = cache.conn.clone();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }
}
