//! Key-value cache port and its Redis adapter
//!
//! The service never holds cache contents itself; every call is forwarded
//! to the backing store.

use crate::config::RedisConfig;
use crate::error::{KvShimError, Result};
use crate::handle::{Dependency, Target};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

/// String key/value store
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Liveness round-trip
    async fn ping(&self) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Unconditional overwrite, no expiry
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Cache client over a multiplexed Redis connection.
///
/// `ConnectionManager` is cheap to clone and safe to share between
/// concurrent requests, so every call works on its own clone.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    target: Target,
}

impl RedisCache {
    /// Open a connection and verify it with `PING`
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url().as_str())?;

        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                KvShimError::transient(
                    Dependency::Redis,
                    format!(
                        "connection to {} timed out after {:?}",
                        config.target, config.connect_timeout
                    ),
                )
            })??;

        let cache = Self {
            conn,
            target: config.target.clone(),
        };
        cache.ping().await?;
        Ok(cache)
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!("Redis {} replied {}", self.target, reply);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }
}
