//! Connection manager
//!
//! Acquires one handle per dependency before the service starts serving and
//! keeps them for the lifetime of the process. A dependency that never came
//! up stays `Unavailable`; there is no background reconnection.

use crate::cache::{CacheStore, RedisCache};
use crate::config::Settings;
use crate::database::{DatabaseProbe, PostgresDatabase};
use crate::error::{KvShimError, Result};
use crate::handle::{Availability, Dependency, Handle, Target};
use crate::retry::RetryExecutor;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

pub type CacheHandle = Handle<Arc<dyn CacheStore>>;
pub type DatabaseHandle = Handle<Arc<dyn DatabaseProbe>>;

/// Acquire a handle with bounded retry.
///
/// `connect` performs one connect-and-verify round-trip. When every attempt
/// fails the result is `Handle::Unavailable`, which is final.
pub async fn acquire<T, F, Fut>(
    dependency: Dependency,
    target: &Target,
    retry: &RetryExecutor,
    connect: F,
) -> Handle<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let name = dependency.to_string();
    match retry.execute(&name, connect).await {
        Ok(client) => {
            info!("{} connected successfully to {}", dependency, target);
            Handle::Live(client)
        }
        Err(_) => Handle::Unavailable,
    }
}

/// Process-scoped dependency context, built once at startup and shared by
/// every request handler.
pub struct Dependencies {
    cache: CacheHandle,
    database: DatabaseHandle,
    redis_target: Target,
    postgres_target: Target,
}

impl Dependencies {
    pub fn new(
        cache: CacheHandle,
        database: DatabaseHandle,
        redis_target: Target,
        postgres_target: Target,
    ) -> Self {
        Self {
            cache,
            database,
            redis_target,
            postgres_target,
        }
    }

    /// Connect to Redis and PostgreSQL.
    pub async fn connect(settings: &Settings) -> Self {
        let redis = settings.redis_config();
        let postgres = settings.postgres_config();
        let (redis_ref, postgres_ref) = (&redis, &postgres);

        Self::acquire_all(
            settings,
            move || RedisCache::connect(redis_ref),
            move || PostgresDatabase::connect(postgres_ref),
        )
        .await
    }

    /// Acquire both dependencies with the given connect functions.
    ///
    /// The two acquisitions run side by side and never wait on each other.
    pub async fn acquire_all<C, D, FC, FutC, FD, FutD>(
        settings: &Settings,
        redis_connect: FC,
        postgres_connect: FD,
    ) -> Self
    where
        C: CacheStore + 'static,
        D: DatabaseProbe + 'static,
        FC: FnMut() -> FutC,
        FutC: Future<Output = Result<C>>,
        FD: FnMut() -> FutD,
        FutD: Future<Output = Result<D>>,
    {
        let retry = settings.retry_executor();
        let redis = settings.redis_config();
        let postgres = settings.postgres_config();

        info!(
            "Connecting to Redis at {} and PostgreSQL at {} ({} attempts, {:?} apart)",
            redis.target,
            postgres.target,
            retry.max_attempts(),
            retry.delay()
        );

        let (cache, database) = tokio::join!(
            acquire(Dependency::Redis, &redis.target, &retry, redis_connect),
            acquire(Dependency::Postgres, &postgres.target, &retry, postgres_connect),
        );

        Self::new(
            cache.map(|c| Arc::new(c) as Arc<dyn CacheStore>),
            database.map(|d| Arc::new(d) as Arc<dyn DatabaseProbe>),
            redis.target,
            postgres.target,
        )
    }

    /// Live cache client, or `Unavailable(Redis)`
    pub fn cache(&self) -> Result<&dyn CacheStore> {
        self.cache
            .live()
            .map(|c| c.as_ref())
            .ok_or(KvShimError::Unavailable(Dependency::Redis))
    }

    /// Live database client, or `Unavailable(Postgres)`
    pub fn database(&self) -> Result<&dyn DatabaseProbe> {
        self.database
            .live()
            .map(|d| d.as_ref())
            .ok_or(KvShimError::Unavailable(Dependency::Postgres))
    }

    pub fn cache_availability(&self) -> Availability {
        self.cache.availability()
    }

    pub fn database_availability(&self) -> Availability {
        self.database.availability()
    }

    pub fn redis_target(&self) -> &Target {
        &self.redis_target
    }

    pub fn postgres_target(&self) -> &Target {
        &self.postgres_target
    }

    pub async fn ping_cache(&self) -> Result<()> {
        self.cache()?.ping().await
    }

    pub async fn ping_database(&self) -> Result<()> {
        self.database()?.ping().await
    }

    pub async fn get_value(&self, key: &str) -> Result<String> {
        self.cache()?
            .get(key)
            .await?
            .ok_or_else(|| KvShimError::NotFound(key.to_string()))
    }

    pub async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.cache()?.set(key, value).await
    }

    pub async fn database_version(&self) -> Result<String> {
        self.database()?.version().await
    }
}
