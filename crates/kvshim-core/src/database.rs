//! Relational database port and its PostgreSQL adapter

use crate::config::PostgresConfig;
use crate::error::{KvShimError, Result};
use crate::handle::Dependency;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions};
use sqlx::Connection;

/// Read-only probe against the database
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Trivial round-trip (`SELECT 1`)
    async fn ping(&self) -> Result<()>;

    /// Server version string (`SELECT version()`)
    async fn version(&self) -> Result<String>;
}

/// PostgreSQL probe over a small connection pool.
///
/// Concurrent handlers each check out their own connection instead of
/// sharing one.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    /// Verify the server with one direct connection and `SELECT 1`, then
    /// build the pool lazily from the same options.
    ///
    /// Connection errors (refused, bad password, unknown database) are
    /// reported as-is rather than as a pool acquire timeout.
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&config.target.host)
            .port(config.target.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let mut conn =
            tokio::time::timeout(config.connect_timeout, PgConnection::connect_with(&options))
                .await
                .map_err(|_| {
                    KvShimError::transient(
                        Dependency::Postgres,
                        format!(
                            "connection to {} timed out after {:?}",
                            config.target, config.connect_timeout
                        ),
                    )
                })??;

        sqlx::query("SELECT 1").execute(&mut conn).await?;
        // The verified connection is not handed to the pool
        let _ = conn.close().await;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_lazy_with(options);

        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseProbe for PostgresDatabase {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn version(&self) -> Result<String> {
        let version: String = sqlx::query_scalar("SELECT version()")
            .fetch_one(&self.pool)
            .await?;
        Ok(version)
    }
}
