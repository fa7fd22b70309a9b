//! Configuration management for kvshim
//!
//! Settings come from the process environment. Every variable is optional
//! and falls back to the defaults below.

use crate::error::{KvShimError, Result};
use crate::handle::Target;
use crate::retry::{RetryExecutor, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
use config::{Config, Environment};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_REDIS_HOST: &str = "redis";
pub const DEFAULT_REDIS_PORT: u16 = 6379;
pub const DEFAULT_POSTGRES_HOST: &str = "postgres";
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;
pub const DEFAULT_POSTGRES_DB: &str = "db";
pub const DEFAULT_POSTGRES_USER: &str = "fnctech";
pub const DEFAULT_POSTGRES_PASSWORD: &str = "password1357";
pub const DEFAULT_POSTGRES_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Process settings, one field per environment variable
/// (`REDIS_HOST` maps to `redis_host` and so on).
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub bind_address: String,
    pub redis_host: String,
    pub redis_port: u16,
    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_db: String,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_max_connections: u32,
    pub connect_retries: u32,
    pub connect_retry_delay_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::default())
    }

    /// Load settings from an explicit environment source
    pub fn load(environment: Environment) -> Result<Self> {
        let settings: Settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("redis_host", DEFAULT_REDIS_HOST)?
            .set_default("redis_port", i64::from(DEFAULT_REDIS_PORT))?
            .set_default("postgres_host", DEFAULT_POSTGRES_HOST)?
            .set_default("postgres_port", i64::from(DEFAULT_POSTGRES_PORT))?
            .set_default("postgres_db", DEFAULT_POSTGRES_DB)?
            .set_default("postgres_user", DEFAULT_POSTGRES_USER)?
            .set_default("postgres_password", DEFAULT_POSTGRES_PASSWORD)?
            .set_default(
                "postgres_max_connections",
                i64::from(DEFAULT_POSTGRES_MAX_CONNECTIONS),
            )?
            .set_default("connect_retries", i64::from(DEFAULT_MAX_ATTEMPTS))?
            .set_default(
                "connect_retry_delay_secs",
                DEFAULT_RETRY_DELAY.as_secs() as i64,
            )?
            .set_default("connect_timeout_secs", DEFAULT_CONNECT_TIMEOUT_SECS as i64)?
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.redis_host.trim().is_empty() {
            return Err(KvShimError::Config("REDIS_HOST must not be empty".into()));
        }
        if self.postgres_host.trim().is_empty() {
            return Err(KvShimError::Config(
                "POSTGRES_HOST must not be empty".into(),
            ));
        }
        if self.connect_retries == 0 {
            return Err(KvShimError::Config(
                "CONNECT_RETRIES must be at least 1".into(),
            ));
        }
        if self.postgres_max_connections == 0 {
            return Err(KvShimError::Config(
                "POSTGRES_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn uses_default_password(&self) -> bool {
        self.postgres_password == DEFAULT_POSTGRES_PASSWORD
    }

    pub fn retry_executor(&self) -> RetryExecutor {
        RetryExecutor::new(
            self.connect_retries,
            Duration::from_secs(self.connect_retry_delay_secs),
        )
    }

    pub fn redis_config(&self) -> RedisConfig {
        RedisConfig {
            target: Target::new(&self.redis_host, self.redis_port),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn postgres_config(&self) -> PostgresConfig {
        PostgresConfig {
            target: Target::new(&self.postgres_host, self.postgres_port),
            database: self.postgres_db.clone(),
            user: self.postgres_user.clone(),
            password: self.postgres_password.clone(),
            max_connections: self.postgres_max_connections,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("bind_address", &self.bind_address)
            .field("redis_host", &self.redis_host)
            .field("redis_port", &self.redis_port)
            .field("postgres_host", &self.postgres_host)
            .field("postgres_port", &self.postgres_port)
            .field("postgres_db", &self.postgres_db)
            .field("postgres_user", &self.postgres_user)
            .field("postgres_password", &"<redacted>")
            .field("postgres_max_connections", &self.postgres_max_connections)
            .field("connect_retries", &self.connect_retries)
            .field("connect_retry_delay_secs", &self.connect_retry_delay_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Where and how to reach Redis
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub target: Target,
    pub connect_timeout: Duration,
}

impl RedisConfig {
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.target.host, self.target.port)
    }
}

/// Where and how to reach PostgreSQL
#[derive(Clone)]
pub struct PostgresConfig {
    pub target: Target,
    pub database: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("target", &self.target)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
