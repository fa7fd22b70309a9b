//! In-memory stand-ins for Redis and PostgreSQL.
//!
//! Available under `cfg(test)` or with the `mock` feature:
//!
//! ```toml
//! [dev-dependencies]
//! kvshim-core = { path = "../kvshim-core", features = ["mock"] }
//! ```
//!
//! Both doubles can be switched into a failing mode at any time to simulate
//! a dependency dropping away after startup.

use crate::cache::CacheStore;
use crate::database::DatabaseProbe;
use crate::error::{KvShimError, Result};
use crate::handle::Dependency;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// DashMap-backed cache
#[derive(Default)]
pub struct MemoryCache {
    data: DashMap<String, String>,
    failing: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(KvShimError::transient(
                Dependency::Redis,
                "Connection refused (os error 111)",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn ping(&self) -> Result<()> {
        self.check()
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Database that answers with a fixed version string
pub struct StubDatabase {
    version: String,
    failing: AtomicBool,
}

impl StubDatabase {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(KvShimError::transient(
                Dependency::Postgres,
                "server closed the connection unexpectedly",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseProbe for StubDatabase {
    async fn ping(&self) -> Result<()> {
        self.check()
    }

    async fn version(&self) -> Result<String> {
        self.check()?;
        Ok(self.version.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_operations() -> Result<()> {
        let cache = MemoryCache::new();

        cache.set("key1", "one").await?;
        assert_eq!(cache.get("key1").await?, Some("one".to_string()));
        assert_eq!(cache.get("nonexistent").await?, None);

        cache.set("key1", "uno").await?;
        assert_eq!(cache.get("key1").await?, Some("uno".to_string()));
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failing_mode_keeps_data() -> Result<()> {
        let cache = MemoryCache::new();
        cache.set("key1", "one").await?;

        cache.set_failing(true);
        assert!(cache.ping().await.is_err());
        assert!(cache.get("key1").await.is_err());

        cache.set_failing(false);
        assert_eq!(cache.get("key1").await?, Some("one".to_string()));
        Ok(())
    }

    #[test]
    fn test_stub_database_version() {
        let database = StubDatabase::new("PostgreSQL 16.2");
        assert_eq!(
            tokio_test::block_on(database.version()),
            Ok("PostgreSQL 16.2".to_string())
        );

        database.set_failing(true);
        assert!(tokio_test::block_on(database.ping()).is_err());
    }
}
