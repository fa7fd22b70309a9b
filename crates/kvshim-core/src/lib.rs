//! kvshim core library
//!
//! Connection lifecycle and health aggregation for a service fronting a
//! Redis cache and a PostgreSQL database.

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod handle;
pub mod health;
pub mod manager;
pub mod retry;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use cache::{CacheStore, RedisCache};
pub use crate::config::Settings;
pub use database::{DatabaseProbe, PostgresDatabase};
pub use error::{KvShimError, Result};
pub use handle::{Availability, Dependency, Handle, Target};
pub use health::{HealthReport, HealthStatus, OverallStatus};
pub use manager::Dependencies;
pub use retry::RetryExecutor;
