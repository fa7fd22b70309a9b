//! Composite health
//!
//! Each dependency is re-checked at request time. A failed or missing
//! dependency only marks itself unhealthy; the report itself never fails.

use crate::error::Result;
use crate::manager::Dependencies;
use serde::Serialize;
use tracing::warn;

/// Per-dependency result of a live re-check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn from_probe(result: &Result<()>) -> Self {
        match result {
            Ok(()) => HealthStatus::Healthy,
            Err(_) => HealthStatus::Unhealthy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Healthy,
    Degraded,
}

impl OverallStatus {
    pub fn aggregate(redis: HealthStatus, postgres: HealthStatus) -> Self {
        match (redis, postgres) {
            (HealthStatus::Healthy, HealthStatus::Healthy) => OverallStatus::Healthy,
            _ => OverallStatus::Degraded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: OverallStatus,
    pub redis: HealthStatus,
    pub postgresql: HealthStatus,
    pub redis_host: String,
    pub postgres_host: String,
}

/// Re-verify both dependencies and fold the results into one report.
pub async fn check(deps: &Dependencies) -> HealthReport {
    let (cache, database) = tokio::join!(deps.ping_cache(), deps.ping_database());

    if let Err(e) = &cache {
        warn!("Redis health check failed: {}", e);
    }
    if let Err(e) = &database {
        warn!("PostgreSQL health check failed: {}", e);
    }

    let redis = HealthStatus::from_probe(&cache);
    let postgresql = HealthStatus::from_probe(&database);

    HealthReport {
        status: OverallStatus::aggregate(redis, postgresql),
        redis,
        postgresql,
        redis_host: deps.redis_target().host.clone(),
        postgres_host: deps.postgres_target().host.clone(),
    }
}
