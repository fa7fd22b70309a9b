//! HTTP router

use crate::handlers;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/cache/:key", get(handlers::cache::get))
        .route("/cache/:key/:value", post(handlers::cache::set))
        .route("/db", get(handlers::db::probe))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use kvshim_core::manager::{CacheHandle, DatabaseHandle};
    use kvshim_core::mock::{MemoryCache, StubDatabase};
    use kvshim_core::{Dependencies, Handle, Target};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const VERSION: &str = "PostgreSQL 16.2 on x86_64-pc-linux-gnu";

    fn app(cache: CacheHandle, database: DatabaseHandle) -> Router {
        let deps = Dependencies::new(
            cache,
            database,
            Target::new("redis", 6379),
            Target::new("postgres", 5432),
        );
        router(AppState {
            deps: Arc::new(deps),
        })
    }

    fn healthy_app() -> Router {
        app(
            Handle::Live(Arc::new(MemoryCache::new())),
            Handle::Live(Arc::new(StubDatabase::new(VERSION))),
        )
    }

    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_set_then_get_scenario() {
        let app = healthy_app();

        let (status, body) = send(&app, Method::POST, "/cache/foo/bar").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "key": "foo", "value": "bar"}));

        let (status, body) = send(&app, Method::GET, "/cache/foo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"key": "foo", "value": "bar"}));

        let (status, body) = send(&app, Method::GET, "/cache/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
        assert_eq!(body["error"], "Key 'missing' not found");
    }

    #[tokio::test]
    async fn test_overwrite_returns_latest_value() {
        let app = healthy_app();

        send(&app, Method::POST, "/cache/color/red").await;
        send(&app, Method::POST, "/cache/color/blue").await;

        let (status, body) = send(&app, Method::GET, "/cache/color").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["value"], "blue");
    }

    #[tokio::test]
    async fn test_cache_down_at_startup() {
        let app = app(
            Handle::Unavailable,
            Handle::Live(Arc::new(StubDatabase::new(VERSION))),
        );

        let (status, body) = send(&app, Method::GET, "/cache/foo").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Redis service unavailable");
        assert_eq!(body["code"], "service_unavailable");

        let (status, _) = send(&app, Method::POST, "/cache/foo/bar").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) = send(&app, Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "status": "degraded",
                "redis": "unhealthy",
                "postgresql": "healthy",
                "redis_host": "redis",
                "postgres_host": "postgres",
            })
        );
    }

    #[tokio::test]
    async fn test_cache_errors_after_startup_are_service_unavailable() {
        let cache = Arc::new(MemoryCache::new());
        let app = app(
            Handle::Live(cache.clone()),
            Handle::Live(Arc::new(StubDatabase::new(VERSION))),
        );

        send(&app, Method::POST, "/cache/foo/bar").await;
        cache.set_failing(true);

        let (status, body) = send(&app, Method::GET, "/cache/foo").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let message = body["error"].as_str().unwrap_or_default();
        assert!(message.starts_with("Redis error: "), "{}", message);
    }

    #[tokio::test]
    async fn test_db_probe() {
        let (status, body) = send(&healthy_app(), Method::GET, "/db").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"postgres_version": VERSION, "status": "success"}));

        let down = app(Handle::Live(Arc::new(MemoryCache::new())), Handle::Unavailable);
        let (status, body) = send(&down, Method::GET, "/db").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "PostgreSQL service unavailable");

        let database = Arc::new(StubDatabase::new(VERSION));
        database.set_failing(true);
        let erroring = app(Handle::Live(Arc::new(MemoryCache::new())), Handle::Live(database));
        let (status, body) = send(&erroring, Method::GET, "/db").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"]
            .as_str()
            .unwrap_or_default()
            .starts_with("PostgreSQL error: "));
    }

    #[tokio::test]
    async fn test_health_all_healthy() {
        let (status, body) = send(&healthy_app(), Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["redis"], "healthy");
        assert_eq!(body["postgresql"], "healthy");
    }

    #[tokio::test]
    async fn test_health_never_fails_when_both_down() {
        let app = app(Handle::Unavailable, Handle::Unavailable);

        let (status, body) = send(&app, Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["redis"], "unhealthy");
        assert_eq!(body["postgresql"], "unhealthy");
    }

    #[tokio::test]
    async fn test_root_reports_startup_availability() {
        let cache = Arc::new(MemoryCache::new());
        let app = app(Handle::Live(cache.clone()), Handle::Unavailable);

        // A live handle that later fails is still reported as available.
        cache.set_failing(true);

        let (status, body) = send(&app, Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["services"],
            json!({"redis": "available", "postgresql": "unavailable"})
        );
        assert_eq!(
            body["endpoints"],
            json!({
                "health_check": "/health",
                "cache_get": "/cache/{key}",
                "cache_set": "/cache/{key}/{value}",
                "db_test": "/db",
            })
        );
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (status, _) = send(&healthy_app(), Method::GET, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
