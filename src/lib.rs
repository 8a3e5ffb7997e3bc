use std::sync::Arc;

use axum::{http::StatusCode, response::Json, routing::get, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod cache;
pub mod conditions;
pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod reference;
pub mod repository;

use cache::LookupCache;
use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub cache: Arc<LookupCache>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            cache: Arc::new(LookupCache::new()),
        }
    }
}

/// API routes without CORS; the binary layers CORS on top.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .nest(
            "/api/cards",
            handlers::search::router().merge(handlers::cards::router()),
        )
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

async fn health_check() -> Result<Json<serde_json::Value>, StatusCode> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": "fcdb-backend",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "search": "/api/cards/search",
            "filters": "/api/cards/filters",
            "card": "/api/cards/:spid",
            "compare": "/api/cards/compare/:spid1/:spid2",
            "health": "/api/health"
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    // The pool never connects; these routes answer before touching it.
    fn test_app() -> Router {
        let url = "postgres://localhost/fconline";
        let config = Config::from_lookup(|key| (key == "DATABASE_URL").then(|| url.to_string()))
            .unwrap();
        let pool = PgPoolOptions::new().connect_lazy(url).unwrap();
        app(AppState::new(pool, config))
    }

    async fn status_of(uri: &str) -> StatusCode {
        test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn health_check_responds() {
        assert_eq!(status_of("/api/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_filters_are_rejected_before_querying() {
        assert_eq!(
            status_of("/api/cards/search?min_ovr=abc").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of("/api/cards/search?preferred_foot=both").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of("/api/cards/search?weak_foot_min=9").await,
            StatusCode::BAD_REQUEST
        );
    }
}
