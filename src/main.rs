use axum::http::{header, HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fcdb_backend::{app, config::Config, database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // RUST_LOG wins over the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fcdb_backend=info,sqlx=warn,info")),
        )
        .init();

    let config = Config::load()?;

    let pool = database::create_pool(&config.database_url).await?;
    database::run_migrations(&pool, config.skip_migrations).await;

    let cors = cors_layer(&config);
    let addr = format!("{}:{}", config.host, config.port);

    if let Some(ratio) = config.season_discount_ratio {
        info!("🗓️  Season filter dropped at {:.0}% of all seasons", ratio * 100.0);
    }

    let state = AppState::new(pool, config);
    let app = app(state).layer(cors);

    let listener = TcpListener::bind(&addr).await?;
    info!("🚀 Server starting on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Permissive in debug mode, otherwise restricted to `ALLOWED_ORIGINS`.
fn cors_layer(config: &Config) -> CorsLayer {
    let cors = if config.debug_mode {
        info!("🔓 Development mode: Using permissive CORS");
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("⚠️ Ignoring invalid origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();

        info!("🔒 Production mode: CORS configured for {} origins", origins.len());
        for origin in &origins {
            info!("  - Allowed origin: {:?}", origin);
        }
        CorsLayer::new().allow_origin(origins)
    };

    cors.allow_methods([Method::GET, Method::OPTIONS]).allow_headers([
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::USER_AGENT,
        header::REFERER,
        header::ORIGIN,
    ])
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("👋 Shutting down");
}
