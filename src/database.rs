use sqlx::{
    migrate::MigrateError,
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::{str::FromStr, time::Duration};
use tracing::{info, warn};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?
        .application_name("fcdb-backend")
        .statement_cache_capacity(200);

    // Each search holds one connection for its count + page queries.
    PgPoolOptions::new()
        .max_connections(16)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(3))
        .idle_timeout(Duration::from_secs(60))
        .connect_with(options)
        .await
}

/// Applies pending migrations. A mismatch with an existing database is logged,
/// not fatal, so the service can still serve a hand-managed schema.
pub async fn run_migrations(pool: &PgPool, skip: bool) {
    if skip {
        warn!("⚠️ Skipping migrations due to SKIP_MIGRATIONS=true");
        return;
    }

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(_) => info!("✅ Migrations completed successfully"),
        Err(MigrateError::VersionMismatch(version)) => {
            warn!("⚠️  Migration version mismatch: {}", version);
            warn!("Database has different migration state than expected");
        }
        Err(e) => {
            warn!("❌ Failed to run migrations: {}", e);
            warn!("Continuing without migrations (set SKIP_MIGRATIONS=true to suppress this warning)");
        }
    }
}
