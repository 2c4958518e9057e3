use std::sync::Arc;

use anyhow::{Context, Result};
use domain::{PhotoStore, WorkforceStore};
use guard_manager_api::{app, config, middleware, services};
use persistence::{MemoryStore, PgStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load().context("Failed to load configuration")?;

    middleware::logging::init_logging(&config.logging)
        .context("Failed to initialize logging")?;
    middleware::metrics::init_metrics().context("Failed to initialize metrics")?;

    info!("Starting Guard Manager API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn WorkforceStore> = if config.database.is_memory() {
        warn!("Using the in-memory store; data is lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        let pool = persistence::db::create_pool(&config.database.pool_config())
            .await
            .context("Failed to connect to the database")?;

        info!("Running database migrations...");
        persistence::db::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
        info!("Migrations completed");

        Arc::new(PgStore::new(pool))
    };

    let photo_store =
        services::LocalPhotoStore::new(&config.uploads.dir, &config.uploads.public_prefix);
    photo_store
        .ensure_dir()
        .await
        .with_context(|| format!("Failed to create upload directory {}", config.uploads.dir))?;
    let photos: Arc<dyn PhotoStore> = Arc::new(photo_store);

    if let Some(user_id) =
        services::admin_bootstrap::bootstrap_admin(store.as_ref(), &config.admin).await?
    {
        info!(user_id, "Bootstrap admin account created");
    }

    let addr = config.socket_addr();
    let app = app::create_app(config, store, photos).context("Invalid JWT configuration")?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
