//! Modsink moderation-callback receiver.
//!
//! Main entry point for the modsink server. Initializes tracing, loads
//! configuration, builds the selected archive adapter, and serves HTTP
//! until shutdown.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use modsink_api::{AppState, ArchiveMode, Config};
use modsink_core::{Archive, ConsoleArchive, DbArchive, FileArchive, RealClock};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with structured logging
    init_tracing();

    info!("Starting modsink moderation-callback receiver");

    // Load configuration from defaults, config.toml, and environment
    let config = Config::load()?;
    let addr = config.parse_server_addr()?;
    info!(
        archive_mode = %config.archive_mode,
        environment = %config.environment,
        server_addr = %addr,
        "Configuration loaded"
    );

    // Build the configured archive adapter
    let (archive, file_store, db_pool): (
        Arc<dyn Archive>,
        Option<Arc<FileArchive>>,
        Option<sqlx::PgPool>,
    ) = match config.archive_mode {
        ArchiveMode::Console => {
            info!("Console archive active; callbacks are logged but not persisted");
            (Arc::new(ConsoleArchive::new()), None, None)
        },
        ArchiveMode::File => {
            let store = Arc::new(
                FileArchive::open(&config.log_dir)
                    .await
                    .context("Failed to open log directory")?,
            );
            info!(log_dir = %store.root().display(), "File archive active");
            (store.clone(), Some(store), None)
        },
        ArchiveMode::Database => {
            info!(
                database_url = %config.database_url_masked(),
                max_connections = config.database_max_connections,
                "Connecting to database"
            );
            let pool = create_database_pool(&config).await?;
            info!("Database connection pool established");

            let archive = DbArchive::new(pool.clone());
            archive.run_migrations().await.context("Failed to run database migrations")?;
            info!("Database migrations completed");

            (Arc::new(archive), None, Some(pool))
        },
    };

    let state = AppState::new(archive, file_store, Arc::new(RealClock::new()), config.environment);

    // Serves until CTRL+C/SIGTERM, then drains in-flight requests
    modsink_api::start_server(state, addr).await.context("Server failed")?;

    if let Some(pool) = db_pool {
        pool.close().await;
        info!("Database connections closed");
    }

    info!("Modsink shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,modsink=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Creates the database connection pool with retry logic.
async fn create_database_pool(config: &Config) -> Result<sqlx::PgPool> {
    let mut retries = 0;
    const MAX_RETRIES: u32 = 5;
    const RETRY_DELAY: Duration = Duration::from_secs(2);

    loop {
        match PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                // Verify connection works
                sqlx::query("SELECT 1")
                    .fetch_one(&pool)
                    .await
                    .context("Failed to verify database connection")?;

                return Ok(pool);
            },
            Err(_e) if retries < MAX_RETRIES => {
                retries += 1;
                info!(
                    attempt = retries,
                    max_retries = MAX_RETRIES,
                    "Database connection failed, retrying..."
                );
                tokio::time::sleep(RETRY_DELAY).await;
            },
            Err(e) => {
                return Err(e).context("Failed to create database connection pool after retries");
            },
        }
    }
}
