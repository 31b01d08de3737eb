pub mod api;
pub mod booking;
pub mod config;
pub mod core_state;
pub mod db;
pub mod fees;
pub mod labs;
pub mod lifecycle;
pub mod models;
pub mod notify;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Startup and shutdown failures.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Core(#[from] core_state::CoreError),
    #[error(transparent)]
    Database(#[from] db::DatabaseError),
}

/// Initialize logging, open the database, start the HTTP server, and
/// run until interrupted.
pub async fn run() -> Result<(), RunError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Wardbook starting v{}", config::APP_VERSION);

    let data_dir = config::app_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let db_path = config::db_path();

    // Run migrations once up front so startup fails fast on a bad schema
    db::sqlite::open_database(&db_path)?;

    let core = Arc::new(core_state::CoreState::new(db_path));
    let addr = SocketAddr::new(config::bind_host(), config::bind_port());
    let mut server = api::start_server(Arc::clone(&core), addr).await?;

    tracing::info!(addr = %server.addr, "Wardbook listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupt received, shutting down");
    server.shutdown();
    core.flush_and_prune_audit()?;

    Ok(())
}
