use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use planner::catalog::ArchetypeCatalog;
use planner::config::Config;
use planner::db::{TimetableDb, TimetableStore};
use planner::server::{create_router, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let config = Config::load_from_directory(&config_dir)
        .with_context(|| format!("loading config from {}", config_dir.display()))?;

    let filter = env::var("RUST_LOG")
        .ok()
        .or_else(|| config.log_filter.clone())
        .unwrap_or_else(|| "planner=info".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = match &config.catalog_path {
        Some(path) => ArchetypeCatalog::load_from_file(path)
            .with_context(|| format!("loading archetype catalog {}", path.display()))?,
        None => ArchetypeCatalog::builtin().clone(),
    };

    let store: Arc<dyn TimetableStore> = Arc::new(
        TimetableDb::new(&config.db_path)
            .with_context(|| format!("opening database {}", config.db_path))?,
    );

    let address = config.bind_address();
    let state = Arc::new(AppState::new(config, store, catalog));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
