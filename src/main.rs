use std::sync::Arc;

use anyhow::Context;
use reelmatch_api::{
    api::{create_router, AppState},
    catalog::Catalog,
    config::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelmatch_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Artifacts must load and validate before we accept any traffic
    let catalog = Catalog::load(&config.indices_path, &config.matrix_path, &config.titles_path)
        .context("Failed to load similarity artifacts")?;

    let state = AppState::from_config(&config, Arc::new(catalog))
        .context("Failed to build TMDB client")?;
    tracing::info!(
        provider = state.enrichment.provider_name(),
        timeout_secs = config.request_timeout_secs,
        "Catalog provider ready"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
