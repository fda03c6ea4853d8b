use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dna_search::config;
use dna_search::server;

/// Resolve when Ctrl+C is received / 等待 Ctrl+C
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received, stopping server..."),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dna_search=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "dna-search-server v{} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME")
    );

    // Load configuration / 加载配置
    let mut app_config = config::load_config()?;
    app_config.apply_env_overrides(|key| std::env::var(key).ok());
    tracing::info!(
        "Server will listen on {}, match cap {:?}",
        app_config.server.get_bind_address(),
        app_config.search.max_matches
    );

    server::serve(&app_config.server, app_config.search.max_matches, shutdown_signal()).await
}
