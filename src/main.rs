// copystream - streaming AI product-copy generation server
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use copystream::cache::{CacheStore, MemoryCache};
use copystream::cli::Args;
use copystream::config::AppConfig;
use copystream::generation::Provider;
use copystream::openai::OpenAiClient;
use copystream::server::{create_router, AppState};
use copystream::usage::UsageTracker;
use copystream::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = AppConfig::load(args.config.as_deref())?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting copystream v{}", env!("CARGO_PKG_VERSION"));

    if !config.provider.has_api_key() {
        warn!("No provider API key found; generation requests will be rejected");
        warn!("Set OPENAI_API_KEY or provider.api_key in the config file");
    }

    // Phase 3: Build shared services
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new(Duration::from_secs(
        config.cache.default_ttl_seconds,
    )));
    let swept = cache.sweep();
    if swept > 0 {
        info!(swept, "removed expired cache entries");
    }
    let usage = Arc::new(UsageTracker::new());

    // Phase 4: Construct the provider client
    let provider: Arc<dyn Provider> = Arc::new(OpenAiClient::new(&config.provider)?);

    info!(
        image_generation = config.features.enable_image_generation,
        caching = config.features.enable_caching,
        "feature flags"
    );

    // Phase 5: Build and start HTTP server
    let state = AppState {
        config: config.clone(),
        provider,
        cache,
        usage,
    };
    let app = create_router(state)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 6: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
