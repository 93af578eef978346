//! Bridge MLS - Listing search server
//!
//! Serves listing search and detail lookups backed by the Bridge OData API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bridge_mls::api::{create_router, AppState};
use bridge_mls::{BridgeClient, Config};

/// Main entry point for the listing server.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Build the Bridge API client and application state
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // RUST_LOG overrides; debug mode raises the default to debug
    let default_filter = if config.debug_mode {
        "bridge_mls=debug,tower_http=debug"
    } else {
        "bridge_mls=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bridge MLS listing server");
    info!(
        "Configuration loaded: api_url={}, debug_mode={}, search_ttl={}s, property_ttl={}s, port={}",
        config.api_url,
        config.debug_mode,
        config.search_cache_ttl,
        config.property_cache_ttl,
        config.server_port
    );

    if config.server_token.is_empty() {
        warn!("BRIDGE_SERVER_TOKEN is not set, provider requests will be rejected");
    }
    if config.debug_mode {
        warn!("Debug mode enabled, the response cache is bypassed");
    }

    let client = BridgeClient::new(&config).context("Failed to build Bridge API client")?;
    let state = AppState::from_config(&config, Arc::new(client));
    info!("Listing service initialized");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
