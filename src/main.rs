//! Mongo TTL Cache - HTTP front end for a MongoDB-backed TTL cache
//!
//! Serves the cache over a small REST API and runs the background expiry sweep.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mongo_ttl_cache::api::create_router;
use mongo_ttl_cache::{AppState, CacheStore, Config, DocumentStore, MemoryStore, MongoStore};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to MongoDB (or fall back to the in-memory store)
/// 4. Create the cache store, starting the sweep if enabled
/// 5. Serve the HTTP API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mongo_ttl_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mongo TTL Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: collection={}, default_ttl={}s, sweep_interval={}s, sweep_enabled={}, port={}",
        config.collection,
        config.default_ttl,
        config.sweep_interval,
        config.sweep_enabled,
        config.server_port
    );

    let store: Arc<dyn DocumentStore> = match &config.mongodb_uri {
        Some(uri) => {
            info!("Connecting to MongoDB...");
            let mongo = MongoStore::connect(uri, &config.mongodb_database).await?;
            mongo.ensure_expiry_index(&config.collection).await?;
            Arc::new(mongo)
        }
        None => {
            warn!("MONGODB_URI not set, entries will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let cache = CacheStore::new(store, config.cache_options())?;
    info!("Cache store initialized (sweeping: {})", cache.is_sweeping());

    let state = AppState::new(cache);
    let app = create_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.cache.stop_sweep();
    info!("Server shutdown complete");

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
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
