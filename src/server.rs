//! HTTP server initialization and runtime setup.
//!
//! Connects to Redis, builds the shortening engine and runs the Axum server
//! until SIGINT or SIGTERM.

use crate::application::services::ShortenerService;
use crate::config::{Config, mask_connection_string};
use crate::domain::repositories::{KeyValueStore, StoreError};
use crate::infrastructure::store::RedisStore;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis store (retried with exponential backoff)
/// - Shortening engine
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Redis stays unreachable after all retries
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;

    let shortener = ShortenerService::new(store, config.shortener_settings());
    let state = AppState::new(Arc::new(shortener));

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Connects to Redis, retrying with jittered exponential backoff.
async fn connect_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(config.redis_connect_retries);

    let url = config.redis_url.as_str();
    let op_timeout = config.store_timeout();

    let store = Retry::spawn(strategy, || async move {
        RedisStore::connect(url, op_timeout)
            .await
            .inspect_err(|e: &StoreError| tracing::warn!("Redis connection attempt failed: {}", e))
    })
    .await
    .with_context(|| {
        format!(
            "Redis at {} is unreachable",
            mask_connection_string(&config.redis_url)
        )
    })?;

    Ok(Arc::new(store))
}

/// Resolves on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
