//! GameHub Connector — game-server connection and event-ingestion service
//!
//! Main entry point that wires all crates together and starts the service.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use gamehub_adapters::{GameAdapterFactory, GenericEventHub};
use gamehub_apiclient::HttpControlPlaneClient;
use gamehub_connector::ingress::{self, IngressState};
use gamehub_connector::{GameServerManager, Reconciler, Watchdog};
use gamehub_core::config::AppConfig;
use gamehub_core::error::AppError;
use gamehub_core::traits::ControlPlaneClient;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Connector error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("GAMEHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main connector run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting GameHub connector v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: External collaborators ───────────────────────────
    let control_plane: Arc<dyn ControlPlaneClient> =
        Arc::new(HttpControlPlaneClient::new(&config.control_plane)?);

    tracing::info!(provider = %config.queue.provider, "Initializing event queue...");
    let queue = gamehub_queue::from_config(&config.queue)?;

    let hub = Arc::new(GenericEventHub::new(config.connector.event_buffer_size));
    let adapters = Arc::new(GameAdapterFactory::new(
        hub.clone(),
        config.connector.event_buffer_size,
    ));

    // ── Step 2: Manager + pool hydration ─────────────────────────
    let manager = Arc::new(GameServerManager::new(
        control_plane.clone(),
        adapters,
        queue,
    ));

    tracing::info!("Waiting for control plane to become healthy...");
    control_plane
        .wait_until_healthy(Duration::from_secs(config.control_plane.health_wait_seconds))
        .await?;

    let reconciler = Arc::new(Reconciler::new(
        manager.clone(),
        control_plane.clone(),
        &config.connector,
    ));

    tracing::info!("Hydrating connection pool from control plane...");
    reconciler.sync_once().await;
    tracing::info!(
        connections = manager.registry().len(),
        "Connection pool hydrated"
    );

    // ── Step 3: Periodic tasks ───────────────────────────────────
    let (cancel_tx, cancel_rx) = watch::channel(false);

    let reconciler_task = {
        let reconciler = reconciler.clone();
        let cancel = cancel_rx.clone();
        tokio::spawn(async move { reconciler.run(cancel).await })
    };

    let watchdog = Arc::new(Watchdog::new(manager.clone(), &config.connector));
    let watchdog_task = {
        let watchdog = watchdog.clone();
        let cancel = cancel_rx.clone();
        tokio::spawn(async move { watchdog.run(cancel).await })
    };

    // ── Step 4: Websocket ingress ────────────────────────────────
    let state = IngressState::new(manager.clone(), hub, &config.ingress);
    let app = ingress::router(state);

    let listener = tokio::net::TcpListener::bind(config.ingress.bind_addr.as_str())
        .await
        .map_err(|e| {
            AppError::configuration(format!(
                "Failed to bind {}: {e}",
                config.ingress.bind_addr
            ))
        })?;

    tracing::info!(addr = %config.ingress.bind_addr, "Websocket ingress listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Ingress server error: {e}")))?;

    // ── Step 5: Graceful shutdown ────────────────────────────────
    tracing::info!("Shutting down...");
    let _ = cancel_tx.send(true);
    let _ = reconciler_task.await;
    let _ = watchdog_task.await;
    manager.remove_all().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Resolves when the process receives a shutdown signal.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
