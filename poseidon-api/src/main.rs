//! POSEIDON API Server Entry Point
//!
//! Bootstraps configuration, builds the provider, cache and limiter, and
//! starts the Axum HTTP server.

use std::net::SocketAddr;

use poseidon_api::telemetry::{init_tracing, TelemetryConfig};
use poseidon_api::{
    create_api_router, maintenance_task, ApiConfig, ApiError, ApiResult, AppState,
    MaintenanceConfig,
};
use poseidon_storage::{JournalProvider, Provider};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::from_env();
    init_tracing(&telemetry_config)
        .map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))?;

    let config = ApiConfig::from_env()
        .map_err(|e| ApiError::internal_error(format!("Invalid configuration: {}", e)))?;
    let provider = Provider::from_mode(&config.provider_mode)?;
    tracing::info!(
        provider = provider.name(),
        environment = %config.environment,
        "Provider ready"
    );

    let addr = config.bind_addr();
    let maintenance = MaintenanceConfig::from_api_config(&config);
    let state = AppState::new(config, provider);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let maintenance_handle = maintenance.map(|maintenance| {
        tokio::spawn(maintenance_task(
            state.service.cache().clone(),
            state.limiter.clone(),
            maintenance,
            shutdown_rx,
        ))
    });

    let app = create_api_router(state);

    tracing::info!(%addr, "Starting POSEIDON API server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = maintenance_handle {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Maintenance task did not stop cleanly");
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
