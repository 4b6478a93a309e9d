//! windfield - an in-memory wind and air-quality field server
//!
//! This is the main entry point for the windfield application.

use std::net::SocketAddr;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use windfield::data_loader::load_dataset;
use windfield::handlers::build_router;
use windfield::{
    create_http_trace_layer, init_tracing, log_error, AppState, Config, Result, WindfieldError,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so the configured level applies
    let config = Config::load()?;
    init_tracing(&config.log_level);

    info!("Starting windfield v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    info!(
        source = ?config.data.source,
        grid_points = config.grid.fetch_grid().len(),
        "Loading samples"
    );

    let dataset = load_dataset(&config).await.map_err(|e| {
        log_error(&e, "loading samples");
        e
    })?;

    let state = AppState::new_shared(config.clone(), dataset);

    // Validate the application state
    state.validate().map_err(|e| {
        error!("Invalid application state: {}", e);
        e
    })?;

    // Build the router
    let app = build_router(state)
        .layer(create_http_trace_layer())
        .layer(CorsLayer::permissive());

    // Create the server address
    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .map_err(|e| WindfieldError::Config {
                message: format!("Invalid host address: {}", e),
            })?,
        config.server.port,
    ));

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| WindfieldError::Server {
            message: format!("Failed to bind to address: {}", e),
        })?;

    info!("Server is ready to accept connections");

    // Start the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WindfieldError::Server {
            message: format!("Server error: {}", e),
        })?;

    info!("Server has been gracefully shut down");
    Ok(())
}

/// Wait for a shutdown signal
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
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
