//! # portflow-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the container clearance API.
//! Binds to a configurable address (default 0.0.0.0:8080).

use portflow_api::config::ApiConfig;
use portflow_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env();
    let addr = config.bind_addr.clone();
    let state = AppState::new(config);
    let app = portflow_api::app(state);

    tracing::info!("PortFlow clearance API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
