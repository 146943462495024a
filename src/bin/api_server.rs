// API Server Binary Entry Point
//
// Purpose: Start the Axum API server over the crop recommendation pipeline
// Usage: cargo run --features api --bin api_server

use crop_advisor_rust::{create_router, AdvisorConfig, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "crop_advisor_rust=info,tower_http=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = AdvisorConfig::from_env();

    tracing::info!("Configuration:");
    tracing::info!("  CROP_MODEL_PATH: {:?}", config.model_path);
    tracing::info!("  ECONOMICS_PATH: {:?}", config.economics_path);
    tracing::info!("  TOP_K: {} ({:?})", config.top_k, config.shortfall_policy);
    tracing::info!("  PORT: {}", config.port);

    let state = AppState::new(&config)?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
