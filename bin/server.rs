// Numerology Engine - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use numerology_engine::{api, EngineConfig, NumerologyEngine};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Optional config file
    let config = match std::env::var("NUMEROLOGY_CONFIG") {
        Ok(path) => EngineConfig::from_file(&path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        Err(_) => EngineConfig::default(),
    };

    let engine = Arc::new(NumerologyEngine::from_config(&config)?);
    let app = api::router(engine);

    // Start server
    let addr = std::env::var("NUMEROLOGY_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("server running on http://{}", addr);
    info!("API: POST http://{}/api/numerology", addr);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
