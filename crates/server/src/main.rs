//! gridcast-server - race outcome prediction API
//!
//! Fetches session telemetry from the upstream timing service, derives
//! per-driver features and serves finishing-order predictions from a
//! pre-trained position-delta model.

use anyhow::Result;
use gridcast_lib::{
    health::components,
    predictor::{OnnxRegressor, Regressor},
    provider::HttpSessionProvider,
    HealthRegistry, ServiceMetrics,
};
use gridcast_server::{api, config::ServerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!(version = SERVER_VERSION, "starting gridcast-server");

    let config = ServerConfig::load()?;
    info!(upstream = %config.upstream_url, "server configured");

    let health = HealthRegistry::new();
    health.register(components::PROVIDER).await;
    health.register(components::REGRESSOR).await;

    let metrics = ServiceMetrics::new();

    let cache_dir = if config.cache_dir.is_empty() {
        None
    } else {
        Some(PathBuf::from(&config.cache_dir))
    };
    let provider = HttpSessionProvider::new(&config.upstream_url, cache_dir)?;

    // The model is loaded once here and treated as immutable afterwards;
    // a missing model leaves /predict unavailable but the rest of the API up
    let regressor: Option<Arc<dyn Regressor>> = match OnnxRegressor::load(
        Path::new(&config.model_path),
        Path::new(&config.feature_manifest_path),
    ) {
        Ok(regressor) => {
            info!(version = regressor.model_version(), "regressor loaded");
            Some(Arc::new(regressor))
        }
        Err(error) => {
            warn!(%error, "no regressor loaded, /predict will answer 503");
            health
                .set_degraded(components::REGRESSOR, "model not loaded")
                .await;
            None
        }
    };

    let state = Arc::new(api::AppState {
        provider: Arc::new(provider),
        regressor,
        health: health.clone(),
        metrics,
    });

    health.set_ready(true).await;

    api::serve(config.port, state).await
}
