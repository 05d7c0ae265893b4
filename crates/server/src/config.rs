//! Server configuration

use anyhow::Result;
use serde::Deserialize;

/// Server configuration, loaded from GRIDCAST_-prefixed environment
/// variables with serde defaults
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// API server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the upstream timing service
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Directory for the on-disk session cache; empty disables caching
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Path to the trained position-delta model
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Path to the model's feature manifest
    #[serde(default = "default_feature_manifest_path")]
    pub feature_manifest_path: String,
}

fn default_port() -> u16 {
    5000
}

fn default_upstream_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_cache_dir() -> String {
    "cache".to_string()
}

fn default_model_path() -> String {
    "f1_delta.onnx".to_string()
}

fn default_feature_manifest_path() -> String {
    "model_features.json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            upstream_url: default_upstream_url(),
            cache_dir: default_cache_dir(),
            model_path: default_model_path(),
            feature_manifest_path: default_feature_manifest_path(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("GRIDCAST"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}
