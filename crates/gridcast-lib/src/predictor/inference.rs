//! ONNX inference using tract
//!
//! Loads the trained position-delta regressor together with its feature
//! manifest and runs single-row inference. The model artifact is produced by
//! an offline training job; this crate never trains or mutates it.

use super::Regressor;
use crate::models::{FeatureVector, NUM_FEATURES};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Canonical feature order the model is trained with
pub const CANONICAL_FEATURES: [&str; NUM_FEATURES] = [
    "grid_position",
    "start_compound",
    "stops",
    "pace_delta",
    "consistency",
    "is_wet",
];

/// Inference latency before a warning is logged (milliseconds)
const MAX_INFERENCE_MS: u128 = 5;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Sidecar manifest stored next to the model artifact
///
/// Names the feature columns the model was trained with, in order, so a
/// model trained against a different feature set is rejected at load time
/// instead of silently producing garbage.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureManifest {
    pub features: Vec<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl FeatureManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read feature manifest at {}", path.display()))?;
        let manifest: Self =
            serde_json::from_str(&text).context("failed to parse feature manifest")?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if self.features != CANONICAL_FEATURES {
            anyhow::bail!(
                "feature manifest {:?} does not match expected order {:?}",
                self.features,
                CANONICAL_FEATURES
            );
        }
        Ok(())
    }
}

/// tract-backed position-delta regressor
///
/// Loaded once at startup and shared read-only behind `Arc`; it is never
/// reloaded or mutated while the process runs.
pub struct OnnxRegressor {
    model: TractModel,
    version: String,
}

impl OnnxRegressor {
    /// Load a model and its feature manifest from disk
    pub fn load(model_path: &Path, manifest_path: &Path) -> Result<Self> {
        let manifest = FeatureManifest::load(manifest_path)?;
        let bytes = std::fs::read(model_path)
            .with_context(|| format!("failed to read model at {}", model_path.display()))?;
        let model = Self::parse_model(&bytes)?;
        let version = manifest.version.unwrap_or_else(|| "v0.1.0".to_string());
        debug!(%version, "regressor loaded");
        Ok(Self { model, version })
    }

    fn parse_model(bytes: &[u8]) -> Result<TractModel> {
        tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(bytes))
            .context("failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
            .context("failed to set input shape")?
            .into_optimized()
            .context("failed to optimize model")?
            .into_runnable()
            .context("failed to create runnable model")
    }

    fn to_tensor(features: &FeatureVector) -> Tensor {
        tract_ndarray::Array2::from_shape_vec((1, NUM_FEATURES), features.to_row().to_vec())
            .unwrap()
            .into()
    }
}

impl Regressor for OnnxRegressor {
    fn predict_delta(&self, features: &FeatureVector) -> Result<f64> {
        let start = Instant::now();

        let input = Self::to_tensor(features);
        let result = self.model.run(tvec!(input.into()))?;
        let output = result.first().context("no output from model")?;
        let view = output.to_array_view::<f32>()?;
        let delta = *view.iter().next().context("empty model output")? as f64;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                "inference exceeded latency target"
            );
        } else {
            debug!(
                elapsed_us = elapsed.as_micros() as u64,
                "inference completed"
            );
        }

        Ok(delta)
    }

    fn model_version(&self) -> &str {
        &self.version
    }
}
