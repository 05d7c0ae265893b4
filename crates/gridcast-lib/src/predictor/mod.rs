//! Position-delta regression and ranking

mod inference;
mod ranker;

pub use inference::{FeatureManifest, OnnxRegressor, CANONICAL_FEATURES};
pub use ranker::rank_predictions;

use crate::models::FeatureVector;
use anyhow::Result;

/// Trait for position-delta regressors
///
/// The model itself is opaque: a feature row in, a scalar finishing-position
/// delta out. Implementations must be immutable after construction so a
/// handle can be shared read-only across requests.
pub trait Regressor: Send + Sync {
    /// Predict the finishing-position delta for one feature row
    fn predict_delta(&self, features: &FeatureVector) -> Result<f64>;

    /// Version identifier of the loaded model
    fn model_version(&self) -> &str;
}
