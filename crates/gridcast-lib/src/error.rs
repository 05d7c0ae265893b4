//! Error taxonomy for the prediction service
//!
//! Every boundary failure maps to one of these kinds so API payloads carry a
//! machine-distinguishable error class. Per-driver extraction failures are
//! deliberately not errors: they surface as skip reports in the feature
//! output instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The timing provider could not supply data for the requested session
    /// (unreleased session, transient fetch failure, upstream outage)
    #[error("upstream data unavailable: {0}")]
    UpstreamUnavailable(String),

    /// No regressor model is loaded; prediction must fail fast rather than
    /// substitute a default
    #[error("prediction model is not loaded")]
    ModelMissing,

    /// Caller-supplied prediction input failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The regressor failed during inference
    #[error("model inference failed")]
    ModelFailure(#[source] anyhow::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    /// Stable machine-readable kind for API error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::ModelMissing => "model_missing",
            Self::InvalidInput(_) => "invalid_input",
            Self::ModelFailure(_) => "model_failure",
            Self::Internal(_) => "internal",
        }
    }
}
