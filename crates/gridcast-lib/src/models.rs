//! Core data models for the race prediction service

use crate::features::Compound;
use serde::{Deserialize, Serialize};

/// Number of input features expected by the regressor
pub const NUM_FEATURES: usize = 6;

/// A single lap record for one driver, as supplied by the timing provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lap {
    /// Identifier used to join laps against the classification
    pub driver: String,
    pub team: String,
    /// Stint number; a new stint starts at every tyre change
    pub stint: u32,
    pub lap_number: u32,
    /// Lap time in seconds. Absent when the lap carries no valid timing
    /// (typically pit in/out laps).
    pub lap_time_secs: Option<f64>,
    /// Free-text tyre compound label as reported by the feed
    pub compound: String,
}

/// Classification entry for one driver in a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverResult {
    pub driver: String,
    /// Three-letter driver code
    pub abbreviation: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast_name: Option<String>,
    pub team: String,
    /// Starting position; absent when the driver did not qualify
    pub grid_position: Option<u32>,
    /// Finishing position; absent when the driver retired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_position: Option<u32>,
}

impl DriverResult {
    /// Broadcast name when present, otherwise the full name
    pub fn display_name(&self) -> &str {
        match &self.broadcast_name {
            Some(name) if !name.is_empty() => name,
            _ => &self.full_name,
        }
    }
}

/// Everything the provider returns for one race session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSession {
    pub year: u16,
    pub round: u8,
    pub event_name: String,
    pub laps: Vec<Lap>,
    pub results: Vec<DriverResult>,
}

/// One event in a season schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    pub round: u8,
    pub event_name: String,
    pub location: String,
    pub country: String,
}

/// Derived per-driver summary for one session
///
/// This is the record served by the session-features endpoint and the shape
/// callers echo back into the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverFeatures {
    pub code: String,
    pub name: String,
    pub team: String,
    pub grid: u32,
    /// Raw compound label of the first lap; normalized only when encoding
    pub start_compound: String,
    pub stops: u32,
    /// Mean representative lap time minus the field baseline, in seconds.
    /// Negative means faster than the field. 0.0 when the driver has no
    /// representative laps.
    pub pace_delta: f64,
    /// Sample standard deviation of representative lap times, in seconds
    pub consistency: f64,
}

impl DriverFeatures {
    /// Numeric feature row for the regressor
    pub fn feature_vector(&self, is_wet: bool) -> FeatureVector {
        FeatureVector::encode(
            self.grid,
            &self.start_compound,
            self.stops,
            self.pace_delta,
            self.consistency,
            is_wet,
        )
    }
}

/// A driver excluded from feature extraction, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDriver {
    pub driver: String,
    pub reason: String,
}

/// Feature records for every surviving driver plus per-driver skip reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFeatures {
    pub event_name: String,
    /// Session-level wet flag, shared by every driver
    pub is_wet: bool,
    pub drivers: Vec<DriverFeatures>,
    pub skipped: Vec<SkippedDriver>,
}

/// Numeric feature row fed to the regressor, in canonical order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub grid_position: f32,
    pub start_compound: f32,
    pub stops: f32,
    pub pace_delta: f32,
    pub consistency: f32,
    pub is_wet: f32,
}

impl FeatureVector {
    pub fn encode(
        grid: u32,
        start_compound: &str,
        stops: u32,
        pace_delta: f64,
        consistency: f64,
        is_wet: bool,
    ) -> Self {
        Self {
            grid_position: grid as f32,
            start_compound: Compound::parse(start_compound).code() as f32,
            stops: stops as f32,
            pace_delta: pace_delta as f32,
            consistency: consistency as f32,
            is_wet: if is_wet { 1.0 } else { 0.0 },
        }
    }

    /// Row layout; must match the order in the model's feature manifest
    pub fn to_row(&self) -> [f32; NUM_FEATURES] {
        [
            self.grid_position,
            self.start_compound,
            self.stops,
            self.pace_delta,
            self.consistency,
            self.is_wet,
        ]
    }
}

/// Caller-supplied per-driver record for the prediction endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionInput {
    pub code: String,
    pub grid: u32,
    pub start_compound: String,
    pub stops: u32,
    pub pace_delta: f64,
    pub consistency: f64,
}

impl PredictionInput {
    pub fn feature_vector(&self, is_wet: bool) -> FeatureVector {
        FeatureVector::encode(
            self.grid,
            &self.start_compound,
            self.stops,
            self.pace_delta,
            self.consistency,
            is_wet,
        )
    }
}

/// A driver paired with the regressor's raw output
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedDelta {
    pub code: String,
    pub grid: u32,
    /// Predicted finishing-position delta (finish minus grid)
    pub delta: f64,
}

/// Final ranked prediction for one driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDriver {
    pub code: String,
    pub start_pos: u32,
    /// grid + delta, before ranking; real valued, never rounded
    pub predicted_position_raw: f64,
    pub delta: f64,
    /// 1-based rank; ranks always form the permutation 1..=N
    pub predicted_rank: u32,
    /// start_pos - predicted_rank; positive means places gained
    pub gain_loss: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_broadcast() {
        let mut result = DriverResult {
            driver: "1".to_string(),
            abbreviation: "VER".to_string(),
            full_name: "Max Verstappen".to_string(),
            broadcast_name: Some("M VERSTAPPEN".to_string()),
            team: "Red Bull Racing".to_string(),
            grid_position: Some(1),
            finish_position: Some(1),
        };
        assert_eq!(result.display_name(), "M VERSTAPPEN");

        result.broadcast_name = Some(String::new());
        assert_eq!(result.display_name(), "Max Verstappen");

        result.broadcast_name = None;
        assert_eq!(result.display_name(), "Max Verstappen");
    }

    #[test]
    fn test_feature_vector_encoding() {
        let features = FeatureVector::encode(3, "Soft", 2, -0.42, 0.31, true);
        assert_eq!(
            features.to_row(),
            [3.0, 1.0, 2.0, -0.42, 0.31, 1.0]
        );
    }

    #[test]
    fn test_feature_vector_unrecognized_compound_defaults() {
        let features = FeatureVector::encode(10, "TEST_UNKNOWN", 1, 0.0, 0.0, false);
        assert_eq!(features.start_compound, 2.0);
        assert_eq!(features.is_wet, 0.0);
    }
}
