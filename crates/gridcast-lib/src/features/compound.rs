//! Tyre compound normalization

use serde::{Deserialize, Serialize};

/// Numeric fallback applied when encoding an unrecognized compound label
pub const DEFAULT_COMPOUND_CODE: u8 = 2;

/// Tyre compound as reported by the timing feed
///
/// Labels outside the five known compounds are carried as `Unrecognized`
/// rather than folded into `Medium`; the numeric fallback is only applied at
/// encoding time, so callers that care about the distinction still see it.
/// The mapping is one-directional: nothing in the pipeline decodes a numeric
/// code back into a compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unrecognized,
}

impl Compound {
    /// Parse a free-text compound label, case-insensitively
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "SOFT" => Self::Soft,
            "MEDIUM" => Self::Medium,
            "HARD" => Self::Hard,
            "INTERMEDIATE" => Self::Intermediate,
            "WET" => Self::Wet,
            _ => Self::Unrecognized,
        }
    }

    /// Ordinal code used as a model feature: SOFT=1 through WET=5
    pub fn code(self) -> u8 {
        self.code_or(DEFAULT_COMPOUND_CODE)
    }

    /// Ordinal code with an explicit fallback for unrecognized labels
    pub fn code_or(self, fallback: u8) -> u8 {
        match self {
            Self::Soft => 1,
            Self::Medium => 2,
            Self::Hard => 3,
            Self::Intermediate => 4,
            Self::Wet => 5,
            Self::Unrecognized => fallback,
        }
    }

    /// True for the compounds only run in wet conditions
    pub fn is_wet_weather(self) -> bool {
        matches!(self, Self::Intermediate | Self::Wet)
    }

    /// Display color used by the strategy endpoint
    pub fn color(self) -> &'static str {
        match self {
            Self::Soft => "#da291c",
            Self::Medium => "#ffd12e",
            Self::Hard => "#f0f0ec",
            Self::Intermediate => "#43b02a",
            Self::Wet => "#0067ad",
            Self::Unrecognized => "#ffffff",
        }
    }
}
