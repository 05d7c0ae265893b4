//! Session wetness classification
//!
//! The timing feed carries no explicit weather flag, so wetness is inferred
//! from tyre choice: a session counts as wet when more than 10% of all laps
//! were run on intermediate or full wet tyres. The flag is computed once per
//! session and broadcast to every driver's feature record.

use super::Compound;
use crate::models::Lap;

/// Fraction of wet-weather laps above which a session is classified wet
pub const WET_LAP_RATIO: f64 = 0.10;

/// Classify a session as wet from the compounds used across all laps.
///
/// The comparison is strictly greater-than, so a ratio of exactly 0.10 is
/// still dry. An empty lap set is dry; the ratio is never computed over zero
/// laps.
pub fn is_wet_session(laps: &[Lap]) -> bool {
    if laps.is_empty() {
        return false;
    }
    let wet_laps = laps
        .iter()
        .filter(|lap| Compound::parse(&lap.compound).is_wet_weather())
        .count();
    wet_laps as f64 / laps.len() as f64 > WET_LAP_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lap_on(compound: &str) -> Lap {
        Lap {
            driver: "1".to_string(),
            team: "Test".to_string(),
            stint: 1,
            lap_number: 1,
            lap_time_secs: Some(90.0),
            compound: compound.to_string(),
        }
    }

    #[test]
    fn test_empty_session_is_dry() {
        assert!(!is_wet_session(&[]));
    }

    #[test]
    fn test_ratio_exactly_at_threshold_is_dry() {
        // 1 wet lap out of 10 is exactly 0.10, which must not classify wet
        let mut laps = vec![lap_on("INTERMEDIATE")];
        laps.extend((0..9).map(|_| lap_on("MEDIUM")));
        assert!(!is_wet_session(&laps));
    }

    #[test]
    fn test_ratio_above_threshold_is_wet() {
        let mut laps = vec![lap_on("INTERMEDIATE"), lap_on("WET")];
        laps.extend((0..9).map(|_| lap_on("HARD")));
        assert!(is_wet_session(&laps));
    }

    #[test]
    fn test_lowercase_labels_count() {
        let laps = vec![lap_on("wet"), lap_on("intermediate"), lap_on("soft")];
        assert!(is_wet_session(&laps));
    }

    #[test]
    fn test_unrecognized_compounds_are_not_wet() {
        let laps = vec![lap_on("TEST_UNKNOWN"), lap_on("MYSTERY")];
        assert!(!is_wet_session(&laps));
    }
}
