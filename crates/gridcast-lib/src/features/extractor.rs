//! Per-driver feature derivation
//!
//! Turns a session's raw laps and classification into one stable feature
//! record per driver. Extraction is pure: the same input always yields the
//! same records. Drivers that cannot be extracted are reported, not silently
//! dropped.

use super::{is_wet_session, pace};
use crate::models::{
    DriverFeatures, DriverResult, Lap, RaceSession, SessionFeatures, SkippedDriver,
};
use tracing::{debug, warn};

/// Derive one driver's feature record.
///
/// `Ok(None)` means the driver ran no laps and is excluded from the output
/// set entirely (no zero-filled record). `Err` carries the reason the driver
/// must be skipped.
fn extract_driver(
    result: &DriverResult,
    laps: &[&Lap],
    baseline: f64,
) -> Result<Option<DriverFeatures>, String> {
    let Some(first_lap) = laps.iter().min_by_key(|lap| lap.lap_number) else {
        return Ok(None);
    };

    let grid = result
        .grid_position
        .ok_or_else(|| "missing grid position".to_string())?;

    let mut stints: Vec<u32> = laps.iter().map(|lap| lap.stint).collect();
    stints.sort_unstable();
    stints.dedup();
    let stops = (stints.len() as u32).saturating_sub(1);

    let quick = pace::quick_laps(laps.iter().copied());
    let times: Vec<f64> = quick.iter().filter_map(|lap| lap.lap_time_secs).collect();
    let (pace_delta, consistency) = if times.is_empty() {
        // A real zero, indistinguishable from perfectly average and
        // perfectly consistent
        (0.0, 0.0)
    } else {
        (pace::mean(&times) - baseline, pace::std_dev(&times))
    };

    // NaN from degenerate arithmetic is coerced, never propagated
    let pace_delta = if pace_delta.is_finite() { pace_delta } else { 0.0 };
    let consistency = if consistency.is_finite() { consistency } else { 0.0 };

    Ok(Some(DriverFeatures {
        code: result.abbreviation.clone(),
        name: result.display_name().to_string(),
        team: result.team.clone(),
        grid,
        start_compound: first_lap.compound.clone(),
        stops,
        pace_delta,
        consistency,
    }))
}

/// Derive feature records for every driver in a session.
///
/// The field baseline and the wet flag are computed once and shared across
/// all drivers. Every driver in the classification with at least one lap
/// yields either a feature record or a skip report.
pub fn extract_session(session: &RaceSession) -> SessionFeatures {
    let baseline = pace::field_baseline(&session.laps);
    let is_wet = is_wet_session(&session.laps);
    debug!(
        baseline_secs = baseline,
        is_wet,
        laps = session.laps.len(),
        "deriving session features"
    );

    let mut drivers = Vec::new();
    let mut skipped = Vec::new();
    for result in &session.results {
        let driver_laps: Vec<&Lap> = session
            .laps
            .iter()
            .filter(|lap| lap.driver == result.driver)
            .collect();

        match extract_driver(result, &driver_laps, baseline) {
            Ok(Some(features)) => drivers.push(features),
            Ok(None) => {
                debug!(driver = %result.abbreviation, "no laps recorded, excluding")
            }
            Err(reason) => {
                warn!(driver = %result.abbreviation, %reason, "skipping driver");
                skipped.push(SkippedDriver {
                    driver: result.abbreviation.clone(),
                    reason,
                });
            }
        }
    }

    SessionFeatures {
        event_name: session.event_name.clone(),
        is_wet,
        drivers,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lap(driver: &str, stint: u32, number: u32, time: Option<f64>, compound: &str) -> Lap {
        Lap {
            driver: driver.to_string(),
            team: "Test Team".to_string(),
            stint,
            lap_number: number,
            lap_time_secs: time,
            compound: compound.to_string(),
        }
    }

    fn result(driver: &str, code: &str, grid: Option<u32>) -> DriverResult {
        DriverResult {
            driver: driver.to_string(),
            abbreviation: code.to_string(),
            full_name: format!("Driver {code}"),
            broadcast_name: None,
            team: "Test Team".to_string(),
            grid_position: grid,
            finish_position: None,
        }
    }

    fn session(laps: Vec<Lap>, results: Vec<DriverResult>) -> RaceSession {
        RaceSession {
            year: 2024,
            round: 1,
            event_name: "Test Grand Prix".to_string(),
            laps,
            results,
        }
    }

    #[test]
    fn test_basic_extraction() {
        let laps = vec![
            lap("1", 1, 1, Some(91.0), "SOFT"),
            lap("1", 1, 2, Some(90.0), "SOFT"),
            lap("1", 2, 3, Some(92.0), "HARD"),
        ];
        let features = extract_session(&session(laps, vec![result("1", "VER", Some(1))]));

        assert_eq!(features.drivers.len(), 1);
        assert!(features.skipped.is_empty());

        let driver = &features.drivers[0];
        assert_eq!(driver.code, "VER");
        assert_eq!(driver.grid, 1);
        assert_eq!(driver.start_compound, "SOFT");
        assert_eq!(driver.stops, 1);
        // Single team, so the baseline equals the driver's own quick mean
        assert!((driver.pace_delta).abs() < 1e-9);
        assert!(driver.consistency > 0.0);
    }

    #[test]
    fn test_stop_count_never_negative() {
        let laps = vec![lap("1", 3, 1, Some(90.0), "MEDIUM")];
        let features = extract_session(&session(laps, vec![result("1", "VER", Some(1))]));
        assert_eq!(features.drivers[0].stops, 0);
    }

    #[test]
    fn test_start_compound_is_chronologically_first() {
        // Laps arrive out of order; lap 1 decides the start compound
        let laps = vec![
            lap("1", 2, 5, Some(90.0), "HARD"),
            lap("1", 1, 1, Some(91.0), "WET"),
        ];
        let features = extract_session(&session(laps, vec![result("1", "VER", Some(4))]));
        assert_eq!(features.drivers[0].start_compound, "WET");
    }

    #[test]
    fn test_driver_without_laps_is_excluded() {
        let laps = vec![lap("1", 1, 1, Some(90.0), "SOFT")];
        let results = vec![result("1", "VER", Some(1)), result("2", "NOR", Some(2))];
        let features = extract_session(&session(laps, results));

        assert_eq!(features.drivers.len(), 1);
        assert_eq!(features.drivers[0].code, "VER");
        // Not an extraction failure; no skip report either
        assert!(features.skipped.is_empty());
    }

    #[test]
    fn test_missing_grid_position_is_reported() {
        let laps = vec![
            lap("1", 1, 1, Some(90.0), "SOFT"),
            lap("2", 1, 1, Some(90.5), "SOFT"),
        ];
        let results = vec![result("1", "VER", Some(1)), result("2", "NOR", None)];
        let features = extract_session(&session(laps, results));

        assert_eq!(features.drivers.len(), 1);
        assert_eq!(features.skipped.len(), 1);
        assert_eq!(features.skipped[0].driver, "NOR");
        assert!(features.skipped[0].reason.contains("grid"));
    }

    #[test]
    fn test_driver_with_no_representative_laps_gets_zeroes() {
        // Driver 2 has laps but none with valid timing, so pace figures are
        // real zeroes and the driver still appears in the output
        let laps = vec![
            lap("1", 1, 1, Some(90.0), "SOFT"),
            lap("1", 1, 2, Some(90.2), "SOFT"),
            lap("2", 1, 1, None, "SOFT"),
            lap("2", 1, 2, None, "SOFT"),
        ];
        let results = vec![result("1", "VER", Some(1)), result("2", "NOR", Some(2))];
        let features = extract_session(&session(laps, results));

        assert_eq!(features.drivers.len(), 2);
        let nor = features.drivers.iter().find(|d| d.code == "NOR").unwrap();
        assert_eq!(nor.pace_delta, 0.0);
        assert_eq!(nor.consistency, 0.0);
    }

    #[test]
    fn test_single_quick_lap_has_zero_consistency() {
        let laps = vec![lap("1", 1, 1, Some(90.0), "SOFT")];
        let features = extract_session(&session(laps, vec![result("1", "VER", Some(1))]));
        assert_eq!(features.drivers[0].consistency, 0.0);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let laps = vec![
            lap("1", 1, 1, Some(91.3), "MEDIUM"),
            lap("1", 1, 2, Some(90.7), "MEDIUM"),
            lap("2", 1, 1, Some(92.1), "HARD"),
        ];
        let results = vec![result("1", "VER", Some(1)), result("2", "NOR", Some(2))];
        let s = session(laps, results);

        let first = extract_session(&s);
        let second = extract_session(&s);
        assert_eq!(first, second);
    }

    #[test]
    fn test_wet_flag_is_session_level() {
        let laps = vec![
            lap("1", 1, 1, Some(95.0), "WET"),
            lap("1", 1, 2, Some(94.0), "INTERMEDIATE"),
            lap("2", 1, 1, Some(90.0), "SOFT"),
        ];
        let results = vec![result("1", "VER", Some(1)), result("2", "NOR", Some(2))];
        let features = extract_session(&session(laps, results));
        assert!(features.is_wet);
    }
}
