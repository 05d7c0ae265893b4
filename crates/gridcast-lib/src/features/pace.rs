//! Representative-lap statistics and the field pace baseline
//!
//! "Representative" (quick) laps are the basis for every pace figure in the
//! pipeline. A lap qualifies when it carries a finite time within 107% of
//! the same driver's personal best in the session, which drops pit in/out
//! laps and laps run under caution.

use crate::models::Lap;
use std::collections::HashMap;

/// Quick-lap cutoff relative to a driver's personal best
pub const QUICK_LAP_THRESHOLD: f64 = 1.07;

/// Field baseline used when a session has no representative laps at all
pub const FALLBACK_FIELD_PACE_SECS: f64 = 90.0;

fn valid_time(lap: &Lap) -> Option<f64> {
    lap.lap_time_secs.filter(|t| t.is_finite() && *t > 0.0)
}

/// Filter a lap set down to representative laps.
///
/// Laps without a valid finite time never qualify, and neither do laps of a
/// driver who set no valid time at all.
pub fn quick_laps<'a, I>(laps: I) -> Vec<&'a Lap>
where
    I: IntoIterator<Item = &'a Lap>,
{
    let laps: Vec<&Lap> = laps.into_iter().collect();

    let mut personal_best: HashMap<&str, f64> = HashMap::new();
    for lap in &laps {
        if let Some(time) = valid_time(lap) {
            let best = personal_best.entry(lap.driver.as_str()).or_insert(time);
            if time < *best {
                *best = time;
            }
        }
    }

    laps.into_iter()
        .filter(|lap| {
            match (valid_time(lap), personal_best.get(lap.driver.as_str())) {
                (Some(time), Some(best)) => time <= best * QUICK_LAP_THRESHOLD,
                _ => false,
            }
        })
        .collect()
}

/// Mean of a sample; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; 0.0 below two samples instead of NaN
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Field pace baseline: mean of per-team mean representative lap times.
///
/// Grouping by team first keeps a team that ran many laps from dominating
/// the baseline. Computed once per session and shared by every driver's
/// pace-delta calculation.
pub fn field_baseline(laps: &[Lap]) -> f64 {
    let quick = quick_laps(laps);
    if quick.is_empty() {
        return FALLBACK_FIELD_PACE_SECS;
    }

    let mut by_team: HashMap<&str, Vec<f64>> = HashMap::new();
    for lap in &quick {
        if let Some(time) = valid_time(lap) {
            by_team.entry(lap.team.as_str()).or_default().push(time);
        }
    }

    let team_means: Vec<f64> = by_team.values().map(|times| mean(times)).collect();
    mean(&team_means)
}
