//! Per-driver stint breakdown for strategy visualisation

use super::Compound;
use crate::models::{Lap, RaceSession};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One contiguous run of laps on a single tyre set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StintSummary {
    pub compound: String,
    pub start_lap: u32,
    pub end_lap: u32,
    pub color: String,
}

/// All stints of one driver, in stint order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverStints {
    pub driver: String,
    pub stints: Vec<StintSummary>,
}

/// Break a session down into per-driver stints.
///
/// Drivers without laps are omitted. Stints are ordered by stint number and
/// each carries the lap range it covered plus the compound of its first lap.
pub fn stint_breakdown(session: &RaceSession) -> Vec<DriverStints> {
    let mut breakdown = Vec::new();

    for result in &session.results {
        let driver_laps: Vec<&Lap> = session
            .laps
            .iter()
            .filter(|lap| lap.driver == result.driver)
            .collect();
        if driver_laps.is_empty() {
            continue;
        }

        let mut by_stint: BTreeMap<u32, Vec<&Lap>> = BTreeMap::new();
        for lap in driver_laps {
            by_stint.entry(lap.stint).or_default().push(lap);
        }

        let stints = by_stint
            .values()
            .filter_map(|laps| {
                let first = laps.iter().min_by_key(|lap| lap.lap_number)?;
                let last = laps.iter().max_by_key(|lap| lap.lap_number)?;
                Some(StintSummary {
                    compound: first.compound.clone(),
                    start_lap: first.lap_number,
                    end_lap: last.lap_number,
                    color: Compound::parse(&first.compound).color().to_string(),
                })
            })
            .collect();

        breakdown.push(DriverStints {
            driver: result.abbreviation.clone(),
            stints,
        });
    }

    breakdown
}
