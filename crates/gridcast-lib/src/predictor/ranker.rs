//! Prediction ranking
//!
//! Converts raw per-driver delta predictions into a self-consistent ranked
//! finishing order. Association between a delta and a driver is by code;
//! beyond that the input order only matters for full ties.

use crate::models::{PredictedDelta, RankedDriver};
use std::cmp::Ordering;

/// Rank drivers by raw predicted position.
///
/// raw position = grid + delta, real valued. Sorting is ascending on raw
/// position with ties broken by grid position; inputs tied on both keep
/// their input order (the sort is stable). Ranks are assigned 1-based from
/// the sorted order and always form the permutation 1..=N; gain/loss is
/// grid minus rank, positive when the driver is predicted to gain places.
pub fn rank_predictions(predictions: Vec<PredictedDelta>) -> Vec<RankedDriver> {
    let mut entries: Vec<(f64, PredictedDelta)> = predictions
        .into_iter()
        .map(|prediction| {
            let raw = prediction.grid as f64 + prediction.delta;
            (raw, prediction)
        })
        .collect();

    entries.sort_by(|(raw_a, a), (raw_b, b)| {
        raw_a
            .partial_cmp(raw_b)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.grid.cmp(&b.grid))
    });

    entries
        .into_iter()
        .enumerate()
        .map(|(index, (raw, prediction))| {
            let rank = (index + 1) as u32;
            RankedDriver {
                code: prediction.code,
                start_pos: prediction.grid,
                predicted_position_raw: raw,
                delta: prediction.delta,
                predicted_rank: rank,
                gain_loss: prediction.grid as i32 - rank as i32,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(code: &str, grid: u32, delta: f64) -> PredictedDelta {
        PredictedDelta {
            code: code.to_string(),
            grid,
            delta,
        }
    }

    #[test]
    fn test_worked_scenario() {
        // grids [1,2,3], deltas [+2,-1,+1] -> raw [3,1,4]
        let ranked = rank_predictions(vec![
            prediction("AAA", 1, 2.0),
            prediction("BBB", 2, -1.0),
            prediction("CCC", 3, 1.0),
        ]);

        let order: Vec<&str> = ranked.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(order, vec!["BBB", "AAA", "CCC"]);

        assert_eq!(ranked[0].predicted_rank, 1);
        assert_eq!(ranked[0].gain_loss, 1); // started 2nd, ranked 1st
        assert_eq!(ranked[1].predicted_rank, 2);
        assert_eq!(ranked[1].gain_loss, -1);
        assert_eq!(ranked[2].predicted_rank, 3);
        assert_eq!(ranked[2].gain_loss, 0);

        assert_eq!(ranked[1].predicted_position_raw, 3.0);
    }

    #[test]
    fn test_ranks_are_a_permutation() {
        let ranked = rank_predictions(vec![
            prediction("AAA", 4, 0.5),
            prediction("BBB", 1, 3.5),   // identical raw positions
            prediction("CCC", 2, 2.5),   // for all five drivers
            prediction("DDD", 9, -4.5),
            prediction("EEE", 6, -1.5),
        ]);

        let mut ranks: Vec<u32> = ranked.iter().map(|r| r.predicted_rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_tie_broken_by_grid_position() {
        // Both at raw 5.0; the driver who started further up ranks first
        let ranked = rank_predictions(vec![
            prediction("AAA", 4, 1.0),
            prediction("BBB", 2, 3.0),
        ]);
        assert_eq!(ranked[0].code, "BBB");
        assert_eq!(ranked[1].code, "AAA");
        assert_eq!(ranked[0].predicted_rank, 1);
        assert_eq!(ranked[1].predicted_rank, 2);
    }

    #[test]
    fn test_full_tie_keeps_input_order() {
        // Same raw position and same grid: adjacent distinct ranks in
        // input order
        let ranked = rank_predictions(vec![
            prediction("AAA", 3, 0.0),
            prediction("BBB", 3, 0.0),
        ]);
        assert_eq!(ranked[0].code, "AAA");
        assert_eq!(ranked[1].code, "BBB");
        assert_eq!(ranked[0].predicted_rank, 1);
        assert_eq!(ranked[1].predicted_rank, 2);
    }

    #[test]
    fn test_raw_position_is_not_rounded() {
        let ranked = rank_predictions(vec![prediction("AAA", 5, -1.3)]);
        assert!((ranked[0].predicted_position_raw - 3.7).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_predictions(Vec::new()).is_empty());
    }
}
