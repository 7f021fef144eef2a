//! Final standings: ranks and win percentages

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::rating::engine::RatingRun;
use crate::types::{PlayerId, Record};

/// One row of the standings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: u32,
    pub player: PlayerId,
    pub rating: f64,
    pub record: Record,
    pub win_percentage: f64,
}

/// Rank players by rating, highest first, starting at 1
///
/// Ranks have no gaps. Equal ratings do not share a rank: they keep the
/// order they had in `ratings`.
pub fn rank(ratings: &[(PlayerId, f64)]) -> Vec<(PlayerId, u32)> {
    let mut order: Vec<&(PlayerId, f64)> = ratings.iter().collect();
    order.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    order
        .into_iter()
        .zip(1..)
        .map(|((player, _), rank)| (player.clone(), rank))
        .collect()
}

/// Share of comparisons won, ties counting half; 0 when nothing was played
pub fn win_percentage(record: &Record) -> f64 {
    let games = record.games();
    if games == 0 {
        return 0.0;
    }

    (record.wins as f64 + 0.5 * record.ties as f64) / games as f64
}

/// Build the standings table for a finished run, sorted by rank
pub fn standings(run: &RatingRun) -> Vec<Standing> {
    let ratings = run.ratings();

    rank(&ratings)
        .into_iter()
        .filter_map(|(player, rank)| {
            let rating = run.rating(&player)?;
            let record = run.record(&player)?;
            Some(Standing {
                rank,
                rating,
                record,
                win_percentage: win_percentage(&record),
                player,
            })
        })
        .collect()
}
