//! Summaries of the most recent rounds

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{RatingError, Result};
use crate::rating::RatingRun;
use crate::types::{PlayerId, Round, RoundMetadata};

/// One player's line in a round summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundEntry {
    pub player: PlayerId,
    pub score: f64,
    /// Rating after the round
    pub rating: f64,
    /// Change since the previous round
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub number: usize,
    pub metadata: RoundMetadata,
    /// Participants, best score first
    pub entries: Vec<RoundEntry>,
}

/// Summarise the `count` most recent rounds, newest first
///
/// `rounds` must be the exact log the run was computed from. Summarised
/// rounds need a date and a course.
pub fn summarize_recent(
    rounds: &[Round],
    run: &RatingRun,
    count: usize,
) -> Result<Vec<RoundSummary>> {
    if run.rounds_processed() != rounds.len() {
        bail!(
            "Rating run covers {} rounds but the log has {}",
            run.rounds_processed(),
            rounds.len()
        );
    }

    let start = rounds.len().saturating_sub(count);
    rounds[start..]
        .iter()
        .enumerate()
        .rev()
        .map(|(offset, round)| summarize_round(round, start + offset, run))
        .collect()
}

/// `position` is the round's 0-based index in the processed log
fn summarize_round(round: &Round, position: usize, run: &RatingRun) -> Result<RoundSummary> {
    if round.metadata.date.is_none() {
        return Err(RatingError::InvalidMetadata {
            round: round.number,
            reason: "missing date".to_string(),
        }
        .into());
    }
    if round.metadata.course.is_none() {
        return Err(RatingError::InvalidMetadata {
            round: round.number,
            reason: "missing course".to_string(),
        }
        .into());
    }

    let mut entries: Vec<(usize, RoundEntry)> = Vec::with_capacity(round.scores.len());
    for (player, score) in &round.scores {
        let roster_index = run
            .roster()
            .iter()
            .position(|id| id == player)
            .ok_or_else(|| RatingError::UnknownPlayer {
                round: round.number,
                player: player.clone(),
            })?;
        let history = run.history(player).unwrap_or(&[]);
        let (before, after) = match (history.get(position), history.get(position + 1)) {
            (Some(before), Some(after)) => (*before, *after),
            _ => bail!("No rating history for {} in round {}", player, round.number),
        };

        entries.push((
            roster_index,
            RoundEntry {
                player: player.clone(),
                score: *score,
                rating: after,
                delta: after - before,
            },
        ));
    }

    entries.sort_by_key(|(roster_index, _)| *roster_index);
    entries.sort_by(|(_, a), (_, b)| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));

    Ok(RoundSummary {
        number: round.number,
        metadata: round.metadata.clone(),
        entries: entries.into_iter().map(|(_, entry)| entry).collect(),
    })
}
