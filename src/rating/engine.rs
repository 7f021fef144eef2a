//! Sequential rating engine
//!
//! Turns each round's score sheet into pairwise comparisons and applies the
//! resulting rating changes. Every pair in a round is evaluated against the
//! ratings as they stood when the round started; changes are summed and
//! applied once all pairs have been evaluated.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace};

use crate::config::RatingConfig;
use crate::error::{RatingError, Result};
use crate::rating::calculator::RatingCalculator;
use crate::rating::elo::EloRatingCalculator;
use crate::types::{Outcome, PlayerId, Record, Round, TiePolicy};

/// Ratings, records and histories of every roster player
///
/// Owned by the engine while rounds are processed; read-only once handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRun {
    roster: Vec<PlayerId>,
    ratings: Vec<f64>,
    records: Vec<Record>,
    histories: Vec<Vec<f64>>,
    rounds_processed: usize,
}

impl RatingRun {
    fn new(roster: Vec<PlayerId>, initial_rating: f64) -> Self {
        let players = roster.len();
        Self {
            roster,
            ratings: vec![initial_rating; players],
            records: vec![Record::default(); players],
            histories: vec![vec![initial_rating]; players],
            rounds_processed: 0,
        }
    }

    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    pub fn rounds_processed(&self) -> usize {
        self.rounds_processed
    }

    fn index_of(&self, player: &str) -> Option<usize> {
        self.roster.iter().position(|id| id == player)
    }

    pub fn rating(&self, player: &str) -> Option<f64> {
        self.index_of(player).map(|i| self.ratings[i])
    }

    pub fn record(&self, player: &str) -> Option<Record> {
        self.index_of(player).map(|i| self.records[i])
    }

    /// Rating after each processed round, starting with the initial rating
    pub fn history(&self, player: &str) -> Option<&[f64]> {
        self.index_of(player).map(|i| self.histories[i].as_slice())
    }

    /// Current ratings in roster order
    pub fn ratings(&self) -> Vec<(PlayerId, f64)> {
        self.roster
            .iter()
            .cloned()
            .zip(self.ratings.iter().copied())
            .collect()
    }

    /// Records in roster order
    pub fn records(&self) -> Vec<(PlayerId, Record)> {
        self.roster
            .iter()
            .cloned()
            .zip(self.records.iter().copied())
            .collect()
    }

    /// Histories in roster order
    pub fn histories(&self) -> impl Iterator<Item = (&PlayerId, &[f64])> {
        self.roster
            .iter()
            .zip(self.histories.iter().map(Vec::as_slice))
    }
}

/// What a single round did to the ratings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: usize,
    /// Net rating change per participant, in roster order
    pub deltas: Vec<(PlayerId, f64)>,
    /// Pairs decided by a strictly lower score
    pub decisive: usize,
    /// Pairs with equal scores
    pub ties: usize,
}

impl RoundOutcome {
    pub fn delta_of(&self, player: &str) -> Option<f64> {
        self.deltas
            .iter()
            .find(|(id, _)| id == player)
            .map(|(_, delta)| *delta)
    }
}

struct Participant {
    index: usize,
    score: f64,
}

/// Rating engine owning the state for one run over a round log
#[derive(Debug)]
pub struct RatingEngine<C: RatingCalculator = EloRatingCalculator> {
    calculator: C,
    tie_policy: TiePolicy,
    lookup: HashMap<PlayerId, usize>,
    state: RatingRun,
}

impl RatingEngine<EloRatingCalculator> {
    /// Create an Elo engine for a fixed roster
    pub fn new(roster: Vec<PlayerId>, config: RatingConfig) -> Result<Self> {
        let tie_policy = config.tie_policy;
        let calculator = EloRatingCalculator::new(config)?;
        Self::with_calculator(roster, calculator, tie_policy)
    }
}

impl<C: RatingCalculator> RatingEngine<C> {
    /// Create an engine around any rating model
    pub fn with_calculator(
        roster: Vec<PlayerId>,
        calculator: C,
        tie_policy: TiePolicy,
    ) -> Result<Self> {
        if roster.is_empty() {
            return Err(RatingError::EmptyRoster.into());
        }

        let mut lookup = HashMap::with_capacity(roster.len());
        for (index, player) in roster.iter().enumerate() {
            if lookup.insert(player.clone(), index).is_some() {
                return Err(RatingError::ConfigurationError {
                    message: format!("Player listed twice in roster: {}", player),
                }
                .into());
            }
        }

        let state = RatingRun::new(roster, calculator.initial_rating());
        Ok(Self {
            calculator,
            tie_policy,
            lookup,
            state,
        })
    }

    pub fn state(&self) -> &RatingRun {
        &self.state
    }

    /// Check a round against the roster and return its players in roster order
    fn participants(&self, round: &Round) -> Result<Vec<Participant>> {
        let mut seen = HashSet::new();
        let mut participants = Vec::with_capacity(round.scores.len());

        for (player, score) in &round.scores {
            let index = *self
                .lookup
                .get(player)
                .ok_or_else(|| RatingError::UnknownPlayer {
                    round: round.number,
                    player: player.clone(),
                })?;

            if !seen.insert(index) {
                return Err(RatingError::DuplicatePlayer {
                    round: round.number,
                    player: player.clone(),
                }
                .into());
            }

            if !score.is_finite() {
                return Err(RatingError::InvalidScore {
                    round: round.number,
                    player: player.clone(),
                    value: score.to_string(),
                }
                .into());
            }

            participants.push(Participant {
                index,
                score: *score,
            });
        }

        participants.sort_by_key(|p| p.index);
        Ok(participants)
    }

    /// Apply one round to the ratings, records and histories
    ///
    /// A round that fails validation leaves the state untouched. Fewer than
    /// two participants means no comparisons, but histories still grow.
    pub fn process_round(&mut self, round: &Round) -> Result<RoundOutcome> {
        let participants = self.participants(round)?;

        let snapshot: Vec<f64> = participants
            .iter()
            .map(|p| self.state.ratings[p.index])
            .collect();
        let mut deltas = vec![0.0; participants.len()];
        let mut decisive = 0;
        let mut ties = 0;

        for i in 0..participants.len() {
            for j in (i + 1)..participants.len() {
                let (first, second) = (&participants[i], &participants[j]);

                if first.score == second.score {
                    ties += 1;
                    let change =
                        self.calculator
                            .rating_change(snapshot[i], snapshot[j], Outcome::Tie);
                    deltas[i] += change;
                    self.state.records[first.index].ties += 1;

                    if self.tie_policy == TiePolicy::Symmetric {
                        deltas[j] +=
                            self.calculator
                                .rating_change(snapshot[j], snapshot[i], Outcome::Tie);
                        self.state.records[second.index].ties += 1;
                    }

                    trace!(
                        "Round {}: {} tied {} ({:+.3})",
                        round.number,
                        self.state.roster[first.index],
                        self.state.roster[second.index],
                        change
                    );
                    continue;
                }

                // Lower score wins
                let (winner, loser) = if first.score < second.score {
                    (i, j)
                } else {
                    (j, i)
                };
                decisive += 1;
                let change = self.calculator.rating_change(
                    snapshot[winner],
                    snapshot[loser],
                    Outcome::Win,
                );
                deltas[winner] += change;
                deltas[loser] -= change;

                let winner_index = participants[winner].index;
                let loser_index = participants[loser].index;
                self.state.records[winner_index].wins += 1;
                self.state.records[loser_index].losses += 1;

                trace!(
                    "Round {}: {} beat {} ({:+.3})",
                    round.number,
                    self.state.roster[winner_index],
                    self.state.roster[loser_index],
                    change
                );
            }
        }

        for (participant, delta) in participants.iter().zip(&deltas) {
            self.state.ratings[participant.index] += delta;
        }
        for (history, rating) in self.state.histories.iter_mut().zip(&self.state.ratings) {
            history.push(*rating);
        }
        self.state.rounds_processed += 1;

        debug!(
            "Processed round {}: {} players, {} decisive pairs, {} ties",
            round.number,
            participants.len(),
            decisive,
            ties
        );

        Ok(RoundOutcome {
            round: round.number,
            deltas: participants
                .iter()
                .zip(deltas)
                .map(|(p, delta)| (self.state.roster[p.index].clone(), delta))
                .collect(),
            decisive,
            ties,
        })
    }

    /// Process rounds in log order and hand back the final state
    pub fn run(mut self, rounds: &[Round]) -> Result<RatingRun> {
        for round in rounds {
            self.process_round(round)
                .with_context(|| format!("Failed to process round {}", round.number))?;
        }

        info!(
            "Rated {} rounds for {} players",
            self.state.rounds_processed,
            self.state.roster.len()
        );
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::calculator::tests::FixedStepCalculator;

    const EPSILON: f64 = 1e-9;

    fn roster(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn round(number: usize, scores: &[(&str, f64)]) -> Round {
        Round::new(
            number,
            scores
                .iter()
                .map(|(name, score)| (name.to_string(), *score))
                .collect(),
        )
    }

    fn engine(names: &[&str]) -> RatingEngine {
        RatingEngine::new(roster(names), RatingConfig::default()).unwrap()
    }

    #[test]
    fn test_two_player_win() {
        let mut engine = engine(&["A", "B"]);
        let outcome = engine
            .process_round(&round(1, &[("A", 50.0), ("B", 55.0)]))
            .unwrap();

        let state = engine.state();
        assert!((state.rating("A").unwrap() - 102.0).abs() < EPSILON);
        assert!((state.rating("B").unwrap() - 98.0).abs() < EPSILON);
        assert_eq!(
            state.record("A").unwrap(),
            Record {
                wins: 1,
                losses: 0,
                ties: 0
            }
        );
        assert_eq!(
            state.record("B").unwrap(),
            Record {
                wins: 0,
                losses: 1,
                ties: 0
            }
        );
        assert_eq!(outcome.decisive, 1);
        assert_eq!(outcome.ties, 0);
    }

    #[test]
    fn test_two_player_tie_books_first_player_only() {
        // Single-sided tie accounting: only the first player in roster order
        // gets the tie counted. Kept for compatibility with existing reports.
        let mut engine = engine(&["A", "B"]);
        engine
            .process_round(&round(1, &[("B", 52.0), ("A", 52.0)]))
            .unwrap();

        let state = engine.state();
        assert_eq!(state.rating("A").unwrap(), 100.0);
        assert_eq!(state.rating("B").unwrap(), 100.0);
        assert_eq!(state.record("A").unwrap().ties, 1);
        assert_eq!(state.record("B").unwrap().ties, 0);
    }

    #[test]
    fn test_symmetric_tie_policy_books_both_players() {
        let config = RatingConfig {
            tie_policy: TiePolicy::Symmetric,
            ..RatingConfig::default()
        };
        let mut engine = RatingEngine::new(roster(&["A", "B"]), config).unwrap();

        // Give A a head start so the tie actually moves ratings
        engine
            .process_round(&round(1, &[("A", 50.0), ("B", 60.0)]))
            .unwrap();
        let outcome = engine
            .process_round(&round(2, &[("A", 54.0), ("B", 54.0)]))
            .unwrap();

        let a = outcome.delta_of("A").unwrap();
        let b = outcome.delta_of("B").unwrap();
        assert!(a < 0.0);
        assert!((a + b).abs() < EPSILON);
        assert_eq!(engine.state().record("A").unwrap().ties, 1);
        assert_eq!(engine.state().record("B").unwrap().ties, 1);
    }

    #[test]
    fn test_single_sided_tie_moves_only_first_player() {
        let mut engine = engine(&["A", "B"]);
        engine
            .process_round(&round(1, &[("A", 50.0), ("B", 60.0)]))
            .unwrap();
        let outcome = engine
            .process_round(&round(2, &[("A", 54.0), ("B", 54.0)]))
            .unwrap();

        assert!(outcome.delta_of("A").unwrap() < 0.0);
        assert_eq!(outcome.delta_of("B").unwrap(), 0.0);
    }

    #[test]
    fn test_round_uses_start_of_round_ratings() {
        // A beats B and C, B beats C. Against the snapshot every pair is an
        // even match worth exactly K/2.
        let mut engine = engine(&["A", "B", "C"]);
        engine
            .process_round(&round(1, &[("A", 48.0), ("B", 52.0), ("C", 57.0)]))
            .unwrap();

        let state = engine.state();
        assert!((state.rating("A").unwrap() - 104.0).abs() < EPSILON);
        assert!((state.rating("B").unwrap() - 100.0).abs() < EPSILON);
        assert!((state.rating("C").unwrap() - 96.0).abs() < EPSILON);
    }

    #[test]
    fn test_pair_deltas_independent_of_roster_order() {
        let rounds = vec![
            round(1, &[("A", 50.0), ("B", 53.0), ("C", 58.0), ("D", 51.0)]),
            round(2, &[("A", 55.0), ("B", 49.0), ("C", 52.0), ("D", 60.0)]),
            round(3, &[("A", 47.0), ("C", 56.0), ("D", 50.0)]),
        ];

        let forward = engine(&["A", "B", "C", "D"]).run(&rounds).unwrap();
        let backward = engine(&["D", "C", "B", "A"]).run(&rounds).unwrap();

        for player in ["A", "B", "C", "D"] {
            let f = forward.rating(player).unwrap();
            let b = backward.rating(player).unwrap();
            assert!((f - b).abs() < EPSILON, "{} differs: {} vs {}", player, f, b);
        }
    }

    #[test]
    fn test_decisive_pairs_are_zero_sum() {
        let mut engine = engine(&["A", "B", "C", "D"]);
        engine
            .process_round(&round(1, &[("A", 50.0), ("B", 53.0), ("C", 58.0)]))
            .unwrap();
        let outcome = engine
            .process_round(&round(2, &[("A", 57.0), ("B", 49.0), ("C", 52.0), ("D", 60.0)]))
            .unwrap();

        let total: f64 = outcome.deltas.iter().map(|(_, delta)| delta).sum();
        assert!(total.abs() < EPSILON);
        assert_eq!(outcome.decisive, 6);
    }

    #[test]
    fn test_absent_player_is_untouched() {
        let mut engine = engine(&["A", "B", "C"]);
        engine
            .process_round(&round(1, &[("A", 50.0), ("B", 55.0)]))
            .unwrap();

        let state = engine.state();
        assert_eq!(state.rating("C").unwrap(), 100.0);
        assert_eq!(state.record("C").unwrap(), Record::default());
        assert_eq!(state.history("C").unwrap(), &[100.0, 100.0]);
    }

    #[test]
    fn test_single_participant_round_is_noop() {
        let mut engine = engine(&["A", "B"]);
        let outcome = engine.process_round(&round(1, &[("A", 50.0)])).unwrap();

        assert_eq!(outcome.decisive, 0);
        assert_eq!(outcome.ties, 0);
        assert_eq!(engine.state().history("A").unwrap(), &[100.0, 100.0]);
        assert_eq!(engine.state().rounds_processed(), 1);
    }

    #[test]
    fn test_history_length_tracks_rounds() {
        let rounds: Vec<Round> = (1..=5)
            .map(|n| round(n, &[("A", 50.0 + n as f64), ("B", 53.0)]))
            .collect();
        let run = engine(&["A", "B", "C"]).run(&rounds).unwrap();

        assert_eq!(run.rounds_processed(), 5);
        for (_, history) in run.histories() {
            assert_eq!(history.len(), 6);
        }
    }

    #[test]
    fn test_wins_match_losses() {
        let rounds = vec![
            round(1, &[("A", 50.0), ("B", 53.0), ("C", 53.0)]),
            round(2, &[("A", 55.0), ("B", 49.0), ("C", 52.0)]),
        ];
        let run = engine(&["A", "B", "C"]).run(&rounds).unwrap();

        let records = run.records();
        let wins: u32 = records.iter().map(|(_, r)| r.wins).sum();
        let losses: u32 = records.iter().map(|(_, r)| r.losses).sum();
        let ties: u32 = records.iter().map(|(_, r)| r.ties).sum();
        assert_eq!(wins, 5);
        assert_eq!(losses, 5);
        assert_eq!(ties, 1);
    }

    #[test]
    fn test_unknown_player_rejected() {
        let mut engine = engine(&["A", "B"]);
        let err = engine
            .process_round(&round(4, &[("A", 50.0), ("Z", 55.0)]))
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<RatingError>(),
            Some(&RatingError::UnknownPlayer {
                round: 4,
                player: "Z".to_string()
            })
        );
        assert_eq!(engine.state().rounds_processed(), 0);
        assert_eq!(engine.state().history("A").unwrap().len(), 1);
    }

    #[test]
    fn test_non_finite_score_rejected_without_mutation() {
        let mut engine = engine(&["A", "B", "C"]);
        let result = engine.process_round(&round(1, &[("A", 50.0), ("B", f64::NAN), ("C", 52.0)]));

        assert!(matches!(
            result.unwrap_err().downcast_ref::<RatingError>(),
            Some(RatingError::InvalidScore { round: 1, .. })
        ));
        assert_eq!(engine.state().record("A").unwrap(), Record::default());
        assert_eq!(engine.state().rating("C").unwrap(), 100.0);
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let mut engine = engine(&["A", "B"]);
        let result = engine.process_round(&round(1, &[("A", 50.0), ("A", 52.0)]));
        assert!(matches!(
            result.unwrap_err().downcast_ref::<RatingError>(),
            Some(RatingError::DuplicatePlayer { .. })
        ));
    }

    #[test]
    fn test_run_stops_at_invalid_round() {
        let rounds = vec![
            round(1, &[("A", 50.0), ("B", 55.0)]),
            round(2, &[("A", 50.0), ("X", 55.0)]),
        ];
        let err = engine(&["A", "B"]).run(&rounds).unwrap_err();
        assert!(err.to_string().contains("round 2"));
        assert!(err.downcast_ref::<RatingError>().is_some());
    }

    #[test]
    fn test_roster_validation() {
        assert!(RatingEngine::new(vec![], RatingConfig::default()).is_err());
        assert!(RatingEngine::new(roster(&["A", "A"]), RatingConfig::default()).is_err());
    }

    #[test]
    fn test_custom_calculator() {
        let calculator = FixedStepCalculator { step: 1.0 };
        let mut engine =
            RatingEngine::with_calculator(roster(&["A", "B", "C"]), calculator, TiePolicy::SingleSided)
                .unwrap();
        engine
            .process_round(&round(1, &[("A", 40.0), ("B", 45.0), ("C", 50.0)]))
            .unwrap();

        let state = engine.state();
        assert_eq!(state.rating("A").unwrap(), 2.0);
        assert_eq!(state.rating("B").unwrap(), 0.0);
        assert_eq!(state.rating("C").unwrap(), -2.0);
    }
}
