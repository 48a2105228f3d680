// Point-differential resolution between two rosters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::controller::Participant;
use crate::draft::player::{Player, PlayerId};
use crate::draft::roster::Roster;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    /// The feed has no entry for at least one selected player. Never
    /// treated as zero points.
    #[error("points feed has no entry for {}", format_missing(.missing))]
    IncompletePointsData { missing: Vec<PlayerId> },

    #[error("{participant} has {size} of {capacity} players; both rosters must be full to score")]
    RosterIncomplete {
        participant: Participant,
        size: usize,
        capacity: usize,
    },

    /// A total or the difference does not fit in an `i64`.
    #[error("points totals are out of range")]
    PointsOverflow,

    #[error("points feed unavailable: {0}")]
    Unavailable(String),
}

fn format_missing(missing: &[PlayerId]) -> String {
    missing
        .iter()
        .map(PlayerId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Per-player points for a completed or simulated match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointsFeed {
    points: HashMap<PlayerId, i64>,
}

impl PointsFeed {
    pub fn new(points: HashMap<PlayerId, i64>) -> Self {
        PointsFeed { points }
    }

    /// Points for `player`, or `None` if the feed has no data for them.
    pub fn points_for(&self, player: &Player) -> Option<i64> {
        self.points.get(&player.id()).copied()
    }

    /// Set the points for `id`, returning any value it replaced.
    pub fn insert(&mut self, id: PlayerId, points: i64) -> Option<i64> {
        self.points.insert(id, points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<(PlayerId, i64)> for PointsFeed {
    fn from_iter<I: IntoIterator<Item = (PlayerId, i64)>>(iter: I) -> Self {
        PointsFeed {
            points: iter.into_iter().collect(),
        }
    }
}

/// Who won a scored match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Participant),
    Tie,
}

/// Totals for both rosters and the signed difference (first minus second).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub team_totals: [i64; 2],
    pub difference: i64,
}

impl ScoreResult {
    pub fn outcome(&self) -> Outcome {
        match self.difference.signum() {
            1 => Outcome::Winner(Participant::One),
            -1 => Outcome::Winner(Participant::Two),
            _ => Outcome::Tie,
        }
    }
}

/// Score two rosters against a points feed.
///
/// Pure: the same rosters and feed always give the same result. Every
/// selected player must have an entry in the feed.
pub fn score(first: &Roster, second: &Roster, feed: &PointsFeed) -> Result<ScoreResult, ScoringError> {
    let mut missing = Vec::new();
    // None once a running total overflows
    let mut totals = [Some(0i64); 2];

    for (total, roster) in totals.iter_mut().zip([first, second]) {
        for player in roster.players() {
            match feed.points_for(player) {
                Some(points) => *total = total.and_then(|t| t.checked_add(points)),
                None => missing.push(player.id()),
            }
        }
    }

    if !missing.is_empty() {
        return Err(ScoringError::IncompletePointsData { missing });
    }

    let [Some(first_total), Some(second_total)] = totals else {
        return Err(ScoringError::PointsOverflow);
    };
    let difference = first_total
        .checked_sub(second_total)
        .ok_or(ScoringError::PointsOverflow)?;

    Ok(ScoreResult {
        team_totals: [first_total, second_total],
        difference,
    })
}
