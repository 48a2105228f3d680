// Per-participant selection state machine and draft log.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::player::Player;
use super::pool::DraftPool;
use super::roster::{Roster, RosterSnapshot, SelectionError, Toggle, ROSTER_CAPACITY};

/// The two people playing a match session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    One,
    Two,
}

impl Participant {
    pub const BOTH: [Participant; 2] = [Participant::One, Participant::Two];

    pub fn index(self) -> usize {
        match self {
            Participant::One => 0,
            Participant::Two => 1,
        }
    }

    /// Parse the `1`/`2` shorthand used on the command line.
    pub fn from_number(n: &str) -> Option<Self> {
        match n.trim() {
            "1" => Some(Participant::One),
            "2" => Some(Participant::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::One => write!(f, "participant 1"),
            Participant::Two => write!(f, "participant 2"),
        }
    }
}

/// Where a participant's roster is in the draft.
///
/// There is no locked state: a full roster can still drop and replace
/// players until scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftPhase {
    Empty,
    Selecting(usize),
    Full,
}

impl DraftPhase {
    fn of(size: usize) -> Self {
        match size {
            0 => DraftPhase::Empty,
            n if n >= ROSTER_CAPACITY => DraftPhase::Full,
            n => DraftPhase::Selecting(n),
        }
    }
}

/// A successful selection, recorded in the draft log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub participant: Participant,
    pub player: Player,
    pub action: Toggle,
    pub at: DateTime<Utc>,
}

/// Mediates one participant's selections against the shared pool.
#[derive(Debug, Clone)]
pub struct SelectionController {
    participant: Participant,
    roster: Roster,
    log: Vec<SelectionEvent>,
}

impl SelectionController {
    pub fn new(participant: Participant, pool: Arc<DraftPool>) -> Self {
        SelectionController {
            participant,
            roster: Roster::empty(pool),
            log: Vec::new(),
        }
    }

    pub fn participant(&self) -> Participant {
        self.participant
    }

    /// Toggle `player` in this participant's roster.
    ///
    /// The bucket is the one for the player's team. A player whose team is
    /// not in the pool is rejected with `NotInPool`.
    pub fn select(&mut self, player: &Player) -> Result<Toggle, SelectionError> {
        let side = self.roster.pool().side_of(&player.country);
        let result = match side {
            Some(side) => self.roster.toggle(player, side),
            None => Err(SelectionError::NotInPool {
                player: player.name.clone(),
                team: player.country.clone(),
            }),
        };

        match &result {
            Ok(action) => {
                info!(
                    "{}: {:?} {} ({}/{})",
                    self.participant,
                    action,
                    player,
                    self.roster.size(),
                    ROSTER_CAPACITY
                );
                self.log.push(SelectionEvent {
                    participant: self.participant,
                    player: player.clone(),
                    action: *action,
                    at: Utc::now(),
                });
            }
            Err(e) => debug!("{}: selection rejected: {}", self.participant, e),
        }
        result
    }

    pub fn phase(&self) -> DraftPhase {
        DraftPhase::of(self.roster.size())
    }

    /// Borrow the live roster. Mutation only happens through `select`.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// A detached copy of the roster for rendering.
    pub fn snapshot(&self) -> RosterSnapshot {
        self.roster.snapshot()
    }

    /// Successful selections, oldest first.
    pub fn log(&self) -> &[SelectionEvent] {
        &self.log
    }
}
