// Roster construction and invariant enforcement.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::Player;
use super::pool::{DraftPool, TeamSide};

/// Maximum number of players on a roster, across both buckets.
pub const ROSTER_CAPACITY: usize = 6;

/// A rejected selection. The roster is unchanged whenever one is returned.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SelectionError {
    #[error("roster is full; remove a player before adding {player}")]
    CapacityExceeded { player: String },

    #[error("{player} is already on this roster")]
    DuplicatePlayer { player: String },

    #[error("{player} is not in the {team} squad")]
    NotInPool { player: String, team: String },

    #[error("{player} is not on this roster")]
    PlayerNotSelected { player: String },
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Toggle {
    Added,
    Removed,
}

/// One participant's selections, split into one bucket per team.
///
/// Buckets keep selection order. The roster holds a shared handle to the
/// pool it drafts from so eligibility can be checked on every add.
///
/// A player removed by `toggle` and toggled straight back returns to the
/// slot it left, so two toggles in a row leave the roster as it was.
#[derive(Debug, Clone)]
pub struct Roster {
    pool: Arc<DraftPool>,
    buckets: [Vec<Player>; 2],
    /// Slot vacated by the most recent `toggle`, cleared by any other change.
    vacated: Option<Vacated>,
}

#[derive(Debug, Clone)]
struct Vacated {
    player: Player,
    side: TeamSide,
    index: usize,
}

/// Rosters are equal when they draft from the same pool and hold the same
/// players in the same order.
impl PartialEq for Roster {
    fn eq(&self, other: &Self) -> bool {
        self.pool == other.pool && self.buckets == other.buckets
    }
}

impl Roster {
    /// An empty roster with one bucket per team in `pool`.
    pub fn empty(pool: Arc<DraftPool>) -> Self {
        Roster {
            pool,
            buckets: [Vec::new(), Vec::new()],
            vacated: None,
        }
    }

    pub fn pool(&self) -> &Arc<DraftPool> {
        &self.pool
    }

    /// Whether the player is selected in either bucket.
    pub fn contains(&self, player: &Player) -> bool {
        self.buckets.iter().any(|b| b.contains(player))
    }

    /// Total selected players across both buckets.
    pub fn size(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn is_full(&self) -> bool {
        self.size() >= ROSTER_CAPACITY
    }

    /// Selected players from one team, in selection order.
    pub fn bucket(&self, side: TeamSide) -> &[Player] {
        &self.buckets[side.index()]
    }

    /// Every selected player, home bucket first.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.buckets.iter().flat_map(|b| b.iter())
    }

    /// Add a player to the bucket for `side`.
    ///
    /// Checks, in order: capacity, duplicates across the whole roster, and
    /// membership in the pool squad for `side`.
    pub fn add(&mut self, player: &Player, side: TeamSide) -> Result<(), SelectionError> {
        if self.is_full() {
            return Err(SelectionError::CapacityExceeded {
                player: player.name.clone(),
            });
        }
        if self.contains(player) {
            return Err(SelectionError::DuplicatePlayer {
                player: player.name.clone(),
            });
        }

        // Store the pool's copy so role data always matches the pool.
        let stored = self
            .pool
            .squad(side)
            .players
            .iter()
            .find(|p| *p == player)
            .cloned()
            .ok_or_else(|| SelectionError::NotInPool {
                player: player.name.clone(),
                team: self.pool.team_name(side).to_string(),
            })?;
        self.buckets[side.index()].push(stored);
        self.vacated = None;
        Ok(())
    }

    /// Remove a player from whichever bucket holds it.
    pub fn remove(&mut self, player: &Player) -> Result<(), SelectionError> {
        self.take(player)?;
        self.vacated = None;
        Ok(())
    }

    /// Remove the player if selected, otherwise add it to `side`.
    ///
    /// Re-adding the player the previous toggle removed puts it back in its
    /// old slot instead of at the end of the bucket.
    pub fn toggle(&mut self, player: &Player, side: TeamSide) -> Result<Toggle, SelectionError> {
        if self.contains(player) {
            let vacated = self.take(player)?;
            self.vacated = Some(vacated);
            return Ok(Toggle::Removed);
        }

        let restore = self
            .vacated
            .take()
            .filter(|v| v.side == side && v.player == *player);
        self.add(player, side)?;
        if let Some(v) = restore {
            // add appended; rotate the new last element back into place
            self.buckets[side.index()][v.index..].rotate_right(1);
        }
        Ok(Toggle::Added)
    }

    fn take(&mut self, player: &Player) -> Result<Vacated, SelectionError> {
        for side in TeamSide::BOTH {
            let bucket = &mut self.buckets[side.index()];
            if let Some(index) = bucket.iter().position(|p| p == player) {
                // Vec::remove shifts, keeping the order of the rest
                let player = bucket.remove(index);
                return Ok(Vacated {
                    player,
                    side,
                    index,
                });
            }
        }
        Err(SelectionError::PlayerNotSelected {
            player: player.name.clone(),
        })
    }

    /// A detached, serializable copy of the selections.
    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            buckets: TeamSide::BOTH.map(|side| BucketSnapshot {
                team: self.pool.team_name(side).to_string(),
                players: self.bucket(side).to_vec(),
            }),
        }
    }
}

/// One bucket of a roster snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSnapshot {
    pub team: String,
    pub players: Vec<Player>,
}

/// Read-only copy of a roster for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub buckets: [BucketSnapshot; 2],
}

impl RosterSnapshot {
    pub fn size(&self) -> usize {
        self.buckets.iter().map(|b| b.players.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::player::Role;
    use crate::draft::pool::Squad;

    fn test_pool() -> Arc<DraftPool> {
        let home = Squad::new(
            "Reds",
            ["Ana", "Ben", "Eve", "Fay", "Gus", "Hal", "Ivy"]
                .iter()
                .map(|n| Player::new(*n, Role::Batsman, "Reds"))
                .collect(),
        );
        let away = Squad::new(
            "Blues",
            vec![
                Player::new("Cid", Role::Batsman, "Blues"),
                Player::new("Dee", Role::Bowler, "Blues"),
            ],
        );
        Arc::new(DraftPool::load(home, away).unwrap())
    }

    fn red(name: &str) -> Player {
        Player::new(name, Role::Batsman, "Reds")
    }

    fn blue(name: &str) -> Player {
        Player::new(name, Role::Batsman, "Blues")
    }

    fn names(roster: &Roster, side: TeamSide) -> Vec<String> {
        roster.bucket(side).iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn empty_roster_has_two_empty_buckets() {
        let roster = Roster::empty(test_pool());
        assert_eq!(roster.size(), 0);
        assert!(roster.is_empty());
        assert!(roster.bucket(TeamSide::Home).is_empty());
        assert!(roster.bucket(TeamSide::Away).is_empty());
    }

    #[test]
    fn add_appends_in_selection_order() {
        let mut roster = Roster::empty(test_pool());
        roster.add(&red("Ben"), TeamSide::Home).unwrap();
        roster.add(&red("Ana"), TeamSide::Home).unwrap();
        roster.add(&blue("Dee"), TeamSide::Away).unwrap();

        assert_eq!(names(&roster, TeamSide::Home), vec!["Ben", "Ana"]);
        assert_eq!(names(&roster, TeamSide::Away), vec!["Dee"]);
        assert_eq!(roster.size(), 3);
    }

    #[test]
    fn add_stores_pool_role() {
        let mut roster = Roster::empty(test_pool());
        // Caller passes the wrong role; identity still matches
        roster
            .add(&Player::new("Dee", Role::Batsman, "Blues"), TeamSide::Away)
            .unwrap();
        assert_eq!(roster.bucket(TeamSide::Away)[0].role, Role::Bowler);
    }

    #[test]
    fn add_duplicate_is_rejected() {
        let mut roster = Roster::empty(test_pool());
        roster.add(&red("Ana"), TeamSide::Home).unwrap();
        let before = roster.clone();

        let err = roster.add(&red("Ana"), TeamSide::Home).unwrap_err();
        assert!(matches!(err, SelectionError::DuplicatePlayer { .. }));
        assert_eq!(roster, before);
    }

    #[test]
    fn add_to_wrong_bucket_is_not_in_pool() {
        let mut roster = Roster::empty(test_pool());
        let err = roster.add(&red("Ana"), TeamSide::Away).unwrap_err();
        assert_eq!(
            err,
            SelectionError::NotInPool {
                player: "Ana".into(),
                team: "Blues".into()
            }
        );
        assert!(roster.is_empty());
    }

    #[test]
    fn add_fabricated_player_is_not_in_pool() {
        let mut roster = Roster::empty(test_pool());
        let err = roster.add(&red("Zed"), TeamSide::Home).unwrap_err();
        assert!(matches!(err, SelectionError::NotInPool { .. }));
    }

    #[test]
    fn seventh_add_is_rejected_and_roster_unchanged() {
        let mut roster = Roster::empty(test_pool());
        for name in ["Ana", "Ben", "Eve", "Fay", "Gus", "Hal"] {
            roster.add(&red(name), TeamSide::Home).unwrap();
        }
        assert!(roster.is_full());

        let err = roster.add(&red("Ivy"), TeamSide::Home).unwrap_err();
        assert!(matches!(err, SelectionError::CapacityExceeded { .. }));
        assert_eq!(roster.size(), ROSTER_CAPACITY);
        assert_eq!(
            names(&roster, TeamSide::Home),
            vec!["Ana", "Ben", "Eve", "Fay", "Gus", "Hal"]
        );
    }

    #[test]
    fn capacity_is_checked_before_duplicates() {
        let mut roster = Roster::empty(test_pool());
        for name in ["Ana", "Ben", "Eve", "Fay", "Gus", "Hal"] {
            roster.add(&red(name), TeamSide::Home).unwrap();
        }
        let err = roster.add(&red("Ana"), TeamSide::Home).unwrap_err();
        assert!(matches!(err, SelectionError::CapacityExceeded { .. }));
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut roster = Roster::empty(test_pool());
        for name in ["Ana", "Ben", "Eve"] {
            roster.add(&red(name), TeamSide::Home).unwrap();
        }
        roster.remove(&red("Ben")).unwrap();
        assert_eq!(names(&roster, TeamSide::Home), vec!["Ana", "Eve"]);
    }

    #[test]
    fn remove_missing_player_is_rejected() {
        let mut roster = Roster::empty(test_pool());
        roster.add(&red("Ana"), TeamSide::Home).unwrap();
        let before = roster.clone();
        let err = roster.remove(&blue("Cid")).unwrap_err();
        assert!(matches!(err, SelectionError::PlayerNotSelected { .. }));
        assert_eq!(roster, before);
    }

    #[test]
    fn toggle_selects_then_deselects() {
        let mut roster = Roster::empty(test_pool());
        assert_eq!(roster.toggle(&red("Ana"), TeamSide::Home), Ok(Toggle::Added));
        assert_eq!(roster.toggle(&red("Ben"), TeamSide::Home), Ok(Toggle::Added));
        assert_eq!(roster.size(), 2);

        assert_eq!(
            roster.toggle(&red("Ana"), TeamSide::Home),
            Ok(Toggle::Removed)
        );
        assert_eq!(names(&roster, TeamSide::Home), vec!["Ben"]);
    }

    #[test]
    fn toggle_twice_restores_prior_state() {
        let mut roster = Roster::empty(test_pool());
        roster.add(&red("Ana"), TeamSide::Home).unwrap();
        roster.add(&blue("Cid"), TeamSide::Away).unwrap();
        let before = roster.clone();

        roster.toggle(&blue("Dee"), TeamSide::Away).unwrap();
        roster.toggle(&blue("Dee"), TeamSide::Away).unwrap();
        assert_eq!(roster, before);
    }

    #[test]
    fn toggle_twice_keeps_slot_of_selected_player() {
        let mut roster = Roster::empty(test_pool());
        for name in ["Ana", "Ben", "Eve"] {
            roster.add(&red(name), TeamSide::Home).unwrap();
        }
        let before = roster.clone();

        assert_eq!(roster.toggle(&red("Ben"), TeamSide::Home), Ok(Toggle::Removed));
        assert_eq!(names(&roster, TeamSide::Home), vec!["Ana", "Eve"]);
        assert_eq!(roster.toggle(&red("Ben"), TeamSide::Home), Ok(Toggle::Added));
        assert_eq!(names(&roster, TeamSide::Home), vec!["Ana", "Ben", "Eve"]);
        assert_eq!(roster, before);
    }

    #[test]
    fn readding_after_other_changes_appends() {
        let mut roster = Roster::empty(test_pool());
        for name in ["Ana", "Ben", "Eve"] {
            roster.add(&red(name), TeamSide::Home).unwrap();
        }
        roster.toggle(&red("Ana"), TeamSide::Home).unwrap();
        roster.toggle(&red("Fay"), TeamSide::Home).unwrap();
        roster.toggle(&red("Ana"), TeamSide::Home).unwrap();
        assert_eq!(names(&roster, TeamSide::Home), vec!["Ben", "Eve", "Fay", "Ana"]);
    }

    #[test]
    fn toggle_on_full_roster_can_still_remove() {
        let mut roster = Roster::empty(test_pool());
        for name in ["Ana", "Ben", "Eve", "Fay", "Gus", "Hal"] {
            roster.add(&red(name), TeamSide::Home).unwrap();
        }
        assert_eq!(
            roster.toggle(&red("Gus"), TeamSide::Home),
            Ok(Toggle::Removed)
        );
        assert_eq!(roster.toggle(&red("Ivy"), TeamSide::Home), Ok(Toggle::Added));
        assert!(roster.is_full());
    }

    #[test]
    fn snapshot_is_detached() {
        let mut roster = Roster::empty(test_pool());
        roster.add(&red("Ana"), TeamSide::Home).unwrap();

        let mut snap = roster.snapshot();
        snap.buckets[0].players.clear();
        assert_eq!(roster.size(), 1);

        let snap = roster.snapshot();
        assert_eq!(snap.size(), 1);
        assert_eq!(snap.buckets[0].team, "Reds");
        assert_eq!(snap.buckets[1].team, "Blues");
    }
}
