// Draft pool: the two eligible squads for the active match.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::player::Player;

#[derive(Debug, Error, PartialEq)]
pub enum PoolError {
    #[error("invalid squad for {team}: {reason}")]
    InvalidSquad { team: String, reason: String },
}

/// One of the two team slots in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub const BOTH: [TeamSide; 2] = [TeamSide::Home, TeamSide::Away];

    pub fn index(self) -> usize {
        match self {
            TeamSide::Home => 0,
            TeamSide::Away => 1,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSide::Home => write!(f, "home"),
            TeamSide::Away => write!(f, "away"),
        }
    }
}

/// Ordering applied to each squad when the pool is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolOrder {
    /// Stable sort by canonical role rank.
    #[default]
    ByRole,
    /// Keep the order the provider returned.
    Provider,
}

/// A team's list of players as returned by a squad provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    pub team: String,
    pub players: Vec<Player>,
}

impl Squad {
    pub fn new(team: impl Into<String>, players: Vec<Player>) -> Self {
        Squad {
            team: team.into(),
            players,
        }
    }

    pub fn contains(&self, player: &Player) -> bool {
        self.players.iter().any(|p| p == player)
    }

    fn validate(&self) -> Result<(), PoolError> {
        let mut seen: HashSet<&Player> = HashSet::with_capacity(self.players.len());
        for player in &self.players {
            if player.country != self.team {
                return Err(PoolError::InvalidSquad {
                    team: self.team.clone(),
                    reason: format!("{} is listed for {}", player.name, player.country),
                });
            }
            if !seen.insert(player) {
                return Err(PoolError::InvalidSquad {
                    team: self.team.clone(),
                    reason: format!("duplicate player {}", player.name),
                });
            }
        }
        Ok(())
    }
}

/// The pair of squads participants draft from. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftPool {
    squads: [Squad; 2],
}

impl DraftPool {
    /// Validate both squads and sort them into canonical role order.
    pub fn load(home: Squad, away: Squad) -> Result<Self, PoolError> {
        Self::load_with(home, away, PoolOrder::ByRole)
    }

    /// Validate both squads, applying the given ordering.
    ///
    /// Fails if either squad contains a duplicate or foreign player, or if
    /// both squads carry the same team name.
    pub fn load_with(home: Squad, away: Squad, order: PoolOrder) -> Result<Self, PoolError> {
        home.validate()?;
        away.validate()?;

        if home.team == away.team {
            return Err(PoolError::InvalidSquad {
                team: away.team.clone(),
                reason: "both squads carry the same team name".into(),
            });
        }

        let mut squads = [home, away];
        if order == PoolOrder::ByRole {
            for squad in &mut squads {
                // sort_by_key is stable: ties keep provider order
                squad.players.sort_by_key(|p| p.role.sort_order());
            }
        }

        for squad in &squads {
            if squad.players.is_empty() {
                warn!("Squad for {} is empty", squad.team);
            }
        }
        debug!(
            "Draft pool loaded: {} ({} players) vs {} ({} players)",
            squads[0].team,
            squads[0].players.len(),
            squads[1].team,
            squads[1].players.len()
        );

        Ok(DraftPool { squads })
    }

    pub fn squad(&self, side: TeamSide) -> &Squad {
        &self.squads[side.index()]
    }

    pub fn team_name(&self, side: TeamSide) -> &str {
        &self.squads[side.index()].team
    }

    /// Resolve a team label to its slot.
    pub fn side_of(&self, team_label: &str) -> Option<TeamSide> {
        TeamSide::BOTH
            .into_iter()
            .find(|&side| self.team_name(side) == team_label)
    }

    /// Whether the player is in the squad occupying `side`.
    pub fn contains(&self, side: TeamSide, player: &Player) -> bool {
        self.squad(side).contains(player)
    }

    /// All players matching `name` (case-insensitive), optionally restricted
    /// to one team. Home squad first.
    pub fn find(&self, name: &str, team: Option<&str>) -> Vec<&Player> {
        self.squads
            .iter()
            .filter(|s| team.map_or(true, |t| s.team.eq_ignore_ascii_case(t)))
            .flat_map(|s| s.players.iter())
            .filter(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .collect()
    }
}
