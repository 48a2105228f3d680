// Player identity and cricket roles.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Cricket playing roles, in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Batsman,
    Bowler,
    Allrounder,
    Wicketkeeper,
}

impl Role {
    /// All roles in canonical order.
    pub const ALL: [Role; 4] = [
        Role::Batsman,
        Role::Bowler,
        Role::Allrounder,
        Role::Wicketkeeper,
    ];

    /// Parse a role string as supplied by squad providers.
    ///
    /// Accepts the common spellings ("All-rounder", "WK", "Batter", ...),
    /// case-insensitively.
    pub fn from_str_role(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "batsman" | "batter" | "bat" => Some(Role::Batsman),
            "bowler" | "bowl" => Some(Role::Bowler),
            "allrounder" | "ar" => Some(Role::Allrounder),
            "wicketkeeper" | "keeper" | "wk" | "wicketkeeperbatter" => Some(Role::Wicketkeeper),
            _ => None,
        }
    }

    /// Return the display string for this role.
    pub fn display_str(&self) -> &'static str {
        match self {
            Role::Batsman => "Batsman",
            Role::Bowler => "Bowler",
            Role::Allrounder => "Allrounder",
            Role::Wicketkeeper => "Wicketkeeper",
        }
    }

    /// Rank in the canonical role order, used for stable display sorting.
    pub fn sort_order(&self) -> u8 {
        match self {
            Role::Batsman => 0,
            Role::Bowler => 1,
            Role::Allrounder => 2,
            Role::Wicketkeeper => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A real player available for drafting.
///
/// Identity is `(name, country)`: two values naming the same player of the
/// same team compare equal even if the role was reported differently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub role: Role,
    /// The team the player plays for in today's match.
    pub country: String,
}

impl Player {
    pub fn new(name: impl Into<String>, role: Role, country: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            role,
            country: country.into(),
        }
    }

    /// Key used to look the player up in a points feed.
    pub fn id(&self) -> PlayerId {
        PlayerId {
            name: self.name.clone(),
            team: self.country.clone(),
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.country == other.country
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.country.hash(state);
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.role, self.country)
    }
}

/// Points-feed key for a player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId {
    pub name: String,
    pub team: String,
}

impl PlayerId {
    pub fn new(name: impl Into<String>, team: impl Into<String>) -> Self {
        PlayerId {
            name: name.into(),
            team: team.into(),
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.team, self.name)
    }
}
