// Messages between the console driver and the app loop.

use serde::Serialize;

use crate::draft::controller::Participant;
use crate::draft::player::Player;
use crate::draft::pool::Squad;
use crate::draft::roster::Toggle;
use crate::provider::Fixture;
use crate::scoring::ScoreResult;
use crate::session::SessionSnapshot;

/// A player as typed by a user: a name, optionally qualified by team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerQuery {
    pub name: String,
    pub team: Option<String>,
}

/// Commands sent from the console to the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Fetch today's match and squads, replacing the current session.
    StartMatch,
    /// Toggle a player on a participant's roster.
    Select {
        participant: Participant,
        player: PlayerQuery,
    },
    /// Re-send both rosters.
    Show,
    /// Fetch the points feed and score the match.
    Score,
    Quit,
}

/// The pool and fixture of a newly loaded match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub fixture: Option<Fixture>,
    pub squads: [Squad; 2],
}

/// Updates pushed from the app loop to the console.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UiUpdate {
    MatchLoaded(Box<MatchSummary>),
    Selected {
        participant: Participant,
        player: Player,
        action: Toggle,
    },
    /// A selection was refused; the roster is unchanged.
    Rejected {
        participant: Participant,
        reason: String,
    },
    Rosters(Box<SessionSnapshot>),
    ScoreReady(ScoreResult),
    /// A command failed; prior state is kept and the command may be retried.
    Error(String),
}
