// Line-oriented console: parses typed commands into UserCommand messages and
// renders UiUpdate messages as plain text.

use std::fmt::Write;

use thiserror::Error;

use crate::config::ParticipantsConfig;
use crate::draft::controller::Participant;
use crate::draft::roster::{RosterSnapshot, Toggle, ROSTER_CAPACITY};
use crate::protocol::{PlayerQuery, UiUpdate, UserCommand};
use crate::scoring::{Outcome, ScoreResult};

pub const HELP: &str = "\
commands:
  start                 load today's match and squads
  pick <1|2> <name>     toggle a player (use Team:Name if ambiguous)
  show                  print both rosters
  score                 fetch points and score the match
  quit                  exit";

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),

    #[error("usage: pick <1|2> <player name>")]
    PickUsage,

    #[error("participant must be 1 or 2, got `{0}`")]
    BadParticipant(String),
}

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines and `help`, which need no round trip
/// to the app loop.
pub fn parse_command(line: &str) -> Result<Option<UserCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "start" => Ok(Some(UserCommand::StartMatch)),
        "show" => Ok(Some(UserCommand::Show)),
        "score" => Ok(Some(UserCommand::Score)),
        "quit" | "exit" | "q" => Ok(Some(UserCommand::Quit)),
        "help" | "?" => Ok(None),
        "pick" | "p" => parse_pick(rest).map(Some),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_pick(args: &str) -> Result<UserCommand, CommandError> {
    let (who, name) = args.split_once(char::is_whitespace).ok_or(CommandError::PickUsage)?;
    let participant =
        Participant::from_number(who).ok_or_else(|| CommandError::BadParticipant(who.into()))?;
    let player = parse_player_query(name).ok_or(CommandError::PickUsage)?;
    Ok(UserCommand::Select {
        participant,
        player,
    })
}

/// `Name` or `Team:Name`.
fn parse_player_query(text: &str) -> Option<PlayerQuery> {
    let text = text.trim();
    let (team, name) = match text.split_once(':') {
        Some((team, name)) => (Some(team.trim()), name.trim()),
        None => (None, text),
    };
    if name.is_empty() || team.is_some_and(str::is_empty) {
        return None;
    }
    Some(PlayerQuery {
        name: name.to_string(),
        team: team.map(String::from),
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render an update for the terminal.
pub fn render(update: &UiUpdate, participants: &ParticipantsConfig) -> String {
    let name = |p: Participant| display_name(p, participants);
    let mut out = String::new();
    match update {
        UiUpdate::MatchLoaded(summary) => {
            if let Some(fixture) = &summary.fixture {
                let _ = writeln!(
                    out,
                    "{} vs {} at {}",
                    fixture.team_names[0], fixture.team_names[1], fixture.venue
                );
            }
            for squad in &summary.squads {
                let _ = writeln!(out, "{} ({} players)", squad.team, squad.players.len());
                for player in &squad.players {
                    let _ = writeln!(out, "  {:<28} {}", player.name, player.role);
                }
            }
        }
        UiUpdate::Selected {
            participant,
            player,
            action,
        } => {
            let verb = match action {
                Toggle::Added => "picked",
                Toggle::Removed => "dropped",
            };
            let _ = writeln!(out, "{} {} {}", name(*participant), verb, player);
        }
        UiUpdate::Rejected {
            participant,
            reason,
        } => {
            let _ = writeln!(out, "{}: {}", name(*participant), reason);
        }
        UiUpdate::Rosters(snapshot) => {
            if let Some(venue) = &snapshot.venue {
                let _ = writeln!(out, "at {venue}");
            }
            for (participant, roster) in Participant::BOTH.iter().zip(&snapshot.rosters) {
                render_roster(&mut out, &name(*participant), roster);
            }
        }
        UiUpdate::ScoreReady(result) => render_score(&mut out, result, participants),
        UiUpdate::Error(message) => {
            let _ = writeln!(out, "error: {message}");
        }
    }
    out
}

fn render_roster(out: &mut String, owner: &str, roster: &RosterSnapshot) {
    let _ = writeln!(out, "{} [{}/{}]", owner, roster.size(), ROSTER_CAPACITY);
    for bucket in &roster.buckets {
        let names: Vec<&str> = bucket.players.iter().map(|p| p.name.as_str()).collect();
        let list = if names.is_empty() {
            "-".to_string()
        } else {
            names.join(", ")
        };
        let _ = writeln!(out, "  {}: {}", bucket.team, list);
    }
}

fn render_score(out: &mut String, result: &ScoreResult, participants: &ParticipantsConfig) {
    for participant in Participant::BOTH {
        let _ = writeln!(
            out,
            "{}: {} points",
            display_name(participant, participants),
            result.team_totals[participant.index()]
        );
    }
    match result.outcome() {
        Outcome::Winner(p) => {
            let _ = writeln!(
                out,
                "{} wins by {}",
                display_name(p, participants),
                result.difference.abs()
            );
        }
        Outcome::Tie => {
            let _ = writeln!(out, "tie");
        }
    }
}

/// Configured display name, falling back to the participant number.
fn display_name(participant: Participant, participants: &ParticipantsConfig) -> String {
    participants
        .names
        .get(participant.index())
        .filter(|n| !n.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| participant.to_string())
}
