// JSON-over-HTTP adapter for the match API.
//
// Endpoints (relative to the configured base URL):
//   GET /todays-match        -> {"teams": ["A", "B"], "venue": "..."}
//   GET /squad?team=A        -> {"team": "A", "players": [{"name": "...", "role": "..."}]}
//   GET /simulate-game       -> {"points": [{"name": "...", "team": "...", "points": 12}]}

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Fixture, FixtureProvider, PointsFeedProvider, ProviderError, SquadProvider};
use crate::draft::player::{Player, PlayerId, Role};
use crate::scoring::PointsFeed;

const FIXTURE_PATH: &str = "todays-match";
const SQUAD_PATH: &str = "squad";
const POINTS_PATH: &str = "simulate-game";

// ---------------------------------------------------------------------------
// Wire types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawFixture {
    teams: Vec<String>,
    #[serde(default)]
    venue: String,
}

#[derive(Debug, Deserialize)]
struct RawSquad {
    team: String,
    players: Vec<RawSquadPlayer>,
}

#[derive(Debug, Deserialize)]
struct RawSquadPlayer {
    name: String,
    role: String,
}

#[derive(Debug, Deserialize)]
struct RawPoints {
    points: Vec<RawPlayerPoints>,
}

#[derive(Debug, Deserialize)]
struct RawPlayerPoints {
    name: String,
    team: String,
    points: i64,
}

// ---------------------------------------------------------------------------
// HttpProvider
// ---------------------------------------------------------------------------

/// Fetches fixtures, squads and points from the match API.
pub struct HttpProvider {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::unavailable("http client", e.to_string()))?;
        Ok(HttpProvider {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ProviderError> {
        let url = self.url(path);
        debug!("GET {url} {query:?}");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::unavailable(path, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::unavailable(
                path,
                format!("API returned status {status}"),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::unavailable(path, format!("failed to read body: {e}")))
    }
}

#[async_trait]
impl FixtureProvider for HttpProvider {
    async fn todays_match(&self) -> Result<Fixture, ProviderError> {
        let body = self.get_text(FIXTURE_PATH, &[]).await?;
        parse_fixture(&body).map_err(|e| ProviderError::unavailable(FIXTURE_PATH, e))
    }
}

#[async_trait]
impl SquadProvider for HttpProvider {
    async fn squad(&self, team_name: &str) -> Result<Vec<Player>, ProviderError> {
        let body = self.get_text(SQUAD_PATH, &[("team", team_name)]).await?;
        parse_squad(&body, team_name).map_err(|e| ProviderError::unavailable(SQUAD_PATH, e))
    }
}

#[async_trait]
impl PointsFeedProvider for HttpProvider {
    async fn points(&self) -> Result<PointsFeed, ProviderError> {
        let body = self.get_text(POINTS_PATH, &[]).await?;
        parse_points(&body).map_err(|e| ProviderError::unavailable(POINTS_PATH, e))
    }
}

// ---------------------------------------------------------------------------
// JSON parsing helpers
// ---------------------------------------------------------------------------

/// Parse the `/todays-match` body. Exactly two distinct teams are required.
pub(crate) fn parse_fixture(body: &str) -> Result<Fixture, String> {
    let raw: RawFixture = serde_json::from_str(body).map_err(|e| format!("invalid fixture: {e}"))?;
    let teams: Vec<String> = raw.teams.into_iter().map(|t| t.trim().to_string()).collect();
    let team_names = <[String; 2]>::try_from(teams)
        .map_err(|teams| format!("fixture must name two teams, got {}", teams.len()))?;
    if team_names.iter().any(String::is_empty) || team_names[0] == team_names[1] {
        return Err("fixture must name two distinct teams".into());
    }
    Ok(Fixture {
        team_names,
        venue: raw.venue.trim().to_string(),
    })
}

/// Parse a `/squad` body for `team_name`.
///
/// Players with an unrecognized role are skipped with a warning. The squad
/// must be for the team that was asked for.
pub(crate) fn parse_squad(body: &str, team_name: &str) -> Result<Vec<Player>, String> {
    let raw: RawSquad = serde_json::from_str(body).map_err(|e| format!("invalid squad: {e}"))?;
    if raw.team.trim() != team_name {
        return Err(format!(
            "asked for squad of {team_name}, received {}",
            raw.team.trim()
        ));
    }

    let mut players = Vec::with_capacity(raw.players.len());
    for p in raw.players {
        match Role::from_str_role(&p.role) {
            Some(role) => players.push(Player::new(p.name.trim(), role, team_name)),
            None => warn!("skipping {} of {}: unknown role '{}'", p.name.trim(), team_name, p.role),
        }
    }
    Ok(players)
}

/// Parse a `/simulate-game` points body.
pub(crate) fn parse_points(body: &str) -> Result<PointsFeed, String> {
    let raw: RawPoints = serde_json::from_str(body).map_err(|e| format!("invalid points feed: {e}"))?;
    let mut feed = PointsFeed::default();
    for p in raw.points {
        let id = PlayerId::new(p.name.trim(), p.team.trim());
        if let Some(earlier) = feed.insert(id.clone(), p.points) {
            warn!("duplicate points entry for {}: {} replaces {}", id, p.points, earlier);
        }
    }
    Ok(feed)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
