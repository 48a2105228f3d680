// One match session: the draft pool and both participants' controllers.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::draft::controller::{Participant, SelectionController};
use crate::draft::player::Player;
use crate::draft::pool::{DraftPool, PoolError, PoolOrder, Squad};
use crate::draft::roster::{RosterSnapshot, SelectionError, Toggle, ROSTER_CAPACITY};
use crate::provider::{Fixture, FixtureProvider, PointsFeedProvider, ProviderError, SquadProvider};
use crate::scoring::{self, ScoreResult, ScoringError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// A draft between two participants for a single match.
///
/// Constructed fresh for each match; nothing carries over from a previous
/// session.
#[derive(Debug, Clone)]
pub struct DraftSession {
    fixture: Option<Fixture>,
    pool: Arc<DraftPool>,
    controllers: [SelectionController; 2],
}

/// Serializable view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub venue: Option<String>,
    pub rosters: [RosterSnapshot; 2],
}

impl DraftSession {
    pub fn new(pool: DraftPool) -> Self {
        let pool = Arc::new(pool);
        DraftSession {
            fixture: None,
            controllers: Participant::BOTH
                .map(|p| SelectionController::new(p, Arc::clone(&pool))),
            pool,
        }
    }

    /// Fetch today's fixture and both squads, then build a session.
    ///
    /// Squads are fetched concurrently. If either fetch fails no session is
    /// built.
    pub async fn start(
        fixtures: &dyn FixtureProvider,
        squads: &dyn SquadProvider,
        order: PoolOrder,
    ) -> Result<Self, SessionError> {
        let fixture = fixtures.todays_match().await?;
        let [home_team, away_team] = &fixture.team_names;
        info!("Today's match: {} vs {} at {}", home_team, away_team, fixture.venue);

        let (home, away) = tokio::try_join!(squads.squad(home_team), squads.squad(away_team))?;

        let pool = DraftPool::load_with(
            Squad::new(home_team.clone(), home),
            Squad::new(away_team.clone(), away),
            order,
        )?;

        let mut session = DraftSession::new(pool);
        session.fixture = Some(fixture);
        Ok(session)
    }

    pub fn fixture(&self) -> Option<&Fixture> {
        self.fixture.as_ref()
    }

    pub fn pool(&self) -> &DraftPool {
        &self.pool
    }

    pub fn controller(&self, participant: Participant) -> &SelectionController {
        &self.controllers[participant.index()]
    }

    /// Toggle `player` on `participant`'s roster.
    pub fn select(&mut self, participant: Participant, player: &Player) -> Result<Toggle, SelectionError> {
        self.controllers[participant.index()].select(player)
    }

    /// Whether both rosters are full.
    pub fn is_complete(&self) -> bool {
        self.controllers.iter().all(|c| c.roster().is_full())
    }

    /// Fetch the points feed and score both rosters.
    ///
    /// Both rosters must be full. The rosters are cloned before the feed is
    /// awaited, so a failed or retried fetch never touches selection state.
    pub async fn score(&self, points: &dyn PointsFeedProvider) -> Result<ScoreResult, ScoringError> {
        for controller in &self.controllers {
            let size = controller.roster().size();
            if size < ROSTER_CAPACITY {
                return Err(ScoringError::RosterIncomplete {
                    participant: controller.participant(),
                    size,
                    capacity: ROSTER_CAPACITY,
                });
            }
        }

        let first = self.controllers[0].roster().clone();
        let second = self.controllers[1].roster().clone();

        let feed = points.points().await.map_err(|e| {
            warn!("Points feed fetch failed: {}", e);
            ScoringError::Unavailable(e.to_string())
        })?;

        let result = scoring::score(&first, &second, &feed)?;
        info!(
            "Scored match: {} - {} (difference {})",
            result.team_totals[0], result.team_totals[1], result.difference
        );
        Ok(result)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            venue: self.fixture.as_ref().map(|f| f.venue.clone()),
            rosters: [self.controllers[0].snapshot(), self.controllers[1].snapshot()],
        }
    }
}
