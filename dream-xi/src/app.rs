// Application state and orchestration logic.
//
// The event loop receives user commands from the console, drives the
// current draft session, and pushes UI updates back. Provider calls are the
// only awaits; selections are synchronous.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::draft::controller::Participant;
use crate::draft::player::Player;
use crate::draft::pool::TeamSide;
use crate::protocol::{MatchSummary, PlayerQuery, UiUpdate, UserCommand};
use crate::provider::Providers;
use crate::scoring::ScoreResult;
use crate::session::DraftSession;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub providers: Providers,
    /// The current match, if one has loaded. Kept when a reload fails.
    pub session: Option<DraftSession>,
    pub last_score: Option<ScoreResult>,
}

impl AppState {
    pub fn new(config: Config, providers: Providers) -> Self {
        AppState {
            config,
            providers,
            session: None,
            last_score: None,
        }
    }

    /// Resolve a typed player name against the current pool.
    fn resolve_player(&self, query: &PlayerQuery) -> Result<Player, String> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| "no match loaded; run `start` first".to_string())?;
        let matches = session.pool().find(&query.name, query.team.as_deref());
        match matches.as_slice() {
            [] => Err(format!("no player named '{}' in today's squads", query.name)),
            [player] => Ok((*player).clone()),
            _ => Err(format!(
                "'{}' plays for both teams; qualify as Team:Name",
                query.name
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the application event loop until `Quit` or the command channel
/// closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    while let Some(cmd) = cmd_rx.recv().await {
        if cmd == UserCommand::Quit {
            info!("Quit command received, shutting down");
            break;
        }
        handle_user_command(&mut state, cmd, &ui_tx).await;
    }

    info!("Application event loop exiting");
    Ok(())
}

/// Handle one user command.
pub async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::StartMatch => {
            let order = state.config.draft.pool_order();
            match DraftSession::start(
                state.providers.fixtures.as_ref(),
                state.providers.squads.as_ref(),
                order,
            )
            .await
            {
                Ok(session) => {
                    let pool = session.pool();
                    let summary = MatchSummary {
                        fixture: session.fixture().cloned(),
                        squads: TeamSide::BOTH.map(|side| pool.squad(side).clone()),
                    };
                    state.session = Some(session);
                    state.last_score = None;
                    let _ = ui_tx.send(UiUpdate::MatchLoaded(Box::new(summary))).await;
                }
                Err(e) => {
                    // Keep whatever session was loaded before
                    warn!("Failed to start match: {}", e);
                    let _ = ui_tx
                        .send(UiUpdate::Error(format!("could not load today's match: {e}")))
                        .await;
                }
            }
        }
        UserCommand::Select {
            participant,
            player,
        } => {
            let player = match state.resolve_player(&player) {
                Ok(p) => p,
                Err(reason) => {
                    debug!("Unresolved player for {}: {}", participant, reason);
                    let _ = ui_tx
                        .send(UiUpdate::Rejected {
                            participant,
                            reason,
                        })
                        .await;
                    return;
                }
            };
            select(state, participant, player, ui_tx).await;
        }
        UserCommand::Show => match &state.session {
            Some(session) => {
                let _ = ui_tx
                    .send(UiUpdate::Rosters(Box::new(session.snapshot())))
                    .await;
            }
            None => {
                let _ = ui_tx
                    .send(UiUpdate::Error("no match loaded".into()))
                    .await;
            }
        },
        UserCommand::Score => {
            let Some(session) = &state.session else {
                let _ = ui_tx
                    .send(UiUpdate::Error("no match loaded".into()))
                    .await;
                return;
            };
            match session.score(state.providers.points.as_ref()).await {
                Ok(result) => {
                    state.last_score = Some(result);
                    let _ = ui_tx.send(UiUpdate::ScoreReady(result)).await;
                }
                Err(e) => {
                    let _ = ui_tx.send(UiUpdate::Error(e.to_string())).await;
                }
            }
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

async fn select(
    state: &mut AppState,
    participant: Participant,
    player: Player,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let Some(session) = state.session.as_mut() else {
        return;
    };
    let update = match session.select(participant, &player) {
        Ok(action) => UiUpdate::Selected {
            participant,
            player,
            action,
        },
        Err(e) => UiUpdate::Rejected {
            participant,
            reason: e.to_string(),
        },
    };
    let _ = ui_tx.send(update).await;
}
