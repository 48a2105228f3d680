// External collaborators: today's fixture, squad lists, and the points feed.
//
// The engine only depends on the traits below. `http` talks to the match
// API; `files` reads the same data from local CSV files for offline play.

pub mod files;
pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::{Config, ProviderKind};
use crate::draft::player::Player;
use crate::scoring::PointsFeed;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The upstream source could not be reached or returned no usable data.
    /// Callers may retry.
    #[error("{source_name} unavailable: {message}")]
    Unavailable {
        source_name: String,
        message: String,
    },
}

impl ProviderError {
    pub fn unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Unavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// Today's match: the two teams and where they play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub team_names: [String; 2],
    pub venue: String,
}

#[async_trait]
pub trait FixtureProvider: Send + Sync {
    async fn todays_match(&self) -> Result<Fixture, ProviderError>;
}

#[async_trait]
pub trait SquadProvider: Send + Sync {
    /// Players for `team_name`, in provider order.
    async fn squad(&self, team_name: &str) -> Result<Vec<Player>, ProviderError>;
}

#[async_trait]
pub trait PointsFeedProvider: Send + Sync {
    async fn points(&self) -> Result<PointsFeed, ProviderError>;
}

/// The three collaborators a match session needs.
#[derive(Clone)]
pub struct Providers {
    pub fixtures: Arc<dyn FixtureProvider>,
    pub squads: Arc<dyn SquadProvider>,
    pub points: Arc<dyn PointsFeedProvider>,
}

impl Providers {
    /// Build providers for the configured source.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        match config.provider.kind {
            ProviderKind::Http => {
                let http = Arc::new(http::HttpProvider::new(
                    &config.provider.base_url,
                    config.provider.timeout(),
                )?);
                info!("Using match API at {}", config.provider.base_url);
                Ok(Providers {
                    fixtures: http.clone(),
                    squads: http.clone(),
                    points: http,
                })
            }
            ProviderKind::Files => {
                let fixture = config
                    .fixture
                    .as_ref()
                    .and_then(|f| f.to_fixture())
                    .ok_or_else(|| ProviderError::unavailable("config", "no [fixture] configured"))?;
                let files = Arc::new(files::FileProvider::new(fixture, &config.provider.data_dir));
                info!("Using offline data from {}", config.provider.data_dir);
                Ok(Providers {
                    fixtures: files.clone(),
                    squads: files.clone(),
                    points: files,
                })
            }
        }
    }
}
