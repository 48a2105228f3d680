// Offline provider: fixture from config, squads and points from CSV files.
//
// Layout under the data directory:
//   <team>.csv   name,role
//   points.csv   name,team,points

use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use super::{Fixture, FixtureProvider, PointsFeedProvider, ProviderError, SquadProvider};
use crate::draft::player::{Player, PlayerId, Role};
use crate::scoring::PointsFeed;

const POINTS_FILE: &str = "points.csv";

#[derive(Debug, Deserialize)]
struct RawSquadRow {
    name: String,
    role: String,
}

#[derive(Debug, Deserialize)]
struct RawPointsRow {
    name: String,
    team: String,
    points: i64,
}

/// Serves a fixed fixture and reads squads/points from a data directory.
pub struct FileProvider {
    fixture: Fixture,
    data_dir: PathBuf,
}

impl FileProvider {
    pub fn new(fixture: Fixture, data_dir: impl Into<PathBuf>) -> Self {
        FileProvider {
            fixture,
            data_dir: data_dir.into(),
        }
    }

    pub fn squad_path(&self, team_name: &str) -> PathBuf {
        self.data_dir.join(format!("{team_name}.csv"))
    }

    pub fn points_path(&self) -> PathBuf {
        self.data_dir.join(POINTS_FILE)
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, ProviderError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| ProviderError::unavailable(path.display().to_string(), e.to_string()))
}

#[async_trait]
impl FixtureProvider for FileProvider {
    async fn todays_match(&self) -> Result<Fixture, ProviderError> {
        Ok(self.fixture.clone())
    }
}

#[async_trait]
impl SquadProvider for FileProvider {
    async fn squad(&self, team_name: &str) -> Result<Vec<Player>, ProviderError> {
        let path = self.squad_path(team_name);
        let bytes = read_file(&path).await?;
        let players = load_squad_from_reader(bytes.as_slice(), team_name).map_err(|e| {
            ProviderError::unavailable(path.display().to_string(), format!("CSV error: {e}"))
        })?;
        info!("Loaded {} players for {} from {}", players.len(), team_name, path.display());
        Ok(players)
    }
}

#[async_trait]
impl PointsFeedProvider for FileProvider {
    async fn points(&self) -> Result<PointsFeed, ProviderError> {
        let path = self.points_path();
        let bytes = read_file(&path).await?;
        load_points_from_reader(bytes.as_slice()).map_err(|e| {
            ProviderError::unavailable(path.display().to_string(), format!("CSV error: {e}"))
        })
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

fn load_squad_from_reader<R: Read>(rdr: R, team_name: &str) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawSquadRow>() {
        match result {
            Ok(raw) => match Role::from_str_role(&raw.role) {
                Some(role) => players.push(Player::new(raw.name, role, team_name)),
                None => warn!("skipping {}: unknown role '{}'", raw.name, raw.role),
            },
            Err(e) => warn!("skipping malformed squad row: {}", e),
        }
    }
    Ok(players)
}

fn load_points_from_reader<R: Read>(rdr: R) -> Result<PointsFeed, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut feed = PointsFeed::default();
    for result in reader.deserialize::<RawPointsRow>() {
        match result {
            Ok(raw) => {
                let id = PlayerId::new(raw.name, raw.team);
                if let Some(earlier) = feed.insert(id.clone(), raw.points) {
                    warn!("duplicate points row for {}: {} replaces {}", id, raw.points, earlier);
                }
            }
            Err(e) => warn!("skipping malformed points row: {}", e),
        }
    }
    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn squad_rows_are_parsed() {
        let csv = "name,role\nAna, Batsman\nBen,Bowler\n";
        let players = load_squad_from_reader(csv.as_bytes(), "Reds").unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0], Player::new("Ana", Role::Batsman, "Reds"));
        assert_eq!(players[1].role, Role::Bowler);
    }

    #[test]
    fn squad_rows_with_bad_roles_are_skipped() {
        let csv = "name,role\nAna,Batsman\nMascot,Dancer\nCal,Allrounder\n";
        let players = load_squad_from_reader(csv.as_bytes(), "Reds").unwrap();
        let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Cal"]);
    }

    #[test]
    fn points_rows_are_parsed() {
        let csv = "name,team,points\nAna,Reds,10\nCid,Blues,-3\nBad,Row,lots\n";
        let feed = load_points_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(
            feed.points_for(&Player::new("Cid", Role::Batsman, "Blues")),
            Some(-3)
        );
    }

    #[test]
    fn duplicate_points_rows_keep_last() {
        let csv = "name,team,points\nAna,Reds,10\nAna,Reds,12\n";
        let feed = load_points_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(
            feed.points_for(&Player::new("Ana", Role::Bowler, "Reds")),
            Some(12)
        );
    }

    #[tokio::test]
    async fn reads_squads_and_points_from_directory() {
        let dir = std::env::temp_dir().join("dream_xi_file_provider_test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Reds.csv"), "name,role\nAna,Batsman\n").unwrap();
        fs::write(dir.join("points.csv"), "name,team,points\nAna,Reds,7\n").unwrap();

        let fixture = Fixture {
            team_names: ["Reds".into(), "Blues".into()],
            venue: "Oval".into(),
        };
        let provider = FileProvider::new(fixture.clone(), &dir);

        assert_eq!(provider.todays_match().await.unwrap(), fixture);
        let reds = provider.squad("Reds").await.unwrap();
        assert_eq!(reds.len(), 1);
        let feed = provider.points().await.unwrap();
        assert_eq!(feed.points_for(&reds[0]), Some(7));

        // Missing squad file is an unavailable source, not an empty squad
        let err = provider.squad("Blues").await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable { .. }));

        let _ = fs::remove_dir_all(&dir);
    }
}
