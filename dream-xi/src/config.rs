// Configuration loading and parsing (config/dream_xi.toml).

use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::draft::pool::PoolOrder;
use crate::provider::Fixture;

/// File name of the main config, under `config/`.
pub const CONFIG_FILE: &str = "dream_xi.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// dream_xi.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    /// Fixed fixture for offline play. Required when `provider.kind = "files"`.
    #[serde(default)]
    pub fixture: Option<FixtureConfig>,
    #[serde(default)]
    pub draft: DraftConfig,
    #[serde(default)]
    pub participants: ParticipantsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// The match API over HTTP.
    Http,
    /// CSV files under `data_dir`.
    Files,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_data_dir() -> String {
    "data".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureConfig {
    pub teams: Vec<String>,
    #[serde(default)]
    pub venue: String,
}

impl FixtureConfig {
    /// Convert to a provider fixture. Only valid after `validate`.
    pub fn to_fixture(&self) -> Option<Fixture> {
        let team_names: [String; 2] = self.teams.clone().try_into().ok()?;
        Some(Fixture {
            team_names,
            venue: self.venue.clone(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    /// Sort each squad by role before drafting. Provider order otherwise.
    #[serde(default = "default_true")]
    pub sort_by_role: bool,
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig { sort_by_role: true }
    }
}

impl DraftConfig {
    pub fn pool_order(&self) -> PoolOrder {
        if self.sort_by_role {
            PoolOrder::ByRole
        } else {
            PoolOrder::Provider
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantsConfig {
    pub names: Vec<String>,
}

impl Default for ParticipantsConfig {
    fn default() -> Self {
        ParticipantsConfig {
            names: vec!["Player 1".into(), "Player 2".into()],
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/dream_xi.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&text, &path)?;
    validate(&config)?;
    Ok(config)
}

fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copy any config file missing from `config/` out of `defaults/`.
/// Returns the files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if !path.is_file() {
            continue;
        }

        let target = config_dir.join(file_name);

        // create_new so an existing config is never overwritten
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                dest.write_all(&content).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let provider = &config.provider;
    if provider.timeout_secs == 0 {
        return Err(invalid("provider.timeout_secs", "must be greater than 0"));
    }

    match provider.kind {
        ProviderKind::Http => {
            let url = provider.base_url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(
                    "provider.base_url",
                    format!("must be an http(s) URL, got '{url}'"),
                ));
            }
        }
        ProviderKind::Files => {
            if provider.data_dir.trim().is_empty() {
                return Err(invalid("provider.data_dir", "must not be empty"));
            }
            if config.fixture.is_none() {
                return Err(invalid(
                    "fixture",
                    "a [fixture] section is required when provider.kind = \"files\"",
                ));
            }
        }
    }

    if let Some(fixture) = &config.fixture {
        if fixture.teams.len() != 2 {
            return Err(invalid(
                "fixture.teams",
                format!("must name exactly 2 teams, got {}", fixture.teams.len()),
            ));
        }
        if fixture.teams.iter().any(|t| t.trim().is_empty()) {
            return Err(invalid("fixture.teams", "team names must not be empty"));
        }
        if fixture.teams[0] == fixture.teams[1] {
            return Err(invalid("fixture.teams", "teams must be distinct"));
        }
    }

    let names = &config.participants.names;
    if names.len() != 2 || names.iter().any(|n| n.trim().is_empty()) {
        return Err(invalid(
            "participants.names",
            "must list exactly 2 non-empty names",
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
