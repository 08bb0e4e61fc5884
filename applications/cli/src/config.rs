/// Application configuration
use crate::error::{CliError, Result};
use nextsound_client::{normalize_base_url, ClientConfig};
use nextsound_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "nextsound.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Directory for search history and the legacy favorites list
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Credentials issued by the sign-in flow of another host
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub access_token: Option<String>,
}

impl SessionSettings {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.user_id, &self.access_token) {
            (Some(user), Some(token)) if !user.is_empty() && !token.is_empty() => {
                Some((user.as_str(), token.as_str()))
            }
            _ => None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `nextsound.toml` in the
    /// working directory is used when present. `NEXTSOUND_` variables
    /// override both, with `__` between sections
    /// (`NEXTSOUND_CLIENT__TIMEOUT_MS=5000`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
        };

        settings = settings.add_source(
            config::Environment::with_prefix("NEXTSOUND")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.client.itunes_url)?;
        normalize_base_url(&self.client.deezer_url)?;
        if let Some(url) = &self.client.favorites_url {
            normalize_base_url(url)?;
        }

        if self.client.retry.attempts == 0 {
            return Err(CliError::Config(
                "client.retry.attempts must be at least 1".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.playback.volume) {
            return Err(CliError::Config(format!(
                "playback.volume must be between 0 and 100, got {}",
                self.playback.volume
            )));
        }

        if self.playback.tick_interval_ms == 0 {
            return Err(CliError::Config(
                "playback.tick_interval_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        data_dir: default_data_dir(),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("nextsound"))
        .unwrap_or_else(|| PathBuf::from(".nextsound"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            playback: PlaybackConfig::default(),
            storage: default_storage(),
            session: SessionSettings::default(),
        }
    }
}
