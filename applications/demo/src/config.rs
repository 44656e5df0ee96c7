/// Demo configuration
use crate::error::{DemoError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tuneline_playback::PlayerConfig;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tuneline.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DemoConfig {
    /// Media source handed to the backend
    #[serde(default = "default_src")]
    pub src: String,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub player: PlayerConfig,
}

/// Shape of the scripted session
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Duration the simulated backend reports once ready, in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,

    /// Gap between simulated position reports, in milliseconds
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,

    /// How long to play before seeking, in seconds
    #[serde(default = "default_play_secs")]
    pub play_secs: f64,

    /// Seek target as a percentage of the duration
    #[serde(default = "default_seek_percent")]
    pub seek_percent: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            frame_ms: default_frame_ms(),
            play_secs: default_play_secs(),
            seek_percent: default_seek_percent(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            src: default_src(),
            session: SessionSettings::default(),
            player: PlayerConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `tuneline.toml` in the
    /// working directory is used when present. Environment variables
    /// prefixed with `TUNELINE_` override both, with `__` separating
    /// nested keys (`TUNELINE_PLAYER__WAVE_HEIGHT=64`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TUNELINE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .map_err(|e| DemoError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DemoError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.player.validate()?;

        let session = &self.session;
        if !session.duration_secs.is_finite() || session.duration_secs <= 0.0 {
            return Err(DemoError::Config(format!(
                "session duration must be a positive number of seconds, got {}",
                session.duration_secs
            )));
        }

        if session.frame_ms == 0 {
            return Err(DemoError::Config(
                "session frame_ms must be at least 1".to_string(),
            ));
        }

        if !session.play_secs.is_finite() || session.play_secs < 0.0 {
            return Err(DemoError::Config(format!(
                "session play_secs must not be negative, got {}",
                session.play_secs
            )));
        }

        if !(0.0..=100.0).contains(&session.seek_percent) {
            return Err(DemoError::Config(format!(
                "session seek_percent must be within 0-100, got {}",
                session.seek_percent
            )));
        }

        Ok(())
    }
}

// Default values
fn default_src() -> String {
    "test.mp3".to_string()
}

fn default_duration_secs() -> f64 {
    185.0
}

fn default_frame_ms() -> u64 {
    16
}

fn default_play_secs() -> f64 {
    1.0
}

fn default_seek_percent() -> f64 {
    50.0
}
