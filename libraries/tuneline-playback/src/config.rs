//! Player configuration
//!
//! `PlayerConfig` carries everything a host passes to an audio player:
//! appearance (colors, height, layout, framing) and behavior (display mode,
//! timestamps, throttle interval). It deserializes with per-field defaults
//! so partial TOML/JSON documents are valid.

use crate::error::{PlayerError, Result};
use crate::throttle::DEFAULT_THROTTLE_INTERVAL;
use crate::types::DisplayMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Wave color used when none is configured
pub const DEFAULT_WAVE_COLOR: &str = "#42a5f5";

/// Progress color used when none is configured
pub const DEFAULT_PROGRESS_COLOR: &str = "#1976d2";

/// A CSS length: plain pixels or any CSS value such as `auto` or `100%`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(u32),
    Css(String),
}

impl Dimension {
    pub fn auto() -> Self {
        Dimension::Css("auto".to_string())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(px) => write!(f, "{px}px"),
            Dimension::Css(value) => f.write_str(value),
        }
    }
}

/// Size of the play/pause control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlSize {
    #[default]
    Small,
    Medium,
    Large,
}

/// Audio player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Element id of the waveform container
    #[serde(default = "default_id")]
    pub id: String,

    /// Backend selection
    #[serde(default)]
    pub display: DisplayMode,

    /// Lay controls out in a single row
    #[serde(default)]
    pub inline: bool,

    /// Frame the player in a paper surface
    #[serde(default = "default_true")]
    pub paperize: bool,

    /// Waveform color (theme light primary when unset)
    #[serde(default)]
    pub wave_color: Option<String>,

    /// Played-portion color (theme main primary when unset)
    #[serde(default)]
    pub progress_color: Option<String>,

    /// Waveform height in pixels
    #[serde(default = "default_wave_height")]
    pub wave_height: u32,

    /// Show elapsed and total time
    #[serde(default = "default_true")]
    pub show_timestamps: bool,

    #[serde(default = "default_container_width")]
    pub container_width: Dimension,

    #[serde(default = "Dimension::auto")]
    pub container_height: Dimension,

    #[serde(default)]
    pub size: ControlSize,

    /// Minimum interval between position updates in milliseconds
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// Waveform renderer plugins, in registration order
    #[serde(default)]
    pub plugins: Vec<String>,
}

fn default_id() -> String {
    "waveform".to_string()
}

fn default_true() -> bool {
    true
}

fn default_wave_height() -> u32 {
    48
}

fn default_container_width() -> Dimension {
    Dimension::Pixels(250)
}

fn default_throttle_ms() -> u64 {
    DEFAULT_THROTTLE_INTERVAL.as_millis() as u64
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            id: default_id(),
            display: DisplayMode::default(),
            inline: false,
            paperize: true,
            wave_color: None,
            progress_color: None,
            wave_height: default_wave_height(),
            show_timestamps: true,
            container_width: default_container_width(),
            container_height: Dimension::auto(),
            size: ControlSize::default(),
            throttle_ms: default_throttle_ms(),
            plugins: Vec::new(),
        }
    }
}

impl PlayerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(PlayerError::Config("id must not be empty".to_string()));
        }

        if self.wave_height == 0 {
            return Err(PlayerError::Config(
                "wave_height must be greater than 0".to_string(),
            ));
        }

        for (name, color) in [
            ("wave_color", &self.wave_color),
            ("progress_color", &self.progress_color),
        ] {
            if matches!(color, Some(c) if c.trim().is_empty()) {
                return Err(PlayerError::Config(format!("{name} must not be blank")));
            }
        }

        if let Some(plugin) = self.plugins.iter().find(|p| p.trim().is_empty()) {
            return Err(PlayerError::Config(format!(
                "plugin names must not be blank (got {plugin:?})"
            )));
        }

        Ok(())
    }

    /// Options handed to the waveform backend factory
    pub fn waveform_options(&self) -> WaveformOptions {
        WaveformOptions {
            container: self.id.clone(),
            wave_color: self
                .wave_color
                .clone()
                .unwrap_or_else(|| DEFAULT_WAVE_COLOR.to_string()),
            progress_color: self
                .progress_color
                .clone()
                .unwrap_or_else(|| DEFAULT_PROGRESS_COLOR.to_string()),
            height: self.wave_height,
            plugins: self.plugins.clone(),
            ..WaveformOptions::default()
        }
    }

    /// Options for the playback synchronizer
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            throttle_interval: Duration::from_millis(self.throttle_ms),
            waveform: self.waveform_options(),
        }
    }
}

/// Construction options for a waveform renderer
///
/// Serializes with the renderer's own camelCase option names so a host can
/// pass the object straight to its constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveformOptions {
    /// Container element id
    pub container: String,
    pub wave_color: String,
    pub progress_color: String,
    /// Height in pixels
    pub height: u32,
    pub fill_parent: bool,
    pub media_controls: bool,
    pub hide_scrollbar: bool,
    /// Plugins registered on the renderer
    pub plugins: Vec<String>,
}

impl Default for WaveformOptions {
    fn default() -> Self {
        Self {
            container: default_id(),
            wave_color: DEFAULT_WAVE_COLOR.to_string(),
            progress_color: DEFAULT_PROGRESS_COLOR.to_string(),
            height: default_wave_height(),
            fill_parent: true,
            media_controls: true,
            hide_scrollbar: false,
            plugins: Vec::new(),
        }
    }
}

/// Synchronizer options
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    /// Minimum interval between position emissions
    pub throttle_interval: Duration,

    /// Options for waveform backends
    pub waveform: WaveformOptions,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
            waveform: WaveformOptions::default(),
        }
    }
}
