//! Core types for playback synchronization

use crate::error::PlayerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which backend drives playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Waveform renderer with its own playback engine
    #[default]
    Waveform,

    /// Native media element with a timeline slider
    Timeline,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Waveform => "waveform",
            DisplayMode::Timeline => "timeline",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waveform" => Ok(DisplayMode::Waveform),
            "timeline" => Ok(DisplayMode::Timeline),
            other => Err(PlayerError::InvalidOperation(format!(
                "unknown display mode '{other}'"
            ))),
        }
    }
}

/// Why playback stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Paused by the user or the platform
    Paused,

    /// Reached the end of the media
    Finished,

    /// Backend instance was destroyed
    Destroyed,
}

/// Snapshot rendered by the presentation layer
///
/// Mutated only by backend events; intents never write to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// True until the active backend signals readiness
    pub loading: bool,

    /// Buffering/decoding progress while loading (0-100)
    pub load_progress: u8,

    /// True between a play-start and the next stop or error
    pub playing: bool,

    /// Last reported playback position in seconds
    pub current_time: f64,

    /// Media duration in seconds (0 until known)
    pub end_time: f64,

    /// `current_time / end_time * 100`, clamped to 0-100
    pub position_percent: f64,

    /// Last source or backend error, cleared when the source changes
    pub error: Option<PlayerError>,
}

impl ViewState {
    /// State for a freshly attached backend
    pub fn fresh() -> Self {
        Self {
            loading: true,
            load_progress: 0,
            playing: false,
            current_time: 0.0,
            end_time: 0.0,
            position_percent: 0.0,
            error: None,
        }
    }

    /// Terminal state for a synchronizer with no usable backend
    pub fn inert(error: PlayerError) -> Self {
        Self {
            loading: false,
            error: Some(error),
            ..Self::fresh()
        }
    }

    /// Whether the duration is known
    pub fn has_duration(&self) -> bool {
        self.end_time > 0.0
    }

    /// True for the settled state of a synchronizer that never got a backend
    ///
    /// Only [`ViewState::inert`] leaves loading without passing through ready,
    /// which always sets `load_progress` to 100.
    pub fn is_inert(&self) -> bool {
        self.error.is_some() && !self.loading && self.load_progress == 0
    }

    /// Time left until the end of the media
    pub fn remaining_time(&self) -> f64 {
        (self.end_time - self.current_time).max(0.0)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::fresh()
    }
}
