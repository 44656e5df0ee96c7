//! Backend events
//!
//! Each backend speaks its own vocabulary:
//! - Waveform renderers emit `loading`, `ready`, `play`, `audioprocess`,
//!   `seek`, `finish`, `pause`, `destroy` and `error`
//! - Media elements emit `canplaythrough`, `playing`, `pause`, `ended`,
//!   `timeupdate`, `seeked` and `error`
//!
//! Both are normalized into [`BackendEvent`] before they reach the
//! transition table.

use crate::types::StopReason;
use serde::{Deserialize, Serialize};

/// Events a waveform renderer can be subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveformEventKind {
    Loading,
    Ready,
    Play,
    AudioProcess,
    Seek,
    Finish,
    Pause,
    Destroy,
    Error,
}

impl WaveformEventKind {
    /// Every kind the synchronizer subscribes to
    pub const ALL: [WaveformEventKind; 9] = [
        WaveformEventKind::Loading,
        WaveformEventKind::Ready,
        WaveformEventKind::Play,
        WaveformEventKind::AudioProcess,
        WaveformEventKind::Seek,
        WaveformEventKind::Finish,
        WaveformEventKind::Pause,
        WaveformEventKind::Destroy,
        WaveformEventKind::Error,
    ];

    /// Event name as used by the renderer
    pub fn as_str(&self) -> &'static str {
        match self {
            WaveformEventKind::Loading => "loading",
            WaveformEventKind::Ready => "ready",
            WaveformEventKind::Play => "play",
            WaveformEventKind::AudioProcess => "audioprocess",
            WaveformEventKind::Seek => "seek",
            WaveformEventKind::Finish => "finish",
            WaveformEventKind::Pause => "pause",
            WaveformEventKind::Destroy => "destroy",
            WaveformEventKind::Error => "error",
        }
    }
}

/// Event emitted by a waveform renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WaveformEvent {
    /// Loading progress (0-100)
    Loading(u8),

    /// Waveform decoded and rendered
    Ready {
        /// Decoded duration in seconds
        duration: f64,
    },

    /// Playback started
    Play,

    /// Playback position advanced (seconds)
    AudioProcess(f64),

    /// User or API seek landed
    Seek {
        /// Position after the seek in seconds
        current_time: f64,
    },

    /// Reached the end of the media
    Finish,

    /// Playback paused
    Pause,

    /// Renderer destroyed
    Destroy,

    /// Load or playback failure
    Error(String),
}

impl WaveformEvent {
    /// Build an event from a host renderer callback
    ///
    /// `number` and `message` are the callback's first argument when it is a
    /// number or a string. `current_time` and `duration` are read from the
    /// renderer when the callback fires and fill in missing payloads.
    pub fn from_host(
        kind: WaveformEventKind,
        number: Option<f64>,
        message: Option<String>,
        current_time: f64,
        duration: f64,
    ) -> Self {
        let number = number.filter(|n| n.is_finite());
        match kind {
            WaveformEventKind::Loading => {
                WaveformEvent::Loading(number.unwrap_or(0.0).clamp(0.0, 100.0).round() as u8)
            }
            WaveformEventKind::Ready => WaveformEvent::Ready {
                duration: number.unwrap_or(duration),
            },
            WaveformEventKind::Play => WaveformEvent::Play,
            WaveformEventKind::AudioProcess => {
                WaveformEvent::AudioProcess(number.unwrap_or(current_time))
            }
            WaveformEventKind::Seek => WaveformEvent::Seek { current_time },
            WaveformEventKind::Finish => WaveformEvent::Finish,
            WaveformEventKind::Pause => WaveformEvent::Pause,
            WaveformEventKind::Destroy => WaveformEvent::Destroy,
            WaveformEventKind::Error => WaveformEvent::Error(
                message.unwrap_or_else(|| "waveform renderer error".to_string()),
            ),
        }
    }

    pub fn kind(&self) -> WaveformEventKind {
        match self {
            WaveformEvent::Loading(_) => WaveformEventKind::Loading,
            WaveformEvent::Ready { .. } => WaveformEventKind::Ready,
            WaveformEvent::Play => WaveformEventKind::Play,
            WaveformEvent::AudioProcess(_) => WaveformEventKind::AudioProcess,
            WaveformEvent::Seek { .. } => WaveformEventKind::Seek,
            WaveformEvent::Finish => WaveformEventKind::Finish,
            WaveformEvent::Pause => WaveformEventKind::Pause,
            WaveformEvent::Destroy => WaveformEventKind::Destroy,
            WaveformEvent::Error(_) => WaveformEventKind::Error,
        }
    }
}

/// Events a media element can be subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaEventKind {
    CanPlayThrough,
    Playing,
    Pause,
    Ended,
    TimeUpdate,
    Seeked,
    Error,
}

impl MediaEventKind {
    /// Every kind the synchronizer subscribes to
    pub const ALL: [MediaEventKind; 7] = [
        MediaEventKind::CanPlayThrough,
        MediaEventKind::Playing,
        MediaEventKind::Pause,
        MediaEventKind::Ended,
        MediaEventKind::TimeUpdate,
        MediaEventKind::Seeked,
        MediaEventKind::Error,
    ];

    /// DOM event type
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaEventKind::CanPlayThrough => "canplaythrough",
            MediaEventKind::Playing => "playing",
            MediaEventKind::Pause => "pause",
            MediaEventKind::Ended => "ended",
            MediaEventKind::TimeUpdate => "timeupdate",
            MediaEventKind::Seeked => "seeked",
            MediaEventKind::Error => "error",
        }
    }
}

/// Event emitted by a media element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Enough data buffered to play to the end
    CanPlayThrough {
        /// Value of the element's `duration` property
        duration: f64,
    },

    /// Playback actually started
    Playing,

    /// Playback paused
    Pause,

    /// Reached the end of the media
    Ended,

    /// `currentTime` changed during playback
    TimeUpdate {
        current_time: f64,
    },

    /// Seek operation completed
    Seeked {
        current_time: f64,
    },

    /// Network or decode failure
    Error(String),
}

impl MediaEvent {
    pub fn kind(&self) -> MediaEventKind {
        match self {
            MediaEvent::CanPlayThrough { .. } => MediaEventKind::CanPlayThrough,
            MediaEvent::Playing => MediaEventKind::Playing,
            MediaEvent::Pause => MediaEventKind::Pause,
            MediaEvent::Ended => MediaEventKind::Ended,
            MediaEvent::TimeUpdate { .. } => MediaEventKind::TimeUpdate,
            MediaEvent::Seeked { .. } => MediaEventKind::Seeked,
            MediaEvent::Error(_) => MediaEventKind::Error,
        }
    }
}

/// Backend-neutral event consumed by the transition table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackendEvent {
    /// Buffering/decoding progress (0-100)
    LoadingProgress(u8),

    /// Backend is ready to play
    Ready {
        /// Media duration in seconds
        duration: f64,
    },

    /// Playback started
    PlayStarted,

    /// Playback stopped
    PlayStopped(StopReason),

    /// Playback position advanced (high frequency)
    TimeAdvanced(f64),

    /// Seek landed at the given position
    SeekCompleted(f64),

    /// Backend failure
    Error(String),
}

impl From<WaveformEvent> for BackendEvent {
    fn from(event: WaveformEvent) -> Self {
        match event {
            WaveformEvent::Loading(n) => BackendEvent::LoadingProgress(n),
            WaveformEvent::Ready { duration } => BackendEvent::Ready { duration },
            WaveformEvent::Play => BackendEvent::PlayStarted,
            WaveformEvent::AudioProcess(t) => BackendEvent::TimeAdvanced(t),
            WaveformEvent::Seek { current_time } => BackendEvent::SeekCompleted(current_time),
            WaveformEvent::Finish => BackendEvent::PlayStopped(StopReason::Finished),
            WaveformEvent::Pause => BackendEvent::PlayStopped(StopReason::Paused),
            WaveformEvent::Destroy => BackendEvent::PlayStopped(StopReason::Destroyed),
            WaveformEvent::Error(message) => BackendEvent::Error(message),
        }
    }
}

impl From<MediaEvent> for BackendEvent {
    fn from(event: MediaEvent) -> Self {
        match event {
            MediaEvent::CanPlayThrough { duration } => BackendEvent::Ready { duration },
            MediaEvent::Playing => BackendEvent::PlayStarted,
            MediaEvent::Pause => BackendEvent::PlayStopped(StopReason::Paused),
            MediaEvent::Ended => BackendEvent::PlayStopped(StopReason::Finished),
            MediaEvent::TimeUpdate { current_time } => BackendEvent::TimeAdvanced(current_time),
            MediaEvent::Seeked { current_time } => BackendEvent::SeekCompleted(current_time),
            MediaEvent::Error(message) => BackendEvent::Error(message),
        }
    }
}
