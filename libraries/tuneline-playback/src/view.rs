//! Presentation model
//!
//! Derives what an audio player shows from its configuration and the
//! current [`ViewState`]. UI toolkits render a [`PlayerView`]; they never
//! inspect backends directly.

use crate::config::{ControlSize, Dimension, PlayerConfig};
use crate::timestamp::timestamp_label;
use crate::types::{DisplayMode, ViewState};
use serde::{Deserialize, Serialize};

/// Main axis of the player container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Row,
    Column,
}

/// Glyph on the play/pause button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonIcon {
    Play,
    Pause,
}

/// Where the play/pause button sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonPlacement {
    /// Before the track, on the same row
    Leading,
    /// Centered below the track
    Below,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayButton {
    pub enabled: bool,
    pub icon: ButtonIcon,
    pub placement: ButtonPlacement,
    pub size: ControlSize,
}

/// The element between the two timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Track {
    /// Waveform surface, rendered by the waveform backend into `container`
    Waveform { container: String, height: u32 },

    /// Seek slider at `position` percent
    Slider { position: f64 },

    /// Nothing yet (timeline still loading)
    Empty,
}

/// Everything a player renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub direction: Direction,
    /// Wrap the player in a paper surface
    pub framed: bool,
    pub width: Dimension,
    pub height: Dimension,
    pub play_button: PlayButton,
    /// Determinate load progress, shown only while loading
    pub progress_bar: Option<u8>,
    /// Track grows to fill the row once loaded
    pub track_grows: bool,
    pub track: Track,
    pub elapsed: Option<String>,
    pub total: Option<String>,
    /// Time left until the end
    pub remaining: Option<String>,
    /// Error message for the host to surface
    pub error: Option<String>,
}

impl PlayerView {
    pub fn render(config: &PlayerConfig, state: &ViewState) -> Self {
        let track = match config.display {
            DisplayMode::Waveform => Track::Waveform {
                container: config.id.clone(),
                height: config.wave_height,
            },
            DisplayMode::Timeline if state.loading => Track::Empty,
            DisplayMode::Timeline => Track::Slider {
                position: state.position_percent,
            },
        };

        Self {
            direction: if config.inline {
                Direction::Row
            } else {
                Direction::Column
            },
            framed: config.paperize,
            width: config.container_width.clone(),
            height: config.container_height.clone(),
            play_button: PlayButton {
                enabled: !state.loading && !state.is_inert(),
                icon: if state.playing {
                    ButtonIcon::Pause
                } else {
                    ButtonIcon::Play
                },
                placement: if config.inline {
                    ButtonPlacement::Leading
                } else {
                    ButtonPlacement::Below
                },
                size: config.size,
            },
            progress_bar: state.loading.then_some(state.load_progress),
            track_grows: !state.loading,
            track,
            elapsed: timestamp_label(state.current_time, state.loading, config.show_timestamps),
            total: timestamp_label(state.end_time, state.loading, config.show_timestamps),
            remaining: timestamp_label(
                state.remaining_time(),
                state.loading,
                config.show_timestamps,
            ),
            error: state.error.as_ref().map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlayerError;

    fn loaded(end_time: f64, current_time: f64, playing: bool) -> ViewState {
        ViewState {
            loading: false,
            load_progress: 100,
            playing,
            current_time,
            end_time,
            position_percent: current_time / end_time * 100.0,
            error: None,
        }
    }

    #[test]
    fn loading_waveform_player() {
        let state = ViewState {
            load_progress: 40,
            ..ViewState::fresh()
        };
        let view = PlayerView::render(&PlayerConfig::default(), &state);

        assert_eq!(view.direction, Direction::Column);
        assert!(view.framed);
        assert!(!view.play_button.enabled);
        assert_eq!(view.play_button.placement, ButtonPlacement::Below);
        assert_eq!(view.progress_bar, Some(40));
        assert!(!view.track_grows);
        assert_eq!(view.elapsed.as_deref(), Some("00:00"));
        assert_eq!(view.total.as_deref(), Some("00:00"));
        assert_eq!(
            view.track,
            Track::Waveform {
                container: "waveform".to_string(),
                height: 48
            }
        );
    }

    #[test]
    fn inline_timeline_player_while_playing() {
        let config = PlayerConfig {
            id: "inline-timeline".to_string(),
            display: DisplayMode::Timeline,
            inline: true,
            container_width: Dimension::Pixels(300),
            ..PlayerConfig::default()
        };
        let view = PlayerView::render(&config, &loaded(120.0, 30.0, true));

        assert_eq!(view.direction, Direction::Row);
        assert_eq!(view.play_button.placement, ButtonPlacement::Leading);
        assert_eq!(view.play_button.icon, ButtonIcon::Pause);
        assert!(view.play_button.enabled);
        assert_eq!(view.progress_bar, None);
        assert_eq!(view.track, Track::Slider { position: 25.0 });
        assert_eq!(view.elapsed.as_deref(), Some("00:30"));
        assert_eq!(view.total.as_deref(), Some("02:00"));
        assert_eq!(view.remaining.as_deref(), Some("01:30"));
        assert_eq!(view.width.to_string(), "300px");
    }

    #[test]
    fn timeline_slider_hidden_while_loading() {
        let config = PlayerConfig {
            display: DisplayMode::Timeline,
            ..PlayerConfig::default()
        };
        let view = PlayerView::render(&config, &ViewState::fresh());
        assert_eq!(view.track, Track::Empty);
    }

    #[test]
    fn timestamps_can_be_hidden() {
        let config = PlayerConfig {
            show_timestamps: false,
            paperize: false,
            ..PlayerConfig::default()
        };
        let view = PlayerView::render(&config, &loaded(60.0, 10.0, false));
        assert_eq!(view.elapsed, None);
        assert_eq!(view.total, None);
        assert_eq!(view.remaining, None);
        assert!(!view.framed);
        assert_eq!(view.play_button.icon, ButtonIcon::Play);
    }

    #[test]
    fn errors_are_surfaced_as_text() {
        let view = PlayerView::render(
            &PlayerConfig::default(),
            &ViewState::inert(PlayerError::EmptySource),
        );
        assert_eq!(view.error.as_deref(), Some("Media source is empty"));
        assert!(!view.play_button.enabled);

        let failed = ViewState {
            error: Some(PlayerError::Backend("decode".to_string())),
            ..loaded(60.0, 0.0, false)
        };
        let view = PlayerView::render(&PlayerConfig::default(), &failed);
        assert_eq!(view.error.as_deref(), Some("Backend error: decode"));
        assert!(view.play_button.enabled);
    }

    #[test]
    fn button_disabled_when_backend_could_not_be_created() {
        let state = ViewState::inert(PlayerError::Backend("no renderer".to_string()));
        let view = PlayerView::render(&PlayerConfig::default(), &state);

        assert!(!view.play_button.enabled);
        assert_eq!(view.error.as_deref(), Some("Backend error: no renderer"));
    }

    #[test]
    fn remaining_time_counts_down() {
        let view = PlayerView::render(&PlayerConfig::default(), &loaded(185.0, 65.0, true));
        assert_eq!(view.remaining.as_deref(), Some("02:00"));

        let view = PlayerView::render(&PlayerConfig::default(), &ViewState::fresh());
        assert_eq!(view.remaining.as_deref(), Some("00:00"));
    }
}
