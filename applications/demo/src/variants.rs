//! Showcase player configurations

use serde::Serialize;
use tuneline_playback::{Dimension, DisplayMode, PlayerConfig, ViewState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub name: &'static str,
    pub config: PlayerConfig,
}

/// The player layouts the demo can show side by side
pub fn variants() -> Vec<Variant> {
    vec![
        Variant {
            name: "Inline Regular",
            config: PlayerConfig {
                id: "inline-timeline".to_string(),
                display: DisplayMode::Timeline,
                container_width: Dimension::Pixels(300),
                inline: true,
                ..PlayerConfig::default()
            },
        },
        Variant {
            name: "Inline Waveform",
            config: PlayerConfig {
                id: "inline".to_string(),
                container_width: Dimension::Pixels(350),
                inline: true,
                ..PlayerConfig::default()
            },
        },
        Variant {
            name: "Without Timestamps",
            config: PlayerConfig {
                id: "without-timestamp".to_string(),
                show_timestamps: false,
                container_width: Dimension::Pixels(350),
                inline: true,
                ..PlayerConfig::default()
            },
        },
        Variant {
            name: "Inline false, Paperize false",
            config: PlayerConfig {
                id: "regular".to_string(),
                container_width: Dimension::Pixels(300),
                paperize: false,
                ..PlayerConfig::default()
            },
        },
        Variant {
            name: "Customization",
            config: PlayerConfig {
                id: "custom".to_string(),
                inline: true,
                display: DisplayMode::Waveform,
                wave_color: Some("green".to_string()),
                container_width: Dimension::Pixels(400),
                ..PlayerConfig::default()
            },
        },
    ]
}

/// A loaded, paused state partway through a track, for previews
pub fn preview_state(duration_secs: f64, position_percent: f64) -> ViewState {
    let position_percent = position_percent.clamp(0.0, 100.0);
    ViewState {
        loading: false,
        load_progress: 100,
        playing: false,
        current_time: duration_secs * position_percent / 100.0,
        end_time: duration_secs,
        position_percent,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_is_valid() {
        for variant in variants() {
            assert!(variant.config.validate().is_ok(), "{}", variant.name);
        }
    }

    #[test]
    fn variant_ids_are_unique() {
        let mut ids: Vec<String> = variants().into_iter().map(|v| v.config.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), variants().len());
    }

    #[test]
    fn customization_overrides_wave_color_only() {
        let custom = variants()
            .into_iter()
            .find(|v| v.name == "Customization")
            .unwrap();
        let options = custom.config.waveform_options();
        assert_eq!(options.wave_color, "green");
        assert_eq!(options.progress_color, tuneline_playback::config::DEFAULT_PROGRESS_COLOR);
    }

    #[test]
    fn preview_state_clamps_position() {
        let state = preview_state(200.0, 150.0);
        assert_eq!(state.position_percent, 100.0);
        assert_eq!(state.current_time, 200.0);
    }
}
