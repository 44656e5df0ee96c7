//! Text rendering of a [`PlayerView`]

use tuneline_playback::view::{ButtonIcon, Direction, Track};
use tuneline_playback::{PlayerView, ViewState};

/// Width of the drawn track in characters
pub const TRACK_WIDTH: usize = 24;

/// Render one view as terminal text
///
/// Row layouts fit on one line; column layouts put the track above the
/// controls. Framed views get a left border.
pub fn render(view: &PlayerView, state: &ViewState) -> String {
    let button = button(view);
    let track = match view.progress_bar {
        Some(percent) => format!("{:<width$}", format!("loading {percent}%"), width = TRACK_WIDTH),
        None => track(&view.track, state.position_percent),
    };

    let mut lines = match view.direction {
        Direction::Row => vec![join(&[
            Some(button),
            view.elapsed.clone(),
            Some(track),
            view.total.clone(),
        ])],
        Direction::Column => {
            let times = match (&view.elapsed, &view.total) {
                (Some(elapsed), Some(total)) => Some(format!("{elapsed} / {total}")),
                _ => None,
            };
            vec![track, join(&[Some(button), times])]
        }
    };

    if let Some(error) = &view.error {
        lines.push(format!("! {error}"));
    }

    if view.framed {
        lines = lines.into_iter().map(|line| format!("| {line}")).collect();
    }

    lines.join("\n")
}

fn button(view: &PlayerView) -> String {
    if !view.play_button.enabled {
        return "[ ]".to_string();
    }
    match view.play_button.icon {
        ButtonIcon::Play => "[>]".to_string(),
        ButtonIcon::Pause => "[=]".to_string(),
    }
}

fn track(track: &Track, position_percent: f64) -> String {
    let played = ((position_percent.clamp(0.0, 100.0) / 100.0) * TRACK_WIDTH as f64).round() as usize;
    match track {
        Track::Waveform { .. } => format!(
            "{}{}",
            "#".repeat(played),
            "~".repeat(TRACK_WIDTH - played)
        ),
        Track::Slider { position } => {
            let knob = ((position.clamp(0.0, 100.0) / 100.0) * (TRACK_WIDTH - 1) as f64).round() as usize;
            format!("{}o{}", "=".repeat(knob), "-".repeat(TRACK_WIDTH - 1 - knob))
        }
        Track::Empty => " ".repeat(TRACK_WIDTH),
    }
}

fn join(parts: &[Option<String>]) -> String {
    parts.iter().flatten().cloned().collect::<Vec<_>>().join(" ")
}
