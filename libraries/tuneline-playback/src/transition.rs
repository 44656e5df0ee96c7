//! Transition table
//!
//! Pure mapping from `(ViewState, BackendEvent)` to the next state and how
//! urgently it must reach the consumer. The synchronizer owns the clock and
//! the throttle; this module owns the rules.

use crate::error::PlayerError;
use crate::events::BackendEvent;
use crate::types::ViewState;

/// How a transition should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Report right away
    Immediate,

    /// Report subject to the position throttle
    Throttled,

    /// Nothing visible changed
    Suppressed,
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ViewState,
    pub emission: Emission,
}

impl Transition {
    fn unchanged(state: &ViewState) -> Self {
        Self {
            state: state.clone(),
            emission: Emission::Suppressed,
        }
    }

    fn changed(previous: &ViewState, state: ViewState, emission: Emission) -> Self {
        if &state == previous {
            return Self {
                state,
                emission: Emission::Suppressed,
            };
        }
        Self { state, emission }
    }
}

/// Apply a backend event to the current state
pub fn apply(state: &ViewState, event: &BackendEvent) -> Transition {
    match event {
        BackendEvent::LoadingProgress(progress) => {
            // Readiness is final for a backend instance
            if !state.loading {
                return Transition::unchanged(state);
            }
            let next = ViewState {
                load_progress: (*progress).min(100),
                ..state.clone()
            };
            Transition::changed(state, next, Emission::Immediate)
        }

        BackendEvent::Ready { duration } => {
            let end_time = sanitize_duration(*duration);
            let current_time = clamp_time(state.current_time, end_time);
            let next = ViewState {
                loading: false,
                load_progress: 100,
                end_time,
                current_time,
                position_percent: position_percent(current_time, end_time),
                ..state.clone()
            };
            Transition::changed(state, next, Emission::Immediate)
        }

        BackendEvent::PlayStarted => {
            if state.loading {
                return Transition::unchanged(state);
            }
            let next = ViewState {
                playing: true,
                ..state.clone()
            };
            Transition::changed(state, next, Emission::Immediate)
        }

        BackendEvent::PlayStopped(_) => {
            let next = ViewState {
                playing: false,
                ..state.clone()
            };
            Transition::changed(state, next, Emission::Immediate)
        }

        BackendEvent::TimeAdvanced(time) => move_to(state, *time, Emission::Throttled),

        BackendEvent::SeekCompleted(time) => move_to(state, *time, Emission::Immediate),

        BackendEvent::Error(message) => Transition {
            state: ViewState {
                playing: false,
                error: Some(PlayerError::Backend(message.clone())),
                ..state.clone()
            },
            emission: Emission::Immediate,
        },
    }
}

fn move_to(state: &ViewState, time: f64, emission: Emission) -> Transition {
    if !time.is_finite() {
        return Transition::unchanged(state);
    }
    let current_time = clamp_time(time, state.end_time);
    let next = ViewState {
        current_time,
        position_percent: position_percent(current_time, state.end_time),
        ..state.clone()
    };
    Transition::changed(state, next, emission)
}

/// Unknown, infinite (live streams) and negative durations read as 0
pub fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

/// Clamp a position into `[0, end_time]`, or `[0, inf)` while the duration is unknown
pub fn clamp_time(time: f64, end_time: f64) -> f64 {
    let time = time.max(0.0);
    if end_time > 0.0 {
        time.min(end_time)
    } else {
        time
    }
}

/// Slider position for a playback time
pub fn position_percent(current_time: f64, end_time: f64) -> f64 {
    if end_time > 0.0 {
        (current_time / end_time * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}
