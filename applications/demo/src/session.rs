//! Scripted playback session
//!
//! Drives a synchronizer through a full lifecycle against responsive
//! simulated backends: load, ready, play, position reports, seek, pause,
//! a backend switch, playback to the end, and teardown. Every emitted view
//! state is captured as a [`Frame`].

use crate::config::DemoConfig;
use crate::error::{DemoError, Result};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};
use tuneline_playback::events::{MediaEvent, WaveformEvent};
use tuneline_playback::simulated::{MediaHandle, SimulatedFactory, WaveformHandle};
use tuneline_playback::{DisplayMode, ManualClock, PlayerView, Synchronizer, ViewState};

/// Loading progress steps reported by the simulated waveform
const LOADING_STEPS: [u8; 5] = [0, 25, 50, 75, 100];

/// One emitted view state and what the host would render for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Session step that produced the emission
    pub step: &'static str,
    pub state: ViewState,
    pub view: PlayerView,
}

/// Test-side driver for whichever simulated backend is active
enum Driver {
    Waveform(WaveformHandle),
    Timeline(MediaHandle),
}

impl Driver {
    fn current(factory: &SimulatedFactory, mode: DisplayMode) -> Result<Self> {
        let driver = match mode {
            DisplayMode::Waveform => factory.last_waveform().map(|waveform| {
                let options = waveform.options();
                debug!(
                    container = %options.container,
                    height = options.height,
                    "Driving waveform renderer"
                );
                Driver::Waveform(waveform)
            }),
            DisplayMode::Timeline => factory.last_media_element().map(Driver::Timeline),
        };
        driver.ok_or_else(|| DemoError::Session(format!("no {mode} backend was created")))
    }

    fn load(&self) {
        // Media elements report no loading progress
        if let Driver::Waveform(waveform) = self {
            for percent in LOADING_STEPS {
                waveform.emit(WaveformEvent::Loading(percent));
            }
        }
    }

    fn ready(&self, duration: f64) {
        match self {
            Driver::Waveform(waveform) => waveform.emit(WaveformEvent::Ready { duration }),
            Driver::Timeline(element) => element.emit(MediaEvent::CanPlayThrough { duration }),
        }
    }

    fn advance(&self, current_time: f64) {
        match self {
            Driver::Waveform(waveform) => waveform.emit(WaveformEvent::AudioProcess(current_time)),
            Driver::Timeline(element) => element.emit(MediaEvent::TimeUpdate { current_time }),
        }
    }

    fn finish(&self) {
        match self {
            Driver::Waveform(waveform) => waveform.emit(WaveformEvent::Finish),
            Driver::Timeline(element) => element.emit(MediaEvent::Ended),
        }
    }
}

pub struct Session {
    config: DemoConfig,
}

impl Session {
    pub fn new(config: DemoConfig) -> Self {
        Self { config }
    }

    /// Run the scripted session and return every emitted frame in order
    pub fn run(&self) -> Result<Vec<Frame>> {
        let settings = &self.config.session;
        let frame_interval = Duration::from_millis(settings.frame_ms);

        let factory = Rc::new(SimulatedFactory::responsive());
        let clock = Rc::new(ManualClock::new());
        let frames: Rc<RefCell<Vec<Frame>>> = Rc::new(RefCell::new(Vec::new()));
        let step = Rc::new(Cell::new("create"));
        let player_config = Rc::new(RefCell::new(self.config.player.clone()));

        let on_change = {
            let frames = Rc::clone(&frames);
            let step = Rc::clone(&step);
            let player_config = Rc::clone(&player_config);
            move |state: &ViewState| {
                let view = PlayerView::render(&player_config.borrow(), state);
                debug!(
                    step = step.get(),
                    playing = state.playing,
                    position = state.position_percent,
                    "View state changed"
                );
                frames.borrow_mut().push(Frame {
                    step: step.get(),
                    state: state.clone(),
                    view,
                });
            }
        };

        let mut player = Synchronizer::with_options(
            self.config.src.as_str(),
            self.config.player.display,
            factory.clone(),
            self.config.player.sync_options(),
            clock.clone(),
            on_change,
        );

        if let Some(error) = player.state().error {
            return Err(DemoError::Session(format!("player is inert: {error}")));
        }

        info!(src = %self.config.src, mode = %player.mode(), "Session started");

        let mut driver = Driver::current(&factory, player.mode())?;

        step.set("load");
        driver.load();

        step.set("ready");
        driver.ready(settings.duration_secs);

        step.set("play");
        player.play();

        step.set("progress");
        let ticks = (settings.play_secs * 1000.0 / settings.frame_ms as f64).floor() as u64;
        for tick in 1..=ticks {
            clock.advance(frame_interval);
            driver.advance((tick * settings.frame_ms) as f64 / 1000.0);
        }

        step.set("seek");
        player.seek(settings.seek_percent);

        step.set("pause");
        player.pause();

        step.set("switch");
        let next_mode = match player.mode() {
            DisplayMode::Waveform => DisplayMode::Timeline,
            DisplayMode::Timeline => DisplayMode::Waveform,
        };
        player_config.borrow_mut().display = next_mode;
        player.set_mode(next_mode);
        info!(mode = %next_mode, "Switched backend");

        driver = Driver::current(&factory, next_mode)?;
        driver.load();
        driver.ready(settings.duration_secs);

        step.set("finish");
        player.play();
        clock.advance(frame_interval);
        driver.finish();

        step.set("destroy");
        player.destroy();

        let frames = frames.take();
        info!(frames = frames.len(), "Session finished");
        Ok(frames)
    }
}
