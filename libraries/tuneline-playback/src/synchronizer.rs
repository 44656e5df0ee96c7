//! Playback state synchronizer
//!
//! Keeps a [`ViewState`] consistent with whichever backend is active and
//! forwards play/pause/seek intents to it. Intents never touch the state:
//! it changes only when the backend reports back, so the view always shows
//! what the backend actually did (a rejected autoplay stays "not playing").
//!
//! Listeners registered on a backend carry the generation they belong to.
//! Tearing a backend down bumps the generation before anything else, so a
//! late event from a detached backend can never reach the new state.

use crate::backend::{BackendFactory, BackendHandle, EventSink};
use crate::config::SyncOptions;
use crate::error::PlayerError;
use crate::events::BackendEvent;
use crate::throttle::{Clock, SystemClock, Throttle};
use crate::transition::{self, Emission, Transition};
use crate::types::{DisplayMode, ViewState};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Callback receiving every emitted [`ViewState`]
pub type ChangeCallback = Rc<dyn Fn(&ViewState)>;

/// State shared with backend listeners
struct Core {
    state: ViewState,
    generation: u64,
    throttle: Throttle,
}

impl Core {
    /// Apply an event and return the snapshot to emit, if any
    fn apply(&mut self, event: &BackendEvent, now: Duration) -> Option<ViewState> {
        if let BackendEvent::Error(message) = event {
            error!("Playback backend error: {}", message);
        }

        let Transition { state, emission } = transition::apply(&self.state, event);
        self.state = state;

        match emission {
            Emission::Immediate => Some(self.state.clone()),
            Emission::Throttled if self.throttle.ready(now) => Some(self.state.clone()),
            Emission::Throttled | Emission::Suppressed => None,
        }
    }
}

/// Playback state synchronizer
///
/// Owns exactly one backend at a time. Single-threaded: backends call the
/// registered listeners on the same thread that drives the synchronizer.
pub struct Synchronizer {
    core: Rc<RefCell<Core>>,
    backend: Option<BackendHandle>,
    factory: Rc<dyn BackendFactory>,
    options: SyncOptions,
    clock: Rc<dyn Clock>,
    on_change: ChangeCallback,
    src: String,
    mode: DisplayMode,
    destroyed: bool,
}

impl Synchronizer {
    /// Create a synchronizer with default options and the system clock
    pub fn create(
        src: impl Into<String>,
        mode: DisplayMode,
        factory: Rc<dyn BackendFactory>,
        on_change: impl Fn(&ViewState) + 'static,
    ) -> Self {
        Self::with_options(
            src,
            mode,
            factory,
            SyncOptions::default(),
            Rc::new(SystemClock::new()),
            on_change,
        )
    }

    /// Create a synchronizer
    ///
    /// An empty `src` or a backend that cannot be constructed yields an inert
    /// synchronizer whose state carries the error; this is reported once
    /// through `on_change`.
    pub fn with_options(
        src: impl Into<String>,
        mode: DisplayMode,
        factory: Rc<dyn BackendFactory>,
        options: SyncOptions,
        clock: Rc<dyn Clock>,
        on_change: impl Fn(&ViewState) + 'static,
    ) -> Self {
        let core = Core {
            state: ViewState::fresh(),
            generation: 0,
            throttle: Throttle::new(options.throttle_interval),
        };

        let mut synchronizer = Self {
            core: Rc::new(RefCell::new(core)),
            backend: None,
            factory,
            options,
            clock,
            on_change: Rc::new(on_change),
            src: src.into(),
            mode,
            destroyed: false,
        };
        synchronizer.attach(false);
        synchronizer
    }

    /// Current view state
    pub fn state(&self) -> ViewState {
        self.core.borrow().state.clone()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn source(&self) -> &str {
        &self.src
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// True when no backend is attached because of a source or backend error
    pub fn is_inert(&self) -> bool {
        !self.destroyed && self.backend.is_none()
    }

    /// Ask the backend to start playback
    ///
    /// Ignored while loading. `playing` only turns true once the backend
    /// confirms.
    pub fn play(&mut self) {
        if self.core.borrow().state.loading {
            debug!("Ignoring play while {} is loading", self.src);
            return;
        }
        match self.backend.as_mut() {
            Some(backend) => backend.play(),
            None => debug!("Ignoring play: no backend attached"),
        }
    }

    /// Ask the backend to pause
    pub fn pause(&mut self) {
        match self.backend.as_mut() {
            Some(backend) => backend.pause(),
            None => debug!("Ignoring pause: no backend attached"),
        }
    }

    /// Pause when playing, play otherwise
    pub fn toggle(&mut self) {
        if self.core.borrow().state.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek to `percent` of the duration
    ///
    /// Ignored until the duration is known. Out-of-range values are clamped
    /// to 0-100.
    pub fn seek(&mut self, percent: f64) {
        if percent.is_nan() {
            debug!("Ignoring seek to NaN");
            return;
        }

        let (has_duration, end_time) = {
            let core = self.core.borrow();
            (core.state.has_duration(), core.state.end_time)
        };
        if !has_duration {
            debug!("Ignoring seek before duration of {} is known", self.src);
            return;
        }

        let percent = percent.clamp(0.0, 100.0);
        match self.backend.as_mut() {
            Some(backend) => backend.seek(percent, end_time),
            None => debug!("Ignoring seek: no backend attached"),
        }
    }

    /// Detach all listeners and release the backend
    ///
    /// Idempotent. Emits nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.detach();
        self.core.borrow_mut().state.playing = false;
        debug!("Destroyed synchronizer for {}", self.src);
    }

    /// Replace the source and/or backend
    ///
    /// The old backend is fully detached before the new one is created, and
    /// exactly one state for the new source is emitted.
    pub fn set_source(&mut self, src: impl Into<String>, mode: DisplayMode) {
        self.detach();
        self.destroyed = false;
        self.src = src.into();
        self.mode = mode;
        self.attach(true);
    }

    /// Switch backend, keeping the source
    pub fn set_mode(&mut self, mode: DisplayMode) {
        if mode == self.mode && self.backend.is_some() {
            return;
        }
        let src = self.src.clone();
        self.set_source(src, mode);
    }

    fn attach(&mut self, announce: bool) {
        let generation = {
            let mut core = self.core.borrow_mut();
            core.generation += 1;
            core.state = ViewState::fresh();
            core.throttle.reset();
            core.generation
        };

        if self.src.trim().is_empty() {
            warn!("Empty media source; {} player stays inert", self.mode);
            self.fail(PlayerError::EmptySource);
            return;
        }

        let sink = Self::event_sink(
            Rc::downgrade(&self.core),
            generation,
            Rc::clone(&self.clock),
            Rc::clone(&self.on_change),
        );

        match BackendHandle::connect(
            self.mode,
            &self.src,
            self.factory.as_ref(),
            &self.options.waveform,
            sink,
        ) {
            Ok(handle) => {
                self.backend = Some(handle);
                if announce {
                    let snapshot = self.state();
                    (self.on_change)(&snapshot);
                }
            }
            Err(e) => {
                error!("Failed to create {} backend for {}: {}", self.mode, self.src, e);
                self.fail(e);
            }
        }
    }

    fn detach(&mut self) {
        // Invalidate listeners first so events fired during release are dropped
        self.core.borrow_mut().generation += 1;
        if let Some(mut backend) = self.backend.take() {
            backend.release();
        }
    }

    fn fail(&mut self, error: PlayerError) {
        let snapshot = ViewState::inert(error);
        self.core.borrow_mut().state = snapshot.clone();
        (self.on_change)(&snapshot);
    }

    fn event_sink(
        core: Weak<RefCell<Core>>,
        generation: u64,
        clock: Rc<dyn Clock>,
        on_change: ChangeCallback,
    ) -> EventSink {
        Rc::new(move |event: BackendEvent| {
            let Some(core) = core.upgrade() else {
                debug!("Dropping {:?}: synchronizer is gone", event);
                return;
            };

            let snapshot = {
                let Ok(mut core) = core.try_borrow_mut() else {
                    warn!("Dropping reentrant backend event {:?}", event);
                    return;
                };
                if core.generation != generation {
                    debug!("Dropping {:?} from a detached backend", event);
                    return;
                }
                core.apply(&event, clock.now())
            };

            if let Some(state) = snapshot {
                on_change(&state);
            }
        })
    }
}

impl Drop for Synchronizer {
    fn drop(&mut self) {
        self.destroy();
    }
}
