//! Backend capability interfaces
//!
//! Two interchangeable engines can drive playback:
//! - [`WaveformBackend`]: a waveform renderer with its own audio engine
//! - [`MediaElementBackend`]: a native media element (`<audio>`)
//!
//! Hosts provide both through a [`BackendFactory`]. The synchronizer picks
//! one per `(src, mode)` pair in [`BackendHandle::connect`] and never
//! branches on the backend kind anywhere else.

use crate::config::WaveformOptions;
use crate::error::Result;
use crate::events::{BackendEvent, MediaEvent, MediaEventKind, WaveformEvent, WaveformEventKind};
use crate::types::DisplayMode;
use std::rc::Rc;
use tracing::debug;

/// Handle returned when subscribing to backend events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Callback registered on a waveform renderer
pub type WaveformListener = Rc<dyn Fn(WaveformEvent)>;

/// Callback registered on a media element
pub type MediaListener = Rc<dyn Fn(MediaEvent)>;

/// Sink receiving normalized events from the active backend
pub type EventSink = Rc<dyn Fn(BackendEvent)>;

/// Waveform renderer
///
/// All operations are fire-and-forget: results are observed later through
/// the subscribed events. Implementations may invoke listeners
/// synchronously from inside any method.
pub trait WaveformBackend {
    /// Start loading and decoding a media source
    fn load(&mut self, url: &str);

    fn play(&mut self);

    fn pause(&mut self);

    /// Seek to a fraction of the duration (0.0 - 1.0)
    fn seek_to(&mut self, progress: f64);

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Decoded duration in seconds (0 until ready)
    fn duration(&self) -> f64;

    /// Subscribe to one event kind
    fn on(&mut self, kind: WaveformEventKind, listener: WaveformListener) -> ListenerId;

    /// Remove a subscription; unknown ids are ignored
    fn un(&mut self, id: ListenerId);

    /// Stop playback and release the renderer
    fn destroy(&mut self);
}

/// Native media element
///
/// The element is bound to its source at construction time.
pub trait MediaElementBackend {
    fn play(&mut self);

    fn pause(&mut self);

    /// Assign `currentTime`
    fn set_current_time(&mut self, time: f64);

    /// Approximate seek, when the platform offers a faster one
    fn fast_seek(&mut self, time: f64) {
        self.set_current_time(time);
    }

    fn current_time(&self) -> f64;

    /// Value of the `duration` property (NaN until metadata is loaded)
    fn duration(&self) -> f64;

    fn add_event_listener(&mut self, kind: MediaEventKind, listener: MediaListener) -> ListenerId;

    /// Remove a subscription; unknown ids are ignored
    fn remove_event_listener(&mut self, id: ListenerId);

    /// Detach the element and free its resources
    fn release(&mut self);
}

/// Creates backend instances on demand
pub trait BackendFactory {
    /// Create a waveform renderer (not yet loaded)
    fn waveform(&self, options: &WaveformOptions) -> Result<Box<dyn WaveformBackend>>;

    /// Create a media element bound to `src`
    fn media_element(&self, src: &str) -> Result<Box<dyn MediaElementBackend>>;
}

/// The closed set of backends a synchronizer can drive
pub enum ActiveBackend {
    Waveform(Box<dyn WaveformBackend>),
    Timeline(Box<dyn MediaElementBackend>),
}

impl ActiveBackend {
    pub fn mode(&self) -> DisplayMode {
        match self {
            ActiveBackend::Waveform(_) => DisplayMode::Waveform,
            ActiveBackend::Timeline(_) => DisplayMode::Timeline,
        }
    }
}

/// Owned backend plus the listeners registered on it
pub struct BackendHandle {
    backend: ActiveBackend,
    listeners: Vec<ListenerId>,
    src: String,
    released: bool,
}

impl BackendHandle {
    /// Create the backend for `mode`, subscribe `sink` to all its events and
    /// start loading `src`
    pub fn connect(
        mode: DisplayMode,
        src: &str,
        factory: &dyn BackendFactory,
        options: &WaveformOptions,
        sink: EventSink,
    ) -> Result<Self> {
        let mut listeners = Vec::new();

        let backend = match mode {
            DisplayMode::Waveform => {
                let mut waveform = factory.waveform(options)?;
                for kind in WaveformEventKind::ALL {
                    let sink = Rc::clone(&sink);
                    let listener: WaveformListener =
                        Rc::new(move |event: WaveformEvent| sink(BackendEvent::from(event)));
                    listeners.push(waveform.on(kind, listener));
                }
                waveform.load(src);
                ActiveBackend::Waveform(waveform)
            }
            DisplayMode::Timeline => {
                let mut element = factory.media_element(src)?;
                for kind in MediaEventKind::ALL {
                    let sink = Rc::clone(&sink);
                    let listener: MediaListener =
                        Rc::new(move |event: MediaEvent| sink(BackendEvent::from(event)));
                    listeners.push(element.add_event_listener(kind, listener));
                }
                ActiveBackend::Timeline(element)
            }
        };

        debug!(
            "Attached {} backend for {} ({} listeners)",
            mode,
            src,
            listeners.len()
        );

        Ok(Self {
            backend,
            listeners,
            src: src.to_string(),
            released: false,
        })
    }

    pub fn play(&mut self) {
        match &mut self.backend {
            ActiveBackend::Waveform(waveform) => waveform.play(),
            ActiveBackend::Timeline(element) => element.play(),
        }
    }

    pub fn pause(&mut self) {
        match &mut self.backend {
            ActiveBackend::Waveform(waveform) => waveform.pause(),
            ActiveBackend::Timeline(element) => element.pause(),
        }
    }

    /// Seek to `percent` (0-100) of `end_time`
    pub fn seek(&mut self, percent: f64, end_time: f64) {
        match &mut self.backend {
            ActiveBackend::Waveform(waveform) => waveform.seek_to(percent / 100.0),
            ActiveBackend::Timeline(element) => element.fast_seek(end_time * percent / 100.0),
        }
    }

    /// Detach every listener, then release the backend. Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let listeners = std::mem::take(&mut self.listeners);
        let count = listeners.len();
        match &mut self.backend {
            ActiveBackend::Waveform(waveform) => {
                for id in listeners {
                    waveform.un(id);
                }
                waveform.destroy();
            }
            ActiveBackend::Timeline(element) => {
                for id in listeners {
                    element.remove_event_listener(id);
                }
                element.pause();
                element.release();
            }
        }

        debug!(
            "Released {} backend for {} ({} listeners detached)",
            self.backend.mode(),
            self.src,
            count
        );
    }
}

impl Drop for BackendHandle {
    fn drop(&mut self) {
        self.release();
    }
}
