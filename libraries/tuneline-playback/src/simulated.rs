//! In-memory backends
//!
//! Scriptable implementations of [`WaveformBackend`] and
//! [`MediaElementBackend`] for tests, demos and headless hosts. Every
//! backend created by a [`SimulatedFactory`] can be reached through a
//! handle that records the commands it received and emits events on its
//! behalf.
//!
//! In responsive mode the backends confirm intents on their own: `play`
//! emits a play event, `pause` a pause event and seeks a seek event, all
//! synchronously from inside the call.

use crate::backend::{
    BackendFactory, ListenerId, MediaElementBackend, MediaListener, WaveformBackend,
    WaveformListener,
};
use crate::config::WaveformOptions;
use crate::error::{PlayerError, Result};
use crate::events::{MediaEvent, MediaEventKind, WaveformEvent, WaveformEventKind};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Operation received by a simulated backend
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load(String),
    Play,
    Pause,
    SeekTo(f64),
    SetCurrentTime(f64),
    FastSeek(f64),
    Destroy,
    Release,
}

/// Listener table shared by both simulated backends
struct Listeners<K, L> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ListenerId, K, L)>>,
}

impl<K: Copy + PartialEq, L: Clone> Listeners<K, L> {
    fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            entries: RefCell::new(Vec::new()),
        }
    }

    fn add(&self, kind: K, listener: L) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, kind, listener));
        id
    }

    fn remove(&self, id: ListenerId) {
        self.entries.borrow_mut().retain(|(entry, _, _)| *entry != id);
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Listeners are cloned out first so they may (un)subscribe while running
    fn matching(&self, kind: K) -> Vec<L> {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, listener)| listener.clone())
            .collect()
    }
}

struct WaveformShared {
    options: WaveformOptions,
    responsive: bool,
    commands: RefCell<Vec<Command>>,
    listeners: Listeners<WaveformEventKind, WaveformListener>,
    current_time: Cell<f64>,
    duration: Cell<f64>,
    destroyed: Cell<bool>,
}

/// Test-side view of a [`SimulatedWaveform`]
#[derive(Clone)]
pub struct WaveformHandle {
    shared: Rc<WaveformShared>,
}

impl WaveformHandle {
    /// Deliver an event to the listeners subscribed to its kind
    pub fn emit(&self, event: WaveformEvent) {
        match &event {
            WaveformEvent::Ready { duration } => self.shared.duration.set(*duration),
            WaveformEvent::AudioProcess(time) => self.shared.current_time.set(*time),
            WaveformEvent::Seek { current_time } => self.shared.current_time.set(*current_time),
            _ => {}
        }
        for listener in self.shared.listeners.matching(event.kind()) {
            listener(event.clone());
        }
    }

    pub fn commands(&self) -> Vec<Command> {
        self.shared.commands.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.shared.listeners.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.destroyed.get()
    }

    pub fn options(&self) -> WaveformOptions {
        self.shared.options.clone()
    }

    /// Source passed to the last `load`
    pub fn loaded_src(&self) -> Option<String> {
        self.shared
            .commands
            .borrow()
            .iter()
            .rev()
            .find_map(|command| match command {
                Command::Load(src) => Some(src.clone()),
                _ => None,
            })
    }
}

/// Simulated waveform renderer
pub struct SimulatedWaveform {
    shared: Rc<WaveformShared>,
}

impl SimulatedWaveform {
    pub fn new(options: WaveformOptions, responsive: bool) -> (Self, WaveformHandle) {
        let shared = Rc::new(WaveformShared {
            options,
            responsive,
            commands: RefCell::new(Vec::new()),
            listeners: Listeners::new(),
            current_time: Cell::new(0.0),
            duration: Cell::new(0.0),
            destroyed: Cell::new(false),
        });
        let handle = WaveformHandle {
            shared: Rc::clone(&shared),
        };
        (Self { shared }, handle)
    }

    fn handle(&self) -> WaveformHandle {
        WaveformHandle {
            shared: Rc::clone(&self.shared),
        }
    }

    fn record(&self, command: Command) {
        self.shared.commands.borrow_mut().push(command);
    }
}

impl WaveformBackend for SimulatedWaveform {
    fn load(&mut self, url: &str) {
        self.record(Command::Load(url.to_string()));
    }

    fn play(&mut self) {
        self.record(Command::Play);
        if self.shared.responsive {
            self.handle().emit(WaveformEvent::Play);
        }
    }

    fn pause(&mut self) {
        self.record(Command::Pause);
        if self.shared.responsive {
            self.handle().emit(WaveformEvent::Pause);
        }
    }

    fn seek_to(&mut self, progress: f64) {
        self.record(Command::SeekTo(progress));
        if self.shared.responsive {
            let current_time = self.shared.duration.get() * progress;
            self.handle().emit(WaveformEvent::Seek { current_time });
        }
    }

    fn current_time(&self) -> f64 {
        self.shared.current_time.get()
    }

    fn duration(&self) -> f64 {
        self.shared.duration.get()
    }

    fn on(&mut self, kind: WaveformEventKind, listener: WaveformListener) -> ListenerId {
        self.shared.listeners.add(kind, listener)
    }

    fn un(&mut self, id: ListenerId) {
        self.shared.listeners.remove(id);
    }

    fn destroy(&mut self) {
        self.record(Command::Destroy);
        self.shared.destroyed.set(true);
        self.handle().emit(WaveformEvent::Destroy);
    }
}

struct MediaShared {
    src: String,
    responsive: bool,
    commands: RefCell<Vec<Command>>,
    listeners: Listeners<MediaEventKind, MediaListener>,
    current_time: Cell<f64>,
    duration: Cell<f64>,
    released: Cell<bool>,
}

/// Test-side view of a [`SimulatedMediaElement`]
#[derive(Clone)]
pub struct MediaHandle {
    shared: Rc<MediaShared>,
}

impl MediaHandle {
    /// Deliver an event to the listeners subscribed to its kind
    pub fn emit(&self, event: MediaEvent) {
        match &event {
            MediaEvent::CanPlayThrough { duration } => self.shared.duration.set(*duration),
            MediaEvent::TimeUpdate { current_time } | MediaEvent::Seeked { current_time } => {
                self.shared.current_time.set(*current_time);
            }
            _ => {}
        }
        for listener in self.shared.listeners.matching(event.kind()) {
            listener(event.clone());
        }
    }

    pub fn src(&self) -> String {
        self.shared.src.clone()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.shared.commands.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.shared.listeners.len()
    }

    pub fn is_released(&self) -> bool {
        self.shared.released.get()
    }
}

/// Simulated media element
pub struct SimulatedMediaElement {
    shared: Rc<MediaShared>,
}

impl SimulatedMediaElement {
    pub fn new(src: &str, responsive: bool) -> (Self, MediaHandle) {
        let shared = Rc::new(MediaShared {
            src: src.to_string(),
            responsive,
            commands: RefCell::new(Vec::new()),
            listeners: Listeners::new(),
            current_time: Cell::new(0.0),
            duration: Cell::new(f64::NAN),
            released: Cell::new(false),
        });
        let handle = MediaHandle {
            shared: Rc::clone(&shared),
        };
        (Self { shared }, handle)
    }

    fn handle(&self) -> MediaHandle {
        MediaHandle {
            shared: Rc::clone(&self.shared),
        }
    }

    fn record(&self, command: Command) {
        self.shared.commands.borrow_mut().push(command);
    }

    fn seeked(&self, time: f64) {
        self.shared.current_time.set(time);
        if self.shared.responsive {
            self.handle().emit(MediaEvent::Seeked { current_time: time });
        }
    }
}

impl MediaElementBackend for SimulatedMediaElement {
    fn play(&mut self) {
        self.record(Command::Play);
        if self.shared.responsive {
            self.handle().emit(MediaEvent::Playing);
        }
    }

    fn pause(&mut self) {
        self.record(Command::Pause);
        if self.shared.responsive {
            self.handle().emit(MediaEvent::Pause);
        }
    }

    fn set_current_time(&mut self, time: f64) {
        self.record(Command::SetCurrentTime(time));
        self.seeked(time);
    }

    fn fast_seek(&mut self, time: f64) {
        self.record(Command::FastSeek(time));
        self.seeked(time);
    }

    fn current_time(&self) -> f64 {
        self.shared.current_time.get()
    }

    fn duration(&self) -> f64 {
        self.shared.duration.get()
    }

    fn add_event_listener(&mut self, kind: MediaEventKind, listener: MediaListener) -> ListenerId {
        self.shared.listeners.add(kind, listener)
    }

    fn remove_event_listener(&mut self, id: ListenerId) {
        self.shared.listeners.remove(id);
    }

    fn release(&mut self) {
        self.record(Command::Release);
        self.shared.released.set(true);
    }
}

/// Factory handing out simulated backends and keeping a handle to each
#[derive(Default)]
pub struct SimulatedFactory {
    responsive: bool,
    failure: RefCell<Option<String>>,
    waveforms: RefCell<Vec<WaveformHandle>>,
    media_elements: RefCell<Vec<MediaHandle>>,
}

impl SimulatedFactory {
    /// Backends only do what the handle tells them
    pub fn new() -> Self {
        Self::default()
    }

    /// Backends confirm play, pause and seek on their own
    pub fn responsive() -> Self {
        Self {
            responsive: true,
            ..Self::default()
        }
    }

    /// Make every following construction fail with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.borrow_mut() = Some(message.into());
    }

    /// Let constructions succeed again
    pub fn recover(&self) {
        *self.failure.borrow_mut() = None;
    }

    pub fn waveforms(&self) -> Vec<WaveformHandle> {
        self.waveforms.borrow().clone()
    }

    pub fn media_elements(&self) -> Vec<MediaHandle> {
        self.media_elements.borrow().clone()
    }

    pub fn last_waveform(&self) -> Option<WaveformHandle> {
        self.waveforms.borrow().last().cloned()
    }

    pub fn last_media_element(&self) -> Option<MediaHandle> {
        self.media_elements.borrow().last().cloned()
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure.borrow().as_ref() {
            Some(message) => Err(PlayerError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

impl BackendFactory for SimulatedFactory {
    fn waveform(&self, options: &WaveformOptions) -> Result<Box<dyn WaveformBackend>> {
        self.check_failure()?;
        let (backend, handle) = SimulatedWaveform::new(options.clone(), self.responsive);
        self.waveforms.borrow_mut().push(handle);
        Ok(Box::new(backend))
    }

    fn media_element(&self, src: &str) -> Result<Box<dyn MediaElementBackend>> {
        self.check_failure()?;
        let (backend, handle) = SimulatedMediaElement::new(src, self.responsive);
        self.media_elements.borrow_mut().push(handle);
        Ok(Box::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_reaches_only_matching_listeners() {
        let (mut waveform, handle) = SimulatedWaveform::new(WaveformOptions::default(), false);
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        waveform.on(
            WaveformEventKind::Play,
            Rc::new(move |_: WaveformEvent| counter.set(counter.get() + 1)),
        );

        handle.emit(WaveformEvent::Pause);
        assert_eq!(hits.get(), 0);
        handle.emit(WaveformEvent::Play);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn removed_listeners_stop_receiving() {
        let (mut element, handle) = SimulatedMediaElement::new("a.mp3", false);
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        let id = element.add_event_listener(
            MediaEventKind::Ended,
            Rc::new(move |_: MediaEvent| counter.set(counter.get() + 1)),
        );
        assert_eq!(handle.listener_count(), 1);

        element.remove_event_listener(id);
        handle.emit(MediaEvent::Ended);
        assert_eq!(hits.get(), 0);
        assert_eq!(handle.listener_count(), 0);
    }

    #[test]
    fn responsive_backends_confirm_intents() {
        let (mut element, handle) = SimulatedMediaElement::new("a.mp3", true);
        let seen = Rc::new(RefCell::new(Vec::new()));

        for kind in MediaEventKind::ALL {
            let seen = Rc::clone(&seen);
            element.add_event_listener(kind, Rc::new(move |e: MediaEvent| seen.borrow_mut().push(e)));
        }

        element.play();
        element.fast_seek(12.0);
        element.pause();

        assert_eq!(
            *seen.borrow(),
            vec![
                MediaEvent::Playing,
                MediaEvent::Seeked { current_time: 12.0 },
                MediaEvent::Pause,
            ]
        );
        assert_eq!(
            handle.commands(),
            vec![Command::Play, Command::FastSeek(12.0), Command::Pause]
        );
        assert_eq!(element.current_time(), 12.0);
    }

    #[test]
    fn factory_tracks_created_backends() {
        let factory = SimulatedFactory::new();
        let mut waveform = factory.waveform(&WaveformOptions::default()).unwrap();
        waveform.load("song.mp3");
        factory.media_element("song.mp3").unwrap();

        assert_eq!(factory.waveforms().len(), 1);
        assert_eq!(
            factory.last_waveform().unwrap().loaded_src().as_deref(),
            Some("song.mp3")
        );
        assert_eq!(factory.last_media_element().unwrap().src(), "song.mp3");
    }

    #[test]
    fn factory_failure_is_reported() {
        let factory = SimulatedFactory::new();
        factory.fail_with("no container");
        assert!(matches!(
            factory.media_element("x.mp3"),
            Err(PlayerError::Backend(message)) if message == "no container"
        ));
        factory.recover();
        assert!(factory.media_element("x.mp3").is_ok());
    }
}
