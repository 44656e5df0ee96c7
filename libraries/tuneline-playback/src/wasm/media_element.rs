//! `MediaElementBackend` over a browser `<audio>` element

use crate::backend::{
    BackendFactory, ListenerId, MediaElementBackend, MediaListener, WaveformBackend,
};
use crate::config::WaveformOptions;
use crate::error::{PlayerError, Result};
use crate::events::{MediaEvent, MediaEventKind};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlAudioElement;

type DomListener = Closure<dyn FnMut(web_sys::Event)>;

/// Detached `<audio>` element (the equivalent of `new Audio(src)`)
pub struct HtmlAudioBackend {
    element: HtmlAudioElement,
    next_id: u64,
    listeners: Vec<(ListenerId, MediaEventKind, DomListener)>,
}

impl HtmlAudioBackend {
    pub fn new(src: &str) -> Result<Self> {
        let element = HtmlAudioElement::new_with_src(src)
            .map_err(|e| PlayerError::Backend(format!("failed to create audio element: {e:?}")))?;
        Ok(Self {
            element,
            next_id: 1,
            listeners: Vec::new(),
        })
    }

    fn translate(kind: MediaEventKind, element: &HtmlAudioElement) -> MediaEvent {
        match kind {
            MediaEventKind::CanPlayThrough => MediaEvent::CanPlayThrough {
                duration: element.duration(),
            },
            MediaEventKind::Playing => MediaEvent::Playing,
            MediaEventKind::Pause => MediaEvent::Pause,
            MediaEventKind::Ended => MediaEvent::Ended,
            MediaEventKind::TimeUpdate => MediaEvent::TimeUpdate {
                current_time: element.current_time(),
            },
            MediaEventKind::Seeked => MediaEvent::Seeked {
                current_time: element.current_time(),
            },
            MediaEventKind::Error => MediaEvent::Error(
                element
                    .error()
                    .map(|e| format!("media error code {}", e.code()))
                    .unwrap_or_else(|| "unknown media error".to_string()),
            ),
        }
    }

    fn detach(&self, kind: MediaEventKind, listener: &DomListener) {
        if let Err(e) = self
            .element
            .remove_event_listener_with_callback(kind.as_str(), listener.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to remove {} listener: {:?}", kind.as_str(), e);
        }
    }
}

impl MediaElementBackend for HtmlAudioBackend {
    fn play(&mut self) {
        // Rejections (autoplay policy) surface as the absence of a `playing` event
        if let Err(e) = self.element.play() {
            tracing::warn!("play() threw: {:?}", e);
        }
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            tracing::warn!("pause() threw: {:?}", e);
        }
    }

    fn set_current_time(&mut self, time: f64) {
        self.element.set_current_time(time);
    }

    fn fast_seek(&mut self, time: f64) {
        if self.element.fast_seek(time).is_err() {
            self.set_current_time(time);
        }
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn duration(&self) -> f64 {
        self.element.duration()
    }

    fn add_event_listener(&mut self, kind: MediaEventKind, listener: MediaListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let element = self.element.clone();
        let callback: DomListener = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            listener(Self::translate(kind, &element));
        }) as Box<dyn FnMut(web_sys::Event)>);

        if let Err(e) = self
            .element
            .add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to add {} listener: {:?}", kind.as_str(), e);
        }

        self.listeners.push((id, kind, callback));
        id
    }

    fn remove_event_listener(&mut self, id: ListenerId) {
        if let Some(index) = self.listeners.iter().position(|(entry, _, _)| *entry == id) {
            let (_, kind, callback) = self.listeners.remove(index);
            self.detach(kind, &callback);
        }
    }

    fn release(&mut self) {
        for (_, kind, callback) in std::mem::take(&mut self.listeners) {
            self.detach(kind, &callback);
        }
        self.element.set_src("");
        self.element.remove();
    }
}

/// Constructor for waveform renderers provided by the host page
pub type WaveformConstructor = Box<dyn Fn(&WaveformOptions) -> Result<Box<dyn WaveformBackend>>>;

/// Factory producing `<audio>` elements, plus an optional host waveform renderer
#[derive(Default)]
pub struct HtmlAudioFactory {
    waveform: Option<WaveformConstructor>,
}

impl HtmlAudioFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_waveform(mut self, constructor: WaveformConstructor) -> Self {
        self.waveform = Some(constructor);
        self
    }
}

impl BackendFactory for HtmlAudioFactory {
    fn waveform(&self, options: &WaveformOptions) -> Result<Box<dyn WaveformBackend>> {
        match &self.waveform {
            Some(constructor) => constructor(options),
            None => Err(PlayerError::Backend(
                "no waveform renderer registered".to_string(),
            )),
        }
    }

    fn media_element(&self, src: &str) -> Result<Box<dyn MediaElementBackend>> {
        Ok(Box::new(HtmlAudioBackend::new(src)?))
    }
}
