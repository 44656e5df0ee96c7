//! `WaveformBackend` over a renderer object created by the host page
//!
//! The renderer must expose the wavesurfer.js surface: `load`, `play`,
//! `pause`, `seekTo`, `getCurrentTime`, `getDuration`, `on`, `un` and
//! `destroy`.

use crate::backend::{ListenerId, WaveformBackend, WaveformListener};
use crate::error::{PlayerError, Result};
use crate::events::{WaveformEvent, WaveformEventKind};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Methods a renderer must provide
pub const REQUIRED_METHODS: [&str; 9] = [
    "load",
    "play",
    "pause",
    "seekTo",
    "getCurrentTime",
    "getDuration",
    "on",
    "un",
    "destroy",
];

type HostListener = Closure<dyn FnMut(JsValue)>;

fn call(target: &JsValue, method: &str, args: &Array) -> std::result::Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    function.apply(target, args)
}

fn read_number(target: &JsValue, method: &str) -> f64 {
    call(target, method, &Array::new())
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(f64::NAN)
}

fn error_message(payload: &JsValue) -> Option<String> {
    payload.as_string().or_else(|| {
        payload
            .dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
    })
}

pub struct JsWaveform {
    renderer: JsValue,
    next_id: u64,
    listeners: Vec<(ListenerId, WaveformEventKind, HostListener)>,
}

impl JsWaveform {
    /// Wrap a renderer, checking that it has every required method
    pub fn new(renderer: JsValue) -> Result<Self> {
        if !renderer.is_object() {
            return Err(PlayerError::Backend(
                "waveform factory did not return an object".to_string(),
            ));
        }
        for method in REQUIRED_METHODS {
            let found = Reflect::get(&renderer, &JsValue::from_str(method))
                .map(|value| value.is_function())
                .unwrap_or(false);
            if !found {
                return Err(PlayerError::Backend(format!(
                    "waveform renderer has no {method}() method"
                )));
            }
        }

        Ok(Self {
            renderer,
            next_id: 1,
            listeners: Vec::new(),
        })
    }

    fn invoke(&self, method: &str, args: &Array) {
        if let Err(e) = call(&self.renderer, method, args) {
            tracing::warn!("Waveform renderer {}() threw: {:?}", method, e);
        }
    }

    fn detach(&self, kind: WaveformEventKind, listener: &HostListener) {
        self.invoke(
            "un",
            &Array::of2(&JsValue::from_str(kind.as_str()), listener.as_ref()),
        );
    }
}

impl WaveformBackend for JsWaveform {
    fn load(&mut self, url: &str) {
        self.invoke("load", &Array::of1(&JsValue::from_str(url)));
    }

    fn play(&mut self) {
        self.invoke("play", &Array::new());
    }

    fn pause(&mut self) {
        self.invoke("pause", &Array::new());
    }

    fn seek_to(&mut self, progress: f64) {
        self.invoke("seekTo", &Array::of1(&JsValue::from_f64(progress)));
    }

    fn current_time(&self) -> f64 {
        read_number(&self.renderer, "getCurrentTime")
    }

    fn duration(&self) -> f64 {
        read_number(&self.renderer, "getDuration")
    }

    fn on(&mut self, kind: WaveformEventKind, listener: WaveformListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let renderer = self.renderer.clone();
        let callback: HostListener = Closure::wrap(Box::new(move |payload: JsValue| {
            let event = WaveformEvent::from_host(
                kind,
                payload.as_f64(),
                error_message(&payload),
                read_number(&renderer, "getCurrentTime"),
                read_number(&renderer, "getDuration"),
            );
            listener(event);
        }) as Box<dyn FnMut(JsValue)>);

        self.invoke(
            "on",
            &Array::of2(&JsValue::from_str(kind.as_str()), callback.as_ref()),
        );
        self.listeners.push((id, kind, callback));
        id
    }

    fn un(&mut self, id: ListenerId) {
        if let Some(index) = self.listeners.iter().position(|(entry, _, _)| *entry == id) {
            let (_, kind, callback) = self.listeners.remove(index);
            self.detach(kind, &callback);
        }
    }

    fn destroy(&mut self) {
        for (_, kind, callback) in std::mem::take(&mut self.listeners) {
            self.detach(kind, &callback);
        }
        self.invoke("destroy", &Array::new());
    }
}
