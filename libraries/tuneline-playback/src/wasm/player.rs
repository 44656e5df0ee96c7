//! JavaScript-facing audio player

use super::media_element::HtmlAudioFactory;
use super::waveform::JsWaveform;
use crate::backend::WaveformBackend;
use crate::{
    DisplayMode, PlayerConfig, PlayerError, PlayerView, Synchronizer, ViewState, WaveformOptions,
};
use js_sys::Function;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Audio player driven from JavaScript
///
/// `on_change` receives the rendered view (a plain object) every time the
/// playback state changes. `create_waveform` is called with the waveform
/// options (camelCase, as wavesurfer.js takes them) and must return a
/// renderer; without it only the timeline display works.
#[wasm_bindgen]
pub struct WasmAudioPlayer {
    inner: Synchronizer,
    config: Rc<RefCell<PlayerConfig>>,
}

#[wasm_bindgen]
impl WasmAudioPlayer {
    #[wasm_bindgen(constructor)]
    pub fn new(
        src: String,
        config: JsValue,
        on_change: Function,
        create_waveform: Option<Function>,
    ) -> Result<WasmAudioPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let sync_options = config.sync_options();
        let display = config.display;
        let config = Rc::new(RefCell::new(config));
        let view_config = Rc::clone(&config);
        let inner = Synchronizer::with_options(
            src,
            display,
            Rc::new(factory(create_waveform)),
            sync_options,
            Rc::new(crate::SystemClock::new()),
            move |state: &ViewState| {
                let view = PlayerView::render(&view_config.borrow(), state);
                match serde_wasm_bindgen::to_value(&view) {
                    Ok(value) => {
                        if let Err(e) = on_change.call1(&JsValue::NULL, &value) {
                            tracing::warn!("on_change threw: {:?}", e);
                        }
                    }
                    Err(e) => tracing::error!("Failed to serialize view: {}", e),
                }
            },
        );

        Ok(Self { inner, config })
    }

    pub fn play(&mut self) {
        self.inner.play();
    }

    pub fn pause(&mut self) {
        self.inner.pause();
    }

    pub fn toggle(&mut self) {
        self.inner.toggle();
    }

    /// Seek to a percentage (0-100) of the duration
    pub fn seek(&mut self, percent: f64) {
        self.inner.seek(percent);
    }

    #[wasm_bindgen(js_name = setSource)]
    pub fn set_source(&mut self, src: String, display: String) -> Result<(), JsValue> {
        let mode: DisplayMode = display
            .parse()
            .map_err(|e: crate::PlayerError| JsValue::from_str(&e.to_string()))?;
        // The fresh snapshot emitted by set_source must render with the new mode
        self.config.borrow_mut().display = mode;
        self.inner.set_source(src, mode);
        Ok(())
    }

    /// Current rendered view
    pub fn view(&self) -> Result<JsValue, JsValue> {
        let view = PlayerView::render(&self.config.borrow(), &self.inner.state());
        Ok(serde_wasm_bindgen::to_value(&view)?)
    }

    pub fn destroy(&mut self) {
        self.inner.destroy();
    }
}

fn factory(create_waveform: Option<Function>) -> HtmlAudioFactory {
    let Some(create) = create_waveform else {
        return HtmlAudioFactory::new();
    };

    HtmlAudioFactory::new().with_waveform(Box::new(move |options: &WaveformOptions| {
        let options = serde_wasm_bindgen::to_value(options)
            .map_err(|e| PlayerError::Backend(format!("invalid waveform options: {e}")))?;
        let renderer = create
            .call1(&JsValue::NULL, &options)
            .map_err(|e| PlayerError::Backend(format!("waveform factory threw: {e:?}")))?;
        let backend: Box<dyn WaveformBackend> = Box::new(JsWaveform::new(renderer)?);
        Ok(backend)
    }))
}
