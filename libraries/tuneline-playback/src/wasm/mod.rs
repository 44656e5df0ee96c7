//! WASM bindings for tuneline-playback
//!
//! Browser `<audio>` backend, an adapter for host waveform renderers and a
//! JavaScript-facing player built on the synchronizer.

#[cfg(feature = "wasm")]
pub mod media_element;

#[cfg(feature = "wasm")]
pub mod player;

#[cfg(feature = "wasm")]
pub mod waveform;

#[cfg(feature = "wasm")]
pub use media_element::{HtmlAudioBackend, HtmlAudioFactory};

#[cfg(feature = "wasm")]
pub use player::WasmAudioPlayer;

#[cfg(feature = "wasm")]
pub use waveform::JsWaveform;
