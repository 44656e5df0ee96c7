//! Tuneline - Playback State Synchronization
//!
//! Framework-agnostic core of an audio player that can be driven either by
//! a waveform renderer or by a native media element.
//!
//! This crate provides:
//! - A view-state record (loading, progress, playing, position, duration)
//! - Event-sourced state: only backend events change it, never intents
//! - Play / pause / toggle / seek intents dispatched to the active backend
//! - Backend switching (waveform <-> timeline) with listener teardown
//! - Throttled position updates (100ms by default)
//! - A presentation model with formatted timestamps
//!
//! # Architecture
//!
//! `tuneline-playback` knows nothing about any UI toolkit:
//! - Backends are reached through the [`WaveformBackend`] and
//!   [`MediaElementBackend`] traits, created by a [`BackendFactory`]
//! - State transitions live in a pure table ([`transition::apply`])
//! - Hosts render a [`PlayerView`] from [`PlayerConfig`] + [`ViewState`]
//!
//! Browser bindings (`<audio>` backend, JS-facing player) live behind the
//! `wasm` feature.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use tuneline_playback::events::WaveformEvent;
//! use tuneline_playback::simulated::SimulatedFactory;
//! use tuneline_playback::{DisplayMode, Synchronizer};
//!
//! let factory = Rc::new(SimulatedFactory::new());
//! let mut player = Synchronizer::create(
//!     "track.mp3",
//!     DisplayMode::Waveform,
//!     factory.clone(),
//!     |state| println!("{state:?}"),
//! );
//!
//! let waveform = factory.last_waveform().unwrap();
//! waveform.emit(WaveformEvent::Loading(40));
//! waveform.emit(WaveformEvent::Ready { duration: 120.0 });
//!
//! player.play();
//! assert!(!player.state().playing); // waits for the backend
//!
//! waveform.emit(WaveformEvent::Play);
//! assert!(player.state().playing);
//! ```

pub mod backend;
pub mod config;
mod error;
pub mod events;
pub mod simulated;
mod synchronizer;
pub mod throttle;
pub mod timestamp;
pub mod transition;
mod types;
pub mod view;
pub mod wasm;

// Public exports
pub use backend::{BackendFactory, ListenerId, MediaElementBackend, WaveformBackend};
pub use config::{Dimension, PlayerConfig, SyncOptions, WaveformOptions};
pub use error::{PlayerError, Result};
pub use synchronizer::{ChangeCallback, Synchronizer};
pub use throttle::{Clock, ManualClock, SystemClock};
pub use types::{DisplayMode, StopReason, ViewState};
pub use view::PlayerView;
