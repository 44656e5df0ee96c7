//! Tuneline Demo Library
//!
//! Terminal front end for `tuneline-playback`: loads a player configuration,
//! drives a scripted playback session against simulated backends and renders
//! each emitted view state as a text frame.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod variants;

pub use config::{DemoConfig, SessionSettings};
pub use error::{DemoError, Result};
pub use session::{Frame, Session};
