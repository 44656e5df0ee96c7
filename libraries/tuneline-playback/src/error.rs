//! Error types for playback synchronization

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Player errors
///
/// Errors are values, not panics: backend failures end up in
/// [`ViewState::error`](crate::ViewState::error) and the synchronizer stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlayerError {
    /// Media source is missing or empty
    #[error("Media source is empty")]
    EmptySource,

    /// Backend reported a decode, network or playback failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Operation not valid in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
